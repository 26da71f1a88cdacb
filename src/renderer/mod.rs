//! Renderer collaborator.
//!
//! A [`Renderer`] owns its own render thread. The capture loop configures
//! it, hands it a scene, requests one frame at a time and awaits the
//! returned [`FrameCompletion`] before reading [`Renderer::current_frame_buffer`].

pub mod async_communication;
pub mod cpu_reference;
pub mod frame;

use std::sync::Arc;
use std::time::Duration;

pub use async_communication::{
    event_channel, AsyncChannelConfig, AsyncEventReceiver, BufferedEventSender, SendEventError,
};
pub use cpu_reference::CpuReferenceRenderer;
pub use frame::{CameraPose, FrameBuffer, FrameCompletion, ViewportConfig};

use crate::scene::SceneGraph;

/// Trait that all renderers implement.
///
/// The `Send + Sync` bounds allow a renderer to be driven from a tokio task.
pub trait Renderer: Send + Sync {
    /// Short backend tag, also written as the dataset `source`.
    fn name(&self) -> &'static str;

    /// Spawns the render thread. Fails with [`RendererError::AlreadyRunning`]
    /// when called twice.
    fn start(&mut self) -> Result<(), RendererError>;

    /// Shuts the render thread down and waits for it. Idempotent.
    fn stop(&mut self);

    fn configure(&mut self, viewport: ViewportConfig) -> Result<(), RendererError>;

    /// Replaces the scene used by subsequent frames.
    fn set_scene(&mut self, scene: Arc<SceneGraph>) -> Result<(), RendererError>;

    /// Queues one frame rendered from `pose`.
    ///
    /// The returned completion resolves once the render thread reports that
    /// frame; only then does [`Renderer::current_frame_buffer`] hold it.
    fn request_frame(&self, pose: &CameraPose) -> Result<FrameCompletion, RendererError>;

    /// Snapshot of the most recently completed frame.
    fn current_frame_buffer(&self) -> Result<FrameBuffer, RendererError>;
}

/// Events emitted by a render thread.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererEvent {
    FrameRendered {
        renderer_id: &'static str,
        frame_number: u64,
        /// Time since the renderer started.
        frame_time_microseconds: u64,
        render_time_ns: u64,
    },
    FrameFailed {
        frame_number: u64,
        reason: String,
    },
    Stopped,
}

impl RendererEvent {
    pub fn frame_number(&self) -> Option<u64> {
        match self {
            RendererEvent::FrameRendered { frame_number, .. }
            | RendererEvent::FrameFailed { frame_number, .. } => Some(*frame_number),
            RendererEvent::Stopped => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RendererError {
    #[error("renderer creation failed: {0}")]
    CreationFailed(String),
    #[error("invalid renderer parameters: {0}")]
    InvalidParameters(String),
    #[error("renderer is not running")]
    NotRunning,
    #[error("renderer is already running")]
    AlreadyRunning,
    #[error("renderer has no viewport configured")]
    NotConfigured,
    #[error("renderer has no scene")]
    NoScene,
    #[error("render thread disconnected")]
    Disconnected,
    #[error("frame {frame_number} failed: {reason}")]
    FrameFailed { frame_number: u64, reason: String },
    #[error("no frame buffer available: {0}")]
    FrameUnavailable(String),
    #[error("no completion for frame {frame_number} within {timeout:?}")]
    Timeout { frame_number: u64, timeout: Duration },
}

impl RendererError {
    /// Errors after which no further frame can be rendered.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RendererError::NotRunning
                | RendererError::Disconnected
                | RendererError::NotConfigured
                | RendererError::NoScene
        )
    }
}
