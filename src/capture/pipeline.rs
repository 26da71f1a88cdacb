//! The per-pass capture loop.
//!
//! For each view, in order: place the camera, request a frame, await its
//! completion, snapshot the frame buffer and dispatch the save. The snapshot
//! of frame `i` is always taken before frame `i + 1` is requested.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::capture::persist::{CaptureTask, SaveHandle, SavePool};
use crate::capture::views::View;
use crate::error::FrameCaptureError;
use crate::renderer::{CameraPose, FrameBuffer, Renderer, RendererError};

/// What one pass left behind. The caller must pass `handles` to
/// [`SavePool::join_all`] before starting another pass.
#[derive(Debug)]
pub struct PassOutcome {
    pub handles: Vec<SaveHandle>,
    pub skipped: Vec<FrameCaptureError>,
    /// Set when the renderer became unusable; remaining views were not rendered.
    pub aborted: Option<RendererError>,
    pub elapsed: Duration,
}

pub struct CapturePipeline<'a, R: Renderer + ?Sized> {
    renderer: &'a R,
    pool: &'a SavePool,
    frame_timeout: Option<Duration>,
}

impl<'a, R: Renderer + ?Sized> CapturePipeline<'a, R> {
    pub fn new(renderer: &'a R, pool: &'a SavePool) -> Self {
        Self {
            renderer,
            pool,
            frame_timeout: None,
        }
    }

    pub fn with_frame_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.frame_timeout = timeout;
        self
    }

    /// Renders every view and dispatches one save to
    /// `output_dir/{prefix}_{index}.png` per captured frame.
    pub async fn run_pass(&self, views: &[View], prefix: &str, output_dir: &Path) -> PassOutcome {
        let started = Instant::now();
        let mut handles = Vec::with_capacity(views.len());
        let mut skipped = Vec::new();
        let mut aborted = None;

        for (index, view) in views.iter().enumerate() {
            tracing::debug!(frame = index, prefix, "rendering frame");
            match self.capture_frame(index, &view.pose()).await {
                Ok(buffer) => {
                    let path = output_dir.join(format!("{prefix}_{index}.png"));
                    handles.push(self.pool.dispatch(CaptureTask {
                        frame_index: index,
                        buffer,
                        path,
                    }));
                }
                Err(FrameCaptureError::Request { source, .. }) if source.is_fatal() => {
                    tracing::error!(frame = index, prefix, error = %source, "renderer unusable, aborting pass");
                    aborted = Some(source);
                    break;
                }
                Err(error) => {
                    tracing::warn!(frame = index, prefix, error = %error, "frame skipped");
                    skipped.push(error);
                }
            }
        }

        PassOutcome {
            handles,
            skipped,
            aborted,
            elapsed: started.elapsed(),
        }
    }

    async fn capture_frame(&self, index: usize, pose: &CameraPose) -> Result<FrameBuffer, FrameCaptureError> {
        let completion = self
            .renderer
            .request_frame(pose)
            .map_err(|source| FrameCaptureError::Request { frame: index, source })?;
        let requested = completion.frame_number();

        completion
            .wait_timeout(self.frame_timeout)
            .await
            .map_err(|source| match source {
                RendererError::Timeout { timeout, .. } => FrameCaptureError::Timeout { frame: index, timeout },
                source => FrameCaptureError::Request { frame: index, source },
            })?;

        let buffer = self
            .renderer
            .current_frame_buffer()
            .map_err(|source| FrameCaptureError::BufferUnavailable { frame: index, source })?;
        if buffer.frame_number() != requested {
            return Err(FrameCaptureError::BufferUnavailable {
                frame: index,
                source: RendererError::FrameUnavailable(format!(
                    "front buffer holds frame {}, expected {}",
                    buffer.frame_number(),
                    requested
                )),
            });
        }
        Ok(buffer)
    }
}
