//! Frame-level types shared by every renderer backend.

use std::sync::Arc;
use std::time::Duration;

use crate::numerics::{Transform, Vector3};
use crate::renderer::{AsyncEventReceiver, RendererError, RendererEvent};

/// Output size and projection of a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl ViewportConfig {
    pub fn square(resolution: u32, fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            width: resolution,
            height: resolution,
            fov_degrees,
            near,
            far,
        }
    }

    pub fn validate(&self) -> Result<(), RendererError> {
        if self.width == 0 || self.height == 0 {
            return Err(RendererError::InvalidParameters(format!(
                "viewport must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(RendererError::InvalidParameters(format!(
                "fov must be between 0 and 180 degrees, got {}",
                self.fov_degrees
            )));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(RendererError::InvalidParameters(format!(
                "clip range must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        Ok(())
    }
}

/// Camera placement as a camera-to-world transform. The camera looks down
/// its local -Z axis with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub camera_to_world: Transform,
}

impl CameraPose {
    pub const UP: Vector3 = Vector3 { x: 0.0, y: 1.0, z: 0.0 };

    /// Camera at `position` looking at the world origin with +Y up.
    ///
    /// A camera placed exactly at the origin has no view direction and keeps
    /// an unrotated basis.
    pub fn looking_at_origin(position: Vector3) -> Self {
        let camera_to_world = Transform::looking_at(position, Vector3::zero(), Self::UP)
            .unwrap_or_else(|| Transform::from_translation(position));
        Self { camera_to_world }
    }

    pub fn position(&self) -> Vector3 {
        self.camera_to_world.origin
    }

    pub fn world_to_camera(&self) -> Transform {
        self.camera_to_world.orthonormal_inverse()
    }
}

/// Immutable RGBA8 snapshot of a rendered frame. Cloning shares the pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    frame_number: u64,
    pixels: Arc<[u8]>,
}

impl FrameBuffer {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wraps raw RGBA8 pixels, row-major from the top-left corner. The
    /// length is not checked here; encoders reject mismatched buffers.
    pub fn from_rgba8(width: u32, height: u32, frame_number: u64, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            frame_number,
            pixels: pixels.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * Self::BYTES_PER_PIXEL
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        let bytes = self.pixels.get(offset..offset + Self::BYTES_PER_PIXEL)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Timing reported by the render thread for one completed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub frame_number: u64,
    pub frame_time_microseconds: u64,
    pub render_time_ns: u64,
}

/// Awaitable completion of one requested frame.
///
/// Events for earlier frames (for example one whose wait timed out) are
/// discarded while waiting.
#[derive(Debug)]
pub struct FrameCompletion {
    frame_number: u64,
    events: AsyncEventReceiver<RendererEvent>,
}

impl FrameCompletion {
    pub fn new(frame_number: u64, events: AsyncEventReceiver<RendererEvent>) -> Self {
        Self {
            frame_number,
            events,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub async fn wait(self) -> Result<FrameStats, RendererError> {
        loop {
            match self.events.recv().await {
                Ok(RendererEvent::FrameRendered {
                    frame_number,
                    frame_time_microseconds,
                    render_time_ns,
                    ..
                }) if frame_number == self.frame_number => {
                    return Ok(FrameStats {
                        frame_number,
                        frame_time_microseconds,
                        render_time_ns,
                    });
                }
                Ok(RendererEvent::FrameFailed {
                    frame_number,
                    reason,
                }) if frame_number == self.frame_number => {
                    return Err(RendererError::FrameFailed {
                        frame_number,
                        reason,
                    });
                }
                Ok(RendererEvent::Stopped) | Err(_) => return Err(RendererError::Disconnected),
                Ok(_) => continue,
            }
        }
    }

    /// Like [`FrameCompletion::wait`], giving up after `timeout` if one is set.
    pub async fn wait_timeout(self, timeout: Option<Duration>) -> Result<FrameStats, RendererError> {
        let frame_number = self.frame_number;
        match timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.wait())
                .await
                .map_err(|_| RendererError::Timeout {
                    frame_number,
                    timeout,
                })?,
            None => self.wait().await,
        }
    }
}
