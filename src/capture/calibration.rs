//! Per-view camera calibration: pinhole intrinsics plus a camera-to-world
//! extrinsic matrix.

use serde::{Deserialize, Serialize};

use crate::numerics::{Matrix3x3, Vector3};
use crate::renderer::CameraPose;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraCalibration {
    /// Square image size in pixels.
    pub resolution: u32,
    /// Far clip distance of the camera.
    pub depth_range: f32,
    /// Row-major camera-to-world matrix.
    pub extrinsics: [[f32; 4]; 4],
    pub intrinsics: Matrix3x3,
}

/// Computes [`CameraCalibration`] records for a fixed camera setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCalibrator {
    pub resolution: u32,
    pub fov_degrees: f32,
    pub far: f32,
}

impl CameraCalibrator {
    pub fn new(resolution: u32, fov_degrees: f32, far: f32) -> Self {
        Self {
            resolution,
            fov_degrees,
            far,
        }
    }

    /// `resolution / (2 · tan(fov / 2))`
    pub fn focal_length_px(&self) -> f32 {
        self.resolution as f32 / (2.0 * (self.fov_degrees.to_radians() / 2.0).tan())
    }

    /// Square-pixel intrinsics with the principal point at the image center.
    ///
    /// The center is the exact half resolution, so an odd resolution such as
    /// 511 yields 255.5 rather than the integer-truncated 255.
    pub fn intrinsics(&self) -> Matrix3x3 {
        let focal = self.focal_length_px();
        let center = self.resolution as f32 / 2.0;
        Matrix3x3::from_rows([focal, 0.0, center], [0.0, focal, center], [0.0, 0.0, 1.0])
    }

    pub fn calibrate(&self, position: Vector3) -> CameraCalibration {
        CameraCalibration {
            resolution: self.resolution,
            depth_range: self.far,
            extrinsics: CameraPose::looking_at_origin(position).camera_to_world.to_rows(),
            intrinsics: self.intrinsics(),
        }
    }
}

pub fn calibrate(position: Vector3, resolution: u32, fov_degrees: f32, far: f32) -> CameraCalibration {
    CameraCalibrator::new(resolution, fov_degrees, far).calibrate(position)
}
