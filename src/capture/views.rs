//! Deterministic camera positions on a sphere around the origin.

use std::f64::consts::PI;

use crate::numerics::Vector3;
use crate::renderer::CameraPose;

/// A camera position. Orientation is always "look at the origin".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub position: Vector3,
}

impl View {
    pub fn pose(&self) -> CameraPose {
        CameraPose::looking_at_origin(self.position)
    }
}

pub struct ViewSampler;

impl ViewSampler {
    /// `π·(3 − √5)`
    pub fn golden_angle() -> f64 {
        PI * (3.0 - 5.0_f64.sqrt())
    }

    /// Fibonacci-sphere sampling of `count` positions at distance `radius`.
    ///
    /// z runs from +1 down to -1 across the sequence while the azimuth
    /// advances by the golden angle. A single view sits at the +Z pole;
    /// `count <= 0` yields no views.
    ///
    /// # Example
    /// ```
    /// use speculum::capture::ViewSampler;
    ///
    /// let views = ViewSampler::sample(4, 2.0);
    /// assert_eq!(views.len(), 4);
    /// assert!((views[0].position.z - 2.0).abs() < 1e-6);
    /// assert!(ViewSampler::sample(-3, 2.0).is_empty());
    /// ```
    pub fn sample(count: i64, radius: f32) -> Vec<View> {
        if count <= 0 {
            return Vec::new();
        }

        let phi = Self::golden_angle();
        let radius = f64::from(radius);
        let last = (count - 1) as f64;

        (0..count)
            .map(|i| {
                let i = i as f64;
                let z = if count == 1 { 1.0 } else { 1.0 - (i / last) * 2.0 };
                let radius_at_z = (1.0 - z * z).max(0.0).sqrt();
                let theta = phi * i;
                View {
                    position: Vector3::new(
                        (theta.cos() * radius_at_z * radius) as f32,
                        (theta.sin() * radius_at_z * radius) as f32,
                        (z * radius) as f32,
                    ),
                }
            })
            .collect()
    }
}
