// src/numerics/types/transform.rs
// Affine transform: a 3x3 basis (rotation/scale) plus an origin.

use super::matrix::Matrix3x3;
use super::vector::Vector3;

const PARALLEL_EPSILON: f32 = 1e-10;

/// Affine 3D transform. Columns of `basis` are the local X, Y and Z axes
/// expressed in the parent space; `origin` is the translation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub basis: Matrix3x3,
    pub origin: Vector3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        basis: Matrix3x3 {
            data: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        },
        origin: Vector3 { x: 0.0, y: 0.0, z: 0.0 },
    };

    pub fn new(basis: Matrix3x3, origin: Vector3) -> Self {
        Self { basis, origin }
    }

    pub fn from_translation(translation: Vector3) -> Self {
        Self::new(Matrix3x3::identity(), translation)
    }

    /// Translation followed by a per-axis scale of the basis.
    pub fn from_translation_scale(translation: Vector3, scale: Vector3) -> Self {
        Self::new(Matrix3x3::from_diagonal(scale), translation)
    }

    /// Camera-style transform placed at `eye` whose -Z axis points at `target`.
    ///
    /// Columns of the basis are right, up and backward (the negated
    /// forward direction). When `up` is parallel to the view direction the
    /// +Z axis is used instead (then +X). Returns
    /// `None` when `eye` and `target` coincide.
    pub fn looking_at(eye: Vector3, target: Vector3, up: Vector3) -> Option<Self> {
        let forward = (target - eye).try_normalize()?;
        let backward = -forward;

        let right = [up, Vector3::new(0.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0)]
            .iter()
            .map(|candidate| candidate.cross(&backward))
            .find(|right| right.length_squared() > PARALLEL_EPSILON)?
            .try_normalize()?;
        let true_up = backward.cross(&right);

        Some(Self::new(Matrix3x3::from_columns(right, true_up, backward), eye))
    }

    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        self.basis * point + self.origin
    }

    /// Inverse of a transform whose basis is orthonormal (rigid motion).
    pub fn orthonormal_inverse(&self) -> Self {
        let basis = self.basis.transpose();
        Self::new(basis, -(basis * self.origin))
    }

    /// `self * child`: applies `child` first, then `self`.
    pub fn compose(&self, child: &Transform) -> Self {
        Self::new(self.basis * child.basis, self.transform_point(child.origin))
    }

    /// Row-major 4x4 matrix with the basis columns in the upper-left block,
    /// the origin in the last column and a fixed `(0, 0, 0, 1)` bottom row.
    pub fn to_rows(&self) -> [[f32; 4]; 4] {
        let b = &self.basis.data;
        [
            [b[0][0], b[0][1], b[0][2], self.origin.x],
            [b[1][0], b[1][1], b[1][2], self.origin.y],
            [b[2][0], b[2][1], b[2][2], self.origin.z],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }
}
