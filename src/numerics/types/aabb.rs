// src/numerics/types/aabb.rs
// Axis-aligned bounding box.

use super::transform::Transform;
use super::vector::Vector3;

/// Axis-aligned bounding box stored as inclusive min/max corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb {
    /// Box spanning two corners given in any order.
    pub fn new(a: Vector3, b: Vector3) -> Self {
        Self {
            min: a.min_components(b),
            max: a.max_components(b),
        }
    }

    /// Box from a minimum corner and a non-negative size.
    pub fn from_position_size(position: Vector3, size: Vector3) -> Self {
        Self::new(position, position + size)
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vector3 {
        self.min + self.size() / 2.0
    }

    /// True when every extent is exactly zero.
    pub fn has_zero_size(&self) -> bool {
        self.size() == Vector3::zero()
    }

    /// Smallest box containing both boxes.
    pub fn merge(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min_components(other.min),
            max: self.max.max_components(other.max),
        }
    }

    pub fn corners(&self) -> [Vector3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vector3::new(a.x, a.y, a.z),
            Vector3::new(b.x, a.y, a.z),
            Vector3::new(a.x, b.y, a.z),
            Vector3::new(b.x, b.y, a.z),
            Vector3::new(a.x, a.y, b.z),
            Vector3::new(b.x, a.y, b.z),
            Vector3::new(a.x, b.y, b.z),
            Vector3::new(b.x, b.y, b.z),
        ]
    }

    /// Axis-aligned bounds of this box after `transform`.
    pub fn transformed(&self, transform: &Transform) -> Aabb {
        let corners = self.corners();
        let first = transform.transform_point(corners[0]);
        corners[1..].iter().fold(Aabb::new(first, first), |bounds, corner| {
            let p = transform.transform_point(*corner);
            Aabb {
                min: bounds.min.min_components(p),
                max: bounds.max.max_components(p),
            }
        })
    }
}
