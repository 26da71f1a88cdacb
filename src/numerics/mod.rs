// src/numerics/mod.rs
// Top-level numerics module. Exposes a `types` namespace with submodules.

pub mod types {
    // The submodules live in src/numerics/types/*.rs
    pub mod aabb;
    pub mod matrix;
    pub mod traits;
    pub mod transform;
    pub mod vector;
}

pub use types::aabb::Aabb;
pub use types::matrix::Matrix3x3;
pub use types::transform::Transform;
pub use types::vector::Vector3;
