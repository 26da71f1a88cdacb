//! Scene model: node graph, materials, normalization and material overrides.

pub mod graph;
pub mod loader;
pub mod material;
pub mod material_override;
pub mod normalize;

pub use graph::{GeometryInstance, Mesh, Node, NodeKind, SceneGraph, Surface};
pub use loader::{AssetLoader, JsonSceneLoader};
pub use material::{
    Material, MaterialId, MaterialLibrary, MaterialValue, Shader, ShaderMaterial, StandardMaterial,
};
pub use material_override::{apply_override, MaterialOverrideCache, MaterialOverrideEngine, OverrideReport};
pub use normalize::{AssetNormalizer, Normalization};
