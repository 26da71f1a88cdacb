//! Asset loading.
//!
//! [`AssetLoader`] is the seam a capture session loads its asset through.
//! [`JsonSceneLoader`] reads a JSON scene manifest describing materials,
//! a node hierarchy and per-surface mesh bounds.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AssetLoadError;
use crate::numerics::{Aabb, Matrix3x3, Transform, Vector3};
use crate::scene::graph::{GeometryInstance, Mesh, Node, NodeKind, SceneGraph, Surface};
use crate::scene::material::{
    MaterialId, MaterialLibrary, MaterialValue, Shader, ShaderMaterial, StandardMaterial,
};

#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<SceneGraph, AssetLoadError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneManifest {
    #[serde(default)]
    pub materials: Vec<MaterialManifest>,
    pub root: NodeManifest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialManifest {
    Standard {
        name: String,
        #[serde(default)]
        properties: BTreeMap<String, MaterialValue>,
    },
    Shader {
        name: String,
        uniforms: Vec<String>,
        #[serde(default)]
        parameters: BTreeMap<String, MaterialValue>,
    },
}

impl MaterialManifest {
    fn name(&self) -> &str {
        match self {
            MaterialManifest::Standard { name, .. } | MaterialManifest::Shader { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKindManifest {
    Geometry,
    Group,
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformManifest {
    #[serde(default)]
    pub translation: Option<Vector3>,
    /// Row-major rotation basis, identity when absent.
    #[serde(default)]
    pub basis: Option<Matrix3x3>,
    #[serde(default)]
    pub scale: Option<Vector3>,
}

impl TransformManifest {
    fn to_transform(&self) -> Transform {
        let basis = self.basis.unwrap_or_else(Matrix3x3::identity);
        let scale = Matrix3x3::from_diagonal(self.scale.unwrap_or_else(Vector3::one));
        Transform::new(basis * scale, self.translation.unwrap_or_else(Vector3::zero))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeManifest {
    pub name: String,
    pub kind: NodeKindManifest,
    #[serde(default)]
    pub transform: TransformManifest,
    #[serde(default)]
    pub mesh: Option<MeshManifest>,
    #[serde(default)]
    pub children: Vec<NodeManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshManifest {
    pub name: String,
    pub surfaces: Vec<SurfaceManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceManifest {
    /// Name of an entry in the manifest's `materials`.
    #[serde(default)]
    pub material: Option<String>,
    /// Minimum corner of the mesh-local bounds.
    pub position: Vector3,
    pub size: Vector3,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSceneLoader;

impl JsonSceneLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parses and validates a manifest. `path` is only used in errors.
    pub fn parse(&self, source: &str, path: &Path) -> Result<SceneGraph, AssetLoadError> {
        let manifest: SceneManifest =
            serde_json::from_str(source).map_err(|source| AssetLoadError::Format {
                path: path.to_path_buf(),
                source,
            })?;
        SceneBuilder::new(path).build(manifest)
    }
}

#[async_trait]
impl AssetLoader for JsonSceneLoader {
    async fn load(&self, path: &Path) -> Result<SceneGraph, AssetLoadError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AssetLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        self.parse(&source, path)
    }
}

struct SceneBuilder {
    path: PathBuf,
    materials: MaterialLibrary,
    by_name: HashMap<String, MaterialId>,
}

impl SceneBuilder {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            materials: MaterialLibrary::new(),
            by_name: HashMap::new(),
        }
    }

    fn invalid(&self, reason: String) -> AssetLoadError {
        AssetLoadError::Invalid {
            path: self.path.clone(),
            reason,
        }
    }

    fn build(mut self, manifest: SceneManifest) -> Result<SceneGraph, AssetLoadError> {
        for material in manifest.materials {
            let name = material.name().to_string();
            if self.by_name.contains_key(&name) {
                return Err(self.invalid(format!("duplicate material '{name}'")));
            }
            let id = match material {
                MaterialManifest::Standard { name, properties } => {
                    self.materials.insert(StandardMaterial { name, properties })
                }
                MaterialManifest::Shader {
                    name,
                    uniforms,
                    parameters,
                } => {
                    let mut shader_material = ShaderMaterial::new(Arc::new(Shader::new(name.clone(), uniforms)));
                    for (parameter, value) in parameters {
                        if !shader_material.set_shader_parameter(&parameter, value) {
                            return Err(self.invalid(format!(
                                "material '{name}' sets '{parameter}', which its shader does not expose"
                            )));
                        }
                    }
                    self.materials.insert(shader_material)
                }
            };
            self.by_name.insert(name, id);
        }

        let root = self.build_node(manifest.root)?;
        Ok(SceneGraph::new(root, self.materials))
    }

    fn build_node(&self, manifest: NodeManifest) -> Result<Node, AssetLoadError> {
        let kind = match manifest.kind {
            NodeKindManifest::Geometry => {
                let mesh = match manifest.mesh {
                    Some(mesh) => Some(self.build_mesh(mesh)?),
                    None => None,
                };
                NodeKind::Geometry(GeometryInstance::new(mesh))
            }
            NodeKindManifest::Group | NodeKindManifest::Other if manifest.mesh.is_some() => {
                return Err(self.invalid(format!(
                    "node '{}' has a mesh but is not a geometry node",
                    manifest.name
                )));
            }
            NodeKindManifest::Group => NodeKind::Group,
            NodeKindManifest::Other => NodeKind::Other,
        };

        let mut node = Node::new(manifest.name, kind).with_transform(manifest.transform.to_transform());
        for child in manifest.children {
            node.add_child(self.build_node(child)?);
        }
        Ok(node)
    }

    fn build_mesh(&self, manifest: MeshManifest) -> Result<Mesh, AssetLoadError> {
        let mut surfaces = Vec::with_capacity(manifest.surfaces.len());
        for (index, surface) in manifest.surfaces.into_iter().enumerate() {
            let size = surface.size;
            if size.x < 0.0 || size.y < 0.0 || size.z < 0.0 {
                return Err(self.invalid(format!(
                    "mesh '{}' surface {index} has negative size",
                    manifest.name
                )));
            }
            let material = match surface.material {
                Some(name) => Some(self.by_name.get(&name).copied().ok_or_else(|| {
                    self.invalid(format!(
                        "mesh '{}' surface {index} references unknown material '{name}'",
                        manifest.name
                    ))
                })?),
                None => None,
            };
            surfaces.push(Surface {
                material,
                bounds: Aabb::from_position_size(surface.position, size),
            });
        }
        Ok(Mesh::new(manifest.name, surfaces))
    }
}
