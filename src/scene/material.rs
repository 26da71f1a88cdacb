//! Materials, shaders and the material arena.
//!
//! Material identity is the arena index ([`MaterialId`]); two surfaces share a
//! material exactly when they hold the same id.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::numerics::Vector3;

/// Stable handle to a material stored in a [`MaterialLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "material#{}", self.0)
    }
}

/// A single material property or shader parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Vec3(Vector3),
    /// Linear RGBA in `[0, 1]`.
    Color([f32; 4]),
    /// Path of a texture resource.
    Texture(String),
}

/// A fixed-function surface material with named, externally readable properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StandardMaterial {
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, MaterialValue>,
}

impl StandardMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: MaterialValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}

/// A shader program description: only the uniform names matter here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shader {
    pub name: String,
    pub uniforms: Vec<String>,
}

impl Shader {
    pub fn new<I, S>(name: impl Into<String>, uniforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            uniforms: uniforms.into_iter().map(Into::into).collect(),
        }
    }

    pub fn exposes(&self, uniform: &str) -> bool {
        self.uniforms.iter().any(|name| name == uniform)
    }
}

/// A material driven by a [`Shader`] and a set of parameter values.
///
/// The shader itself is shared between duplicates; parameters are not.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderMaterial {
    shader: Arc<Shader>,
    parameters: BTreeMap<String, MaterialValue>,
}

impl ShaderMaterial {
    pub fn new(shader: Arc<Shader>) -> Self {
        Self {
            shader,
            parameters: BTreeMap::new(),
        }
    }

    pub fn shader(&self) -> &Arc<Shader> {
        &self.shader
    }

    /// Sets a parameter. Returns `false` (and stores nothing) when the
    /// shader does not expose a uniform with that name.
    pub fn set_shader_parameter(&mut self, name: &str, value: MaterialValue) -> bool {
        if !self.shader.exposes(name) {
            return false;
        }
        self.parameters.insert(name.to_string(), value);
        true
    }

    pub fn with_parameter(mut self, name: &str, value: MaterialValue) -> Self {
        self.set_shader_parameter(name, value);
        self
    }

    pub fn shader_parameter(&self, name: &str) -> Option<&MaterialValue> {
        self.parameters.get(name)
    }

    pub fn parameters(&self) -> &BTreeMap<String, MaterialValue> {
        &self.parameters
    }

    /// Independent copy: same shader, own parameter set.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Standard(StandardMaterial),
    Shader(ShaderMaterial),
}

impl Material {
    pub fn name(&self) -> &str {
        match self {
            Material::Standard(material) => &material.name,
            Material::Shader(material) => &material.shader.name,
        }
    }

    /// Every externally readable property, by name.
    pub fn properties(&self) -> Box<dyn Iterator<Item = (&str, &MaterialValue)> + '_> {
        match self {
            Material::Standard(material) => {
                Box::new(material.properties.iter().map(|(k, v)| (k.as_str(), v)))
            }
            Material::Shader(material) => {
                Box::new(material.parameters.iter().map(|(k, v)| (k.as_str(), v)))
            }
        }
    }

    pub fn property(&self, name: &str) -> Option<&MaterialValue> {
        match self {
            Material::Standard(material) => material.properties.get(name),
            Material::Shader(material) => material.shader_parameter(name),
        }
    }
}

impl From<StandardMaterial> for Material {
    fn from(material: StandardMaterial) -> Self {
        Material::Standard(material)
    }
}

impl From<ShaderMaterial> for Material {
    fn from(material: ShaderMaterial) -> Self {
        Material::Shader(material)
    }
}

/// Append-only arena of materials. Ids are never reused.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: impl Into<Material>) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material.into());
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        (id.0 as usize) < self.materials.len()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(index, material)| (MaterialId(index as u32), material))
    }
}
