//! Shading passes and the template materials that drive them.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scene::{MaterialValue, Shader, ShaderMaterial};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// Scene rendered with its own materials.
    Color,
    Albedo,
    DepthNormals,
    /// Occlusion, roughness and metallic packed into RGB.
    Orm,
}

impl Pass {
    /// Every pass, in the order a run renders them.
    pub const ALL: [Pass; 4] = [Pass::Color, Pass::Albedo, Pass::DepthNormals, Pass::Orm];

    /// Output file prefix.
    ///
    /// ORM frames are written under the `Albedo` prefix, so requesting both
    /// passes overwrites the albedo frames.
    pub fn prefix(self) -> &'static str {
        match self {
            Pass::Color => "Color",
            Pass::Albedo => "Albedo",
            Pass::DepthNormals => "DepthNormals",
            Pass::Orm => "Albedo",
        }
    }

    /// Command-line flag selecting the pass.
    pub fn flag(self) -> &'static str {
        match self {
            Pass::Color => "lit",
            Pass::Albedo => "albedo",
            Pass::DepthNormals => "depth_normals",
            Pass::Orm => "orm",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// Shader template as written in a pass materials file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    pub name: String,
    pub uniforms: Vec<String>,
    #[serde(default)]
    pub parameters: std::collections::BTreeMap<String, MaterialValue>,
}

impl TemplateManifest {
    fn into_material(self) -> ShaderMaterial {
        let mut material = ShaderMaterial::new(Arc::new(Shader::new(self.name, self.uniforms)));
        for (name, value) in self.parameters {
            material.set_shader_parameter(&name, value);
        }
        material
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassMaterialsManifest {
    #[serde(default)]
    pub albedo: Option<TemplateManifest>,
    #[serde(default)]
    pub depth_normals: Option<TemplateManifest>,
    #[serde(default)]
    pub orm: Option<TemplateManifest>,
}

/// The template material applied for each non-color pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassMaterials {
    pub albedo: ShaderMaterial,
    pub depth_normals: ShaderMaterial,
    pub orm: ShaderMaterial,
}

impl Default for PassMaterials {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PassMaterials {
    /// Templates whose uniforms mirror standard PBR material property names,
    /// so those properties carry over from the original materials.
    pub fn builtin() -> Self {
        let albedo = Shader::new(
            "albedo_pass",
            ["albedo_color", "albedo_texture", "uv1_scale", "uv1_offset"],
        );
        let depth_normals = Shader::new(
            "depth_normals_pass",
            ["normal_enabled", "normal_texture", "normal_scale", "uv1_scale", "uv1_offset"],
        );
        let orm = Shader::new(
            "orm_pass",
            [
                "ao_texture",
                "ao_light_affect",
                "roughness",
                "roughness_texture",
                "metallic",
                "metallic_texture",
                "uv1_scale",
                "uv1_offset",
            ],
        );

        Self {
            albedo: ShaderMaterial::new(Arc::new(albedo))
                .with_parameter("albedo_color", MaterialValue::Color([1.0, 1.0, 1.0, 1.0])),
            depth_normals: ShaderMaterial::new(Arc::new(depth_normals)),
            orm: ShaderMaterial::new(Arc::new(orm))
                .with_parameter("roughness", MaterialValue::Float(1.0))
                .with_parameter("metallic", MaterialValue::Float(0.0)),
        }
    }

    /// Built-in templates with any replacements from `manifest`.
    pub fn from_manifest(manifest: PassMaterialsManifest) -> Self {
        let builtin = Self::builtin();
        Self {
            albedo: manifest.albedo.map_or(builtin.albedo, TemplateManifest::into_material),
            depth_normals: manifest
                .depth_normals
                .map_or(builtin.depth_normals, TemplateManifest::into_material),
            orm: manifest.orm.map_or(builtin.orm, TemplateManifest::into_material),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::PassMaterialsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: PassMaterialsManifest =
            serde_json::from_str(&source).map_err(|source| ConfigError::PassMaterialsFormat {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_manifest(manifest))
    }

    /// Template for `pass`, `None` for the color pass.
    pub fn template(&self, pass: Pass) -> Option<&ShaderMaterial> {
        match pass {
            Pass::Color => None,
            Pass::Albedo => Some(&self.albedo),
            Pass::DepthNormals => Some(&self.depth_normals),
            Pass::Orm => Some(&self.orm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_prefixes_and_flags() {
        assert_eq!(Pass::Color.prefix(), "Color");
        assert_eq!(Pass::DepthNormals.prefix(), "DepthNormals");
        assert_eq!(Pass::Color.flag(), "lit");
        assert_eq!(Pass::Orm.prefix(), Pass::Albedo.prefix());
        assert_eq!(Pass::Orm.to_string(), "orm");
    }

    #[test]
    fn test_templates() {
        let materials = PassMaterials::builtin();
        assert!(materials.template(Pass::Color).is_none());
        assert!(materials.template(Pass::Albedo).unwrap().shader().exposes("albedo_color"));
        assert!(materials.template(Pass::Orm).unwrap().shader().exposes("roughness"));
        for pass in Pass::ALL {
            assert_eq!(materials.template(pass).is_some(), pass != Pass::Color);
        }
    }

    #[test]
    fn test_load_replaces_only_given_templates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"albedo": {{"name": "flat", "uniforms": ["base_color"], "parameters": {{"base_color": {{"color": [1, 0, 0, 1]}}}}}}}}"#
        )
        .unwrap();

        let materials = PassMaterials::load(file.path()).unwrap();
        assert_eq!(materials.albedo.shader().name, "flat");
        assert_eq!(
            materials.albedo.shader_parameter("base_color"),
            Some(&MaterialValue::Color([1.0, 0.0, 0.0, 1.0]))
        );
        assert_eq!(materials.orm, PassMaterials::builtin().orm);
    }

    #[test]
    fn test_load_errors() {
        let missing = PassMaterials::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(ConfigError::PassMaterialsIo { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2").unwrap();
        let malformed = PassMaterials::load(file.path());
        assert!(matches!(malformed, Err(ConfigError::PassMaterialsFormat { .. })));
    }
}
