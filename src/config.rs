//! Command line parsing and the frozen [`CaptureConfig`].

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::capture::pass::{Pass, PassMaterials};
use crate::error::ConfigError;

/// Raw command line. Long flags keep their underscored names.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "speculum",
    about = "Render a calibrated multi-view dataset of a 3D asset",
    long_about = "Samples camera views on a sphere around a normalized asset, renders the \
        selected passes from every view and writes metadata.json with per-view \
        camera intrinsics and extrinsics.",
    version
)]
pub struct Cli {
    /// The scene file to render.
    #[arg(long)]
    pub model: PathBuf,

    /// The folder where the renders are saved.
    #[arg(long = "output_path")]
    pub output_path: PathBuf,

    /// Number of views to render.
    #[arg(long = "n_views", default_value_t = 150, allow_negative_numbers = true)]
    pub n_views: i64,

    /// The resolution of the renders.
    #[arg(long, default_value_t = 512)]
    pub resolution: u32,

    /// The distance of the camera to the origin.
    #[arg(long, default_value_t = 1.9)]
    pub distance: f32,

    /// The field of view of the camera in degrees.
    #[arg(long, default_value_t = 50.0)]
    pub fov: f32,

    /// Far clip distance, written as each view's depth range.
    #[arg(long, default_value_t = 4000.0)]
    pub far: f32,

    /// Near clip distance.
    #[arg(long, default_value_t = 0.05)]
    pub near: f32,

    /// Render lit mesh.
    #[arg(long)]
    pub lit: bool,

    /// Render albedos.
    #[arg(long)]
    pub albedo: bool,

    /// Render depth/normals (alpha channel is depth).
    #[arg(long = "depth_normals")]
    pub depth_normals: bool,

    /// Render occlusion/roughness/metallic maps.
    #[arg(long)]
    pub orm: bool,

    /// JSON file replacing the built-in pass template shaders.
    #[arg(long = "pass_materials")]
    pub pass_materials: Option<PathBuf>,

    /// Number of concurrent image saves [default: number of CPUs].
    #[arg(long)]
    pub workers: Option<usize>,

    /// Give up on a frame whose render does not complete in time.
    #[arg(long = "frame_timeout_ms")]
    pub frame_timeout_ms: Option<u64>,
}

/// Validated run configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    pub model: PathBuf,
    pub output_dir: PathBuf,
    pub n_views: i64,
    pub resolution: u32,
    pub distance: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Selected passes, in render order.
    pub passes: Vec<Pass>,
    pub pass_materials: PassMaterials,
    pub workers: usize,
    pub frame_timeout: Option<Duration>,
}

impl CaptureConfig {
    /// Configuration with every optional setting at its default and no
    /// passes selected.
    pub fn new(model: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            output_dir: output_dir.into(),
            n_views: 150,
            resolution: 512,
            distance: 1.9,
            fov_degrees: 50.0,
            near: 0.05,
            far: 4000.0,
            passes: Vec::new(),
            pass_materials: PassMaterials::builtin(),
            workers: num_cpus::get(),
            frame_timeout: None,
        }
    }

    pub fn with_passes(mut self, passes: impl IntoIterator<Item = Pass>) -> Self {
        let selected: Vec<Pass> = passes.into_iter().collect();
        self.passes = Pass::ALL.into_iter().filter(|pass| selected.contains(pass)).collect();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution == 0 {
            return Err(out_of_range("resolution", "greater than 0", self.resolution));
        }
        if !(self.distance.is_finite() && self.distance > 0.0) {
            return Err(out_of_range("distance", "a positive number", self.distance));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(out_of_range("fov", "between 0 and 180 degrees", self.fov_degrees));
        }
        if !(self.near.is_finite() && self.near > 0.0) {
            return Err(out_of_range("near", "a positive number", self.near));
        }
        if self.far.is_nan() || self.far <= self.near {
            return Err(out_of_range("far", "greater than --near", self.far));
        }
        if self.workers == 0 {
            return Err(out_of_range("workers", "at least 1", self.workers));
        }
        Ok(())
    }
}

impl Cli {
    /// Validates the flags and loads the pass materials file, if any.
    pub fn into_config(self) -> Result<CaptureConfig, ConfigError> {
        let passes = Pass::ALL
            .into_iter()
            .filter(|pass| match pass {
                Pass::Color => self.lit,
                Pass::Albedo => self.albedo,
                Pass::DepthNormals => self.depth_normals,
                Pass::Orm => self.orm,
            })
            .collect();

        let pass_materials = match &self.pass_materials {
            Some(path) => PassMaterials::load(path)?,
            None => PassMaterials::builtin(),
        };

        let config = CaptureConfig {
            model: self.model,
            output_dir: self.output_path,
            n_views: self.n_views,
            resolution: self.resolution,
            distance: self.distance,
            fov_degrees: self.fov,
            near: self.near,
            far: self.far,
            passes,
            pass_materials,
            workers: self.workers.unwrap_or_else(num_cpus::get),
            frame_timeout: self.frame_timeout_ms.map(Duration::from_millis),
        };
        config.validate()?;
        Ok(config)
    }
}

fn out_of_range(flag: &'static str, expected: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::OutOfRange {
        flag,
        expected,
        value: value.to_string(),
    }
}
