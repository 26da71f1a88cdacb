//! A full capture run: load, normalize, render every selected pass and
//! write the metadata document.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::capture::calibration::{CameraCalibration, CameraCalibrator};
use crate::capture::metadata::{MetadataWriter, METADATA_FILE_NAME, METADATA_VERSION};
use crate::capture::pass::Pass;
use crate::capture::persist::{ImageEncoder, SavePool};
use crate::capture::pipeline::CapturePipeline;
use crate::capture::views::{View, ViewSampler};
use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::renderer::{Renderer, ViewportConfig};
use crate::scene::{apply_override, AssetLoader, AssetNormalizer, Normalization, OverrideReport, SceneGraph};

const ASSET_ROOT_NAME: &str = "asset_root";

#[derive(Debug, Clone, PartialEq)]
pub struct PassSummary {
    pub pass: Pass,
    pub prefix: &'static str,
    pub dispatched: usize,
    pub saved: usize,
    pub persist_failures: usize,
    pub skipped: usize,
    pub overrides: Option<OverrideReport>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub views: usize,
    pub normalization: Option<Normalization>,
    pub passes: Vec<PassSummary>,
    pub metadata_path: PathBuf,
    pub load_elapsed: Duration,
    pub render_elapsed: Duration,
    pub total_elapsed: Duration,
}

impl RunSummary {
    pub fn frames_dispatched(&self) -> usize {
        self.passes.iter().map(|pass| pass.dispatched).sum()
    }

    pub fn frames_saved(&self) -> usize {
        self.passes.iter().map(|pass| pass.saved).sum()
    }

    pub fn persist_failures(&self) -> usize {
        self.passes.iter().map(|pass| pass.persist_failures).sum()
    }

    pub fn frames_skipped(&self) -> usize {
        self.passes.iter().map(|pass| pass.skipped).sum()
    }

    /// Saved frames per second of render time.
    pub fn images_per_second(&self) -> f64 {
        let seconds = self.render_elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.frames_saved() as f64 / seconds
        } else {
            0.0
        }
    }
}

pub struct CaptureSession {
    config: CaptureConfig,
}

impl CaptureSession {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Runs the whole capture. The renderer is started here and is always
    /// stopped before returning.
    pub async fn run<L, R>(
        &self,
        loader: &L,
        renderer: &mut R,
        encoder: Arc<dyn ImageEncoder>,
    ) -> Result<RunSummary, CaptureError>
    where
        L: AssetLoader + ?Sized,
        R: Renderer + ?Sized,
    {
        let result = self.capture(loader, renderer, encoder).await;
        renderer.stop();
        result
    }

    async fn capture<L, R>(
        &self,
        loader: &L,
        renderer: &mut R,
        encoder: Arc<dyn ImageEncoder>,
    ) -> Result<RunSummary, CaptureError>
    where
        L: AssetLoader + ?Sized,
        R: Renderer + ?Sized,
    {
        let config = &self.config;
        let started = Instant::now();

        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|source| CaptureError::OutputDirectory {
                path: config.output_dir.clone(),
                source,
            })?;

        tracing::info!(model = %config.model.display(), "Loading model...");
        let mut scene = loader.load(&config.model).await?.wrapped(ASSET_ROOT_NAME);
        let normalization = match AssetNormalizer::normalize(&mut scene.root) {
            Ok(normalization) => {
                tracing::debug!(scale = normalization.scale, "model normalized");
                Some(normalization)
            }
            Err(skipped) => {
                tracing::warn!(reason = %skipped, "normalization skipped");
                None
            }
        };
        let load_elapsed = started.elapsed();

        renderer.start()?;
        renderer.configure(ViewportConfig::square(
            config.resolution,
            config.fov_degrees,
            config.near,
            config.far,
        ))?;

        let views = ViewSampler::sample(config.n_views, config.distance);
        let calibrator = CameraCalibrator::new(config.resolution, config.fov_degrees, config.far);
        let calibrations: Vec<CameraCalibration> =
            views.iter().map(|view| calibrator.calibrate(view.position)).collect();

        if config.passes.is_empty() {
            tracing::warn!("no passes selected; only metadata will be written");
        }
        if config.passes.contains(&Pass::Albedo) && config.passes.contains(&Pass::Orm) {
            tracing::warn!(
                prefix = Pass::Orm.prefix(),
                "albedo and orm passes share an output prefix; orm frames overwrite albedo frames"
            );
        }

        let pool = SavePool::new(encoder, config.workers);
        let render_started = Instant::now();
        let mut passes = Vec::with_capacity(config.passes.len());
        for &pass in &config.passes {
            passes.push(self.render_pass(pass, &mut scene, &views, renderer, &pool).await?);
        }
        let render_elapsed = render_started.elapsed();

        tracing::info!("Saving render metadata...");
        let metadata = MetadataWriter::assemble(METADATA_VERSION, renderer.name(), calibrations);
        let metadata_path = config.output_dir.join(METADATA_FILE_NAME);
        MetadataWriter::write(&metadata, &metadata_path)?;

        let summary = RunSummary {
            views: views.len(),
            normalization,
            passes,
            metadata_path,
            load_elapsed,
            render_elapsed,
            total_elapsed: started.elapsed(),
        };
        tracing::info!(
            frames_dispatched = summary.frames_dispatched(),
            frames_saved = summary.frames_saved(),
            frames_skipped = summary.frames_skipped(),
            persist_failures = summary.persist_failures(),
            "Done!"
        );
        tracing::info!(" - Load elapsed: {:.3}s", summary.load_elapsed.as_secs_f64());
        tracing::info!(
            " - Render elapsed: {:.3}s ({:.2} images/s)",
            summary.render_elapsed.as_secs_f64(),
            summary.images_per_second()
        );
        tracing::info!(" - Total elapsed: {:.3}s", summary.total_elapsed.as_secs_f64());
        Ok(summary)
    }

    /// Applies the pass's materials, renders every view and waits for all
    /// of the pass's saves before returning.
    async fn render_pass<R>(
        &self,
        pass: Pass,
        scene: &mut SceneGraph,
        views: &[View],
        renderer: &mut R,
        pool: &SavePool,
    ) -> Result<PassSummary, CaptureError>
    where
        R: Renderer + ?Sized,
    {
        let overrides = match self.config.pass_materials.template(pass) {
            Some(template) => {
                let report = apply_override(scene, template);
                tracing::debug!(
                    pass = %pass,
                    duplicates = report.duplicates_created,
                    surfaces = report.surfaces_overridden,
                    "materials overridden"
                );
                Some(report)
            }
            None => {
                scene.clear_overrides();
                None
            }
        };
        renderer.set_scene(Arc::new(scene.clone()))?;

        let prefix = pass.prefix();
        tracing::info!(pass = %pass, "Rendering {prefix}...");
        let outcome = CapturePipeline::new(&*renderer, pool)
            .with_frame_timeout(self.config.frame_timeout)
            .run_pass(views, prefix, &self.config.output_dir)
            .await;

        tracing::info!(pass = %pass, "Waiting for saving to wrap up...");
        let dispatched = outcome.handles.len();
        let report = SavePool::join_all(outcome.handles).await;

        if let Some(error) = outcome.aborted {
            return Err(error.into());
        }

        Ok(PassSummary {
            pass,
            prefix,
            dispatched,
            saved: report.saved.len(),
            persist_failures: report.failed.len(),
            skipped: outcome.skipped.len(),
            overrides,
            elapsed: outcome.elapsed,
        })
    }
}
