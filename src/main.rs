use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use speculum::capture::{CaptureSession, PngEncoder, RunSummary};
use speculum::renderer::CpuReferenceRenderer;
use speculum::scene::JsonSceneLoader;
use speculum::{CaptureConfig, Cli};

const EXIT_RUNTIME_ERROR: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Prints usage and exits with 0 for --help, 2 for bad or missing flags.
    let cli = Cli::parse();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("{error}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    match run(config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

async fn run(config: CaptureConfig) -> anyhow::Result<RunSummary> {
    let model = config.model.clone();
    let session = CaptureSession::new(config);
    let mut renderer = CpuReferenceRenderer::new();

    session
        .run(&JsonSceneLoader::new(), &mut renderer, Arc::new(PngEncoder))
        .await
        .with_context(|| format!("capture of {} failed", model.display()))
}
