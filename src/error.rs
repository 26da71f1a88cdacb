//! Error taxonomy for a capture run.
//!
//! Only [`CaptureError`] is fatal. Normalization, frame capture and persist
//! failures are reported and the run carries on.

use std::path::PathBuf;
use std::time::Duration;

use crate::renderer::RendererError;

/// Invalid command-line configuration. Raised before anything is rendered.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("--{flag} must be {expected} (got {value})")]
    OutOfRange {
        flag: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("failed to read pass materials from {path}: {source}")]
    PassMaterialsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pass materials file {path}: {source}")]
    PassMaterialsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The asset could not be turned into a scene. The run aborts.
#[derive(Debug, thiserror::Error)]
pub enum AssetLoadError {
    #[error("couldn't read scene {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't parse scene {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid scene {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Normalization was not applied; the root transform is left untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizationSkipped {
    #[error("model has zero size - cannot normalize")]
    ZeroSize,

    #[error("model has invalid dimensions (largest extent {max_dimension}) - cannot normalize")]
    InvalidDimensions { max_dimension: f32 },
}

/// A single frame could not be captured and is skipped.
#[derive(Debug, thiserror::Error)]
pub enum FrameCaptureError {
    #[error("frame {frame}: render request failed: {source}")]
    Request {
        frame: usize,
        #[source]
        source: RendererError,
    },

    #[error("frame {frame}: no completion after {timeout:?}")]
    Timeout { frame: usize, timeout: Duration },

    #[error("frame {frame}: frame buffer unavailable: {source}")]
    BufferUnavailable {
        frame: usize,
        #[source]
        source: RendererError,
    },
}

impl FrameCaptureError {
    pub fn frame(&self) -> usize {
        match self {
            FrameCaptureError::Request { frame, .. }
            | FrameCaptureError::Timeout { frame, .. }
            | FrameCaptureError::BufferUnavailable { frame, .. } => *frame,
        }
    }
}

/// Encoding or writing one image failed. Reported per file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to save image to {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("frame buffer for {path} is {actual} bytes, expected {expected}")]
    BufferSize {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("save worker for {path} stopped before finishing: {reason}")]
    Worker { path: PathBuf, reason: String },
}

/// `metadata.json` could not be produced. Fatal after rendering.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write metadata to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    AssetLoad(#[from] AssetLoadError),

    #[error("couldn't create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer failure: {0}")]
    Renderer(#[from] RendererError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}
