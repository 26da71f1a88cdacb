//! speculum: calibrated multi-view dataset capture.
//!
//! Samples camera views on a sphere around a normalized asset, renders the
//! selected shading passes from every view, saves each frame asynchronously
//! and writes per-view camera calibration to `metadata.json`.

pub mod capture;
pub mod config;
pub mod error;
pub mod numerics;
pub mod renderer;
pub mod scene;

pub use capture::{CaptureSession, Pass, RunSummary};
pub use config::{CaptureConfig, Cli};
pub use error::CaptureError;
pub use renderer::async_communication::{AsyncChannelConfig, AsyncEventReceiver};
pub use renderer::{CpuReferenceRenderer, Renderer};
