//! The capture pipeline: views, passes, calibration, persistence and the
//! session that ties them together.

pub mod calibration;
pub mod metadata;
pub mod pass;
pub mod persist;
pub mod pipeline;
pub mod session;
pub mod views;

pub use calibration::{calibrate, CameraCalibration, CameraCalibrator};
pub use metadata::{DatasetMetadata, MetadataWriter, METADATA_FILE_NAME, METADATA_VERSION};
pub use pass::{Pass, PassMaterials};
pub use persist::{CaptureTask, ImageEncoder, PersistReport, PngEncoder, SaveHandle, SavePool};
pub use pipeline::{CapturePipeline, PassOutcome};
pub use session::{CaptureSession, PassSummary, RunSummary};
pub use views::{View, ViewSampler};
