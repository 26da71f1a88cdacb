//! The dataset's `metadata.json` document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::capture::calibration::CameraCalibration;
use crate::error::MetadataError;

pub const METADATA_VERSION: u32 = 2;
pub const METADATA_FILE_NAME: &str = "metadata.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub version: u32,
    /// Tag of the renderer that produced the frames.
    pub source: String,
    /// One calibration per view, in sampling order.
    pub views: Vec<CameraCalibration>,
}

pub struct MetadataWriter;

impl MetadataWriter {
    pub fn assemble(version: u32, source: impl Into<String>, views: Vec<CameraCalibration>) -> DatasetMetadata {
        DatasetMetadata {
            version,
            source: source.into(),
            views,
        }
    }

    /// Compact JSON rendering of `document`.
    pub fn to_json(document: &DatasetMetadata) -> Result<String, MetadataError> {
        Ok(serde_json::to_string(document)?)
    }

    pub fn write(document: &DatasetMetadata, path: &Path) -> Result<(), MetadataError> {
        let json = Self::to_json(document)?;
        std::fs::write(path, json).map_err(|source| MetadataError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::calibration::CameraCalibrator;
    use crate::capture::views::ViewSampler;

    fn calibrations(count: i64) -> Vec<CameraCalibration> {
        let calibrator = CameraCalibrator::new(512, 50.0, 4000.0);
        ViewSampler::sample(count, 1.9)
            .iter()
            .map(|view| calibrator.calibrate(view.position))
            .collect()
    }

    #[test]
    fn test_assemble_keeps_view_order() {
        let views = calibrations(4);
        let document = MetadataWriter::assemble(METADATA_VERSION, "cpu_reference", views.clone());

        let value: serde_json::Value = serde_json::from_str(&MetadataWriter::to_json(&document).unwrap()).unwrap();
        assert_eq!(value["version"], 2);
        assert_eq!(value["source"], "cpu_reference");

        let entries = value["views"].as_array().unwrap();
        assert_eq!(entries.len(), 4);
        for (entry, calibration) in entries.iter().zip(&views) {
            assert!(!entry["extrinsics"].is_null());
            assert!(!entry["intrinsics"].is_null());
            assert_eq!(entry["extrinsics"][2][3], serde_json::json!(calibration.extrinsics[2][3]));
        }
    }

    #[test]
    fn test_write_roundtrip_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let document = MetadataWriter::assemble(METADATA_VERSION, "cpu_reference", calibrations(2));

        let path = dir.path().join(METADATA_FILE_NAME);
        MetadataWriter::write(&document, &path).unwrap();
        let read: DatasetMetadata = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, document);

        let unwritable = dir.path().join("missing").join(METADATA_FILE_NAME);
        assert!(matches!(
            MetadataWriter::write(&document, &unwritable),
            Err(MetadataError::Write { .. })
        ));
    }
}
