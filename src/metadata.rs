use crate::enums::AnalysisStatus;
use crate::volume::Volume;

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Description of a loaded volume
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeMetadata {
    pub dimensions: usize,
    pub shape: Vec<usize>,
    pub affine: Vec<Vec<f64>>,
    pub header_info: Map<String, Value>,
}

impl From<&Volume> for VolumeMetadata {
    fn from(volume: &Volume) -> Self {
        Self {
            dimensions: volume.rank(),
            shape: volume.shape().to_vec(),
            affine: volume.affine().iter().map(|row| row.to_vec()).collect(),
            header_info: volume.header().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedMetadata {
    #[serde(flatten)]
    pub volume: VolumeMetadata,
    pub original_path: PathBuf,
    pub output_path: PathBuf,
    pub rotation_angle: i32,
    pub analysis_status: AnalysisStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedMetadata {
    pub nifti_path: PathBuf,
    pub analysis_status: AnalysisStatus,
    pub error_details: String,
}

/// Metadata half of a tool result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolMetadata {
    Completed(CompletedMetadata),
    Failed(FailedMetadata),
}

impl ToolMetadata {
    pub fn analysis_status(&self) -> AnalysisStatus {
        match self {
            ToolMetadata::Completed(metadata) => metadata.analysis_status,
            ToolMetadata::Failed(metadata) => metadata.analysis_status,
        }
    }
}

/// Output half of a tool result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolResult {
    Image { image_path: PathBuf },
    Error { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::IDENTITY;
    use ndarray::Array3;
    use serde_json::json;

    #[test]
    fn completed_metadata_is_flat() {
        let data = Array3::<f64>::zeros((4, 4, 2)).into_dyn();
        let mut header = Map::new();
        header.insert("datatype".into(), json!(16));
        let volume = Volume::new(data, IDENTITY, header).unwrap();

        let metadata = ToolMetadata::Completed(CompletedMetadata {
            volume: VolumeMetadata::from(&volume),
            original_path: PathBuf::from("scan.nii"),
            output_path: PathBuf::from("/tmp/processed_nifti_0badcafe.png"),
            rotation_angle: 90,
            analysis_status: AnalysisStatus::Completed,
        });

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["dimensions"], 3);
        assert_eq!(value["shape"], json!([4, 4, 2]));
        assert_eq!(value["affine"][3], json!([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(value["header_info"]["datatype"], 16);
        assert_eq!(value["rotation_angle"], 90);
        assert_eq!(value["analysis_status"], "completed");
    }

    #[test]
    fn failed_metadata_and_error_result() {
        let metadata = ToolMetadata::Failed(FailedMetadata {
            nifti_path: PathBuf::from("missing.nii"),
            analysis_status: AnalysisStatus::Failed,
            error_details: "Input file not found: missing.nii".into(),
        });
        assert_eq!(metadata.analysis_status(), AnalysisStatus::Failed);
        assert_eq!(
            serde_json::to_value(&metadata).unwrap(),
            json!({
                "nifti_path": "missing.nii",
                "analysis_status": "failed",
                "error_details": "Input file not found: missing.nii",
            })
        );

        let result = ToolResult::Error {
            error: "boom".into(),
        };
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({ "error": "boom" }));
    }
}
