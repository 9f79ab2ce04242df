//! Single-slice tool used by an external agent framework.
//!
//! [`NiftiProcessor::run`] loads a volume, keeps its first slice (slice 0
//! of volume 0 for 4-D data), rotates and rescales it and writes it as a
//! randomly named PNG into the processor's temp directory. Every failure is
//! reported through the returned `(ToolResult, ToolMetadata)` pair; the
//! caller never sees an `Err` or a panic.

use crate::enums::{AnalysisStatus, Extent, PlaneIndex, Rotation};
use crate::metadata::{CompletedMetadata, FailedMetadata, ToolMetadata, ToolResult, VolumeMetadata};
use crate::pipeline::{PipelineError, render_plane};
use crate::volume_loader::VolumeLoader;
use crate::writer::ImageWriter;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_ROTATION_ANGLE: i32 = 90;

fn default_rotation_angle() -> Option<i32> {
    Some(DEFAULT_ROTATION_ANGLE)
}

/// Arguments accepted by the tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NiftiProcessorInput {
    /// Path to the NIfTI file (.nii or .nii.gz)
    pub nifti_path: PathBuf,
    /// Rotation angle for the output image (90, 180 or 270 degrees)
    #[serde(default = "default_rotation_angle")]
    pub rotation_angle: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NiftiProcessor {
    temp_dir: PathBuf,
}

impl NiftiProcessor {
    pub const NAME: &'static str = "nifti_processor";
    pub const DESCRIPTION: &'static str = "Processes NIfTI medical image files and converts them to standard image format. \
         Handles 3D and 4D NIfTI files, extracting 2D slices. \
         Currently configured to return only the first slice. \
         Input: Path to NIfTI file (.nii or .nii.gz) and optional rotation angle. \
         Output: Path to processed image file and NIfTI metadata.";

    /// Create a processor writing its images into `temp_dir`, which is
    /// created if missing.
    pub fn new(temp_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let temp_dir = temp_dir.into();
        std::fs::create_dir_all(&temp_dir)?;
        Ok(Self { temp_dir })
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Process `nifti_path` and return the image location and metadata.
    pub fn run(
        &self,
        nifti_path: impl AsRef<Path>,
        rotation_angle: i32,
    ) -> (ToolResult, ToolMetadata) {
        let nifti_path = nifti_path.as_ref();
        match self.process(nifti_path, rotation_angle) {
            Ok((output_path, volume)) => {
                info!("Processed {} into {}", nifti_path.display(), output_path.display());
                (
                    ToolResult::Image {
                        image_path: output_path.clone(),
                    },
                    ToolMetadata::Completed(CompletedMetadata {
                        volume,
                        original_path: nifti_path.to_path_buf(),
                        output_path,
                        rotation_angle,
                        analysis_status: AnalysisStatus::Completed,
                    }),
                )
            }
            Err(e) => {
                warn!("Failed to process {}: {e}", nifti_path.display());
                (
                    ToolResult::Error {
                        error: e.to_string(),
                    },
                    ToolMetadata::Failed(FailedMetadata {
                        nifti_path: nifti_path.to_path_buf(),
                        analysis_status: AnalysisStatus::Failed,
                        error_details: e.to_string(),
                    }),
                )
            }
        }
    }

    /// Same as [`run`](Self::run); completes without suspending.
    pub async fn arun(
        &self,
        nifti_path: impl AsRef<Path>,
        rotation_angle: i32,
    ) -> (ToolResult, ToolMetadata) {
        self.run(nifti_path, rotation_angle)
    }

    pub fn run_input(&self, input: &NiftiProcessorInput) -> (ToolResult, ToolMetadata) {
        self.run(
            &input.nifti_path,
            input.rotation_angle.unwrap_or(DEFAULT_ROTATION_ANGLE),
        )
    }

    fn process(
        &self,
        nifti_path: &Path,
        rotation_angle: i32,
    ) -> Result<(PathBuf, VolumeMetadata), PipelineError> {
        let rotation = Rotation::try_from(rotation_angle)?;
        let volume = VolumeLoader::load_from_path(nifti_path)?;
        let metadata = VolumeMetadata::from(&volume);

        let index = volume
            .plane_indices(Extent::First)
            .next()
            .unwrap_or(PlaneIndex {
                slice: 0,
                volume: None,
            });
        debug!("Extracting plane {index:?} of {:?}", volume.shape());
        let image = render_plane(&volume, index, rotation)?;

        std::fs::create_dir_all(&self.temp_dir).map_err(|source| PipelineError::CreateDir {
            path: self.temp_dir.clone(),
            source,
        })?;
        let output_path = self.temp_dir.join(ImageWriter::random_file_name());
        let output_path = ImageWriter::save(&image, output_path)?;
        Ok((output_path, metadata))
    }
}
