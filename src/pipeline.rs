//! Shared extraction primitive used by both drivers.
//!
//! [`render_plane`] performs extract → rotate → normalize → image for one
//! plane and reports failures as a [`PipelineError`]. Whether a failure is
//! turned into a result record or propagated is up to the caller.

use crate::enums::{InvalidRotation, PlaneIndex, Rotation};
use crate::intensity::IntensityNormalizer;
use crate::orientation::rotate;
use crate::volume::Volume;
use crate::volume_loader::VolumeLoaderError;
use crate::writer::ImageWriter;

use image::GrayImage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Input file must be a NIfTI file (.nii or .nii.gz): {}", .0.display())]
    NotNifti(PathBuf),

    #[error(transparent)]
    InvalidRotation(#[from] InvalidRotation),

    #[error(transparent)]
    Load(#[from] VolumeLoaderError),

    #[error("Plane {index:?} is outside a volume of shape {shape:?}")]
    PlaneOutOfBounds { index: PlaneIndex, shape: Vec<usize> },

    #[error("Plane {0:?} has no pixels")]
    EmptyPlane(PlaneIndex),

    #[error("Could not create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not write image {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Coarse classification of a [`PipelineError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input path does not exist
    NotFound,
    /// The input is not a decodable 3-D/4-D NIfTI file
    Format,
    /// A caller-supplied parameter is out of range
    InvalidParameter,
    /// Anything else (extraction, disk writes)
    Other,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::NotFound(_) | PipelineError::Load(VolumeLoaderError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            PipelineError::NotNifti(_)
            | PipelineError::Load(
                VolumeLoaderError::Decode(_)
                | VolumeLoaderError::UnsupportedDimensions(_)
                | VolumeLoaderError::Shape(_),
            ) => ErrorKind::Format,
            PipelineError::InvalidRotation(_) => ErrorKind::InvalidParameter,
            PipelineError::PlaneOutOfBounds { .. }
            | PipelineError::EmptyPlane(_)
            | PipelineError::CreateDir { .. }
            | PipelineError::Write { .. } => ErrorKind::Other,
        }
    }
}

/// Extract the plane at `index`, rotate it and rescale it to an 8-bit image
pub fn render_plane(
    volume: &Volume,
    index: PlaneIndex,
    rotation: Rotation,
) -> Result<GrayImage, PipelineError> {
    let plane = volume
        .get_plane(index)
        .ok_or_else(|| PipelineError::PlaneOutOfBounds {
            index,
            shape: volume.shape().to_vec(),
        })?;
    let rotated = rotate(plane, rotation);
    let normalized = IntensityNormalizer::normalize(rotated.view());
    ImageWriter::plane_to_image(&normalized).ok_or(PipelineError::EmptyPlane(index))
}
