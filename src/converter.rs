use crate::enums::{Extent, InvalidRotation, Rotation};
use crate::pipeline::{PipelineError, render_plane};
use crate::volume_loader::{VolumeLoader, is_nifti_path};
use crate::writer::ImageWriter;

use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Angles accepted by the batch converter
pub const BATCH_ROTATIONS: [i32; 3] = [90, 180, 270];

/// Convert every slice of every volume in `input` into PNG files.
///
/// Files are written to `<output_dir>/<stem>` or, without an output
/// directory, to `<stem>` next to the input. Returns that directory.
///
/// # Errors
///
/// Missing input, a non-NIfTI suffix and an unsupported rotation are
/// reported before anything is created. Any failure after that aborts the
/// whole conversion.
pub fn convert_nii_to_png(
    input: impl AsRef<Path>,
    output_dir: Option<&Path>,
    rotation_angle: i32,
) -> Result<PathBuf, PipelineError> {
    let input = input.as_ref();
    if !input.exists() {
        return Err(PipelineError::NotFound(input.to_path_buf()));
    }
    if !is_nifti_path(input) {
        return Err(PipelineError::NotNifti(input.to_path_buf()));
    }
    if !BATCH_ROTATIONS.contains(&rotation_angle) {
        return Err(InvalidRotation(rotation_angle).into());
    }
    let rotation = Rotation::try_from(rotation_angle)?;

    let stem = ImageWriter::file_stem(input);
    let output_dir = ImageWriter::output_dir_for(input, output_dir).map_err(|source| {
        PipelineError::CreateDir {
            path: input.to_path_buf(),
            source,
        }
    })?;
    std::fs::create_dir_all(&output_dir).map_err(|source| PipelineError::CreateDir {
        path: output_dir.clone(),
        source,
    })?;
    info!("Output directory: {}", output_dir.display());

    let volume = VolumeLoader::load_from_path(input)?;
    info!("Image dimensions: {}D", volume.rank());

    let total_slices = volume.depth();
    let total_volumes = volume.volumes();
    let four_d = volume.rank() == 4;
    let mut slice_counter = 0usize;

    for index in volume.plane_indices(Extent::All) {
        match index.volume {
            Some(current_volume) => info!(
                "Saving volume {}/{}, slice {}/{}...",
                current_volume + 1,
                total_volumes,
                index.slice + 1,
                total_slices
            ),
            None => info!("Saving slice {}/{}...", index.slice + 1, total_slices),
        }

        let image = render_plane(&volume, index, rotation)?;
        let path = output_dir.join(ImageWriter::plane_file_name(&stem, index));
        ImageWriter::save(&image, &path)?;
        debug!("Wrote {}", path.display());
        slice_counter += 1;

        if let Some(current_volume) = index.volume {
            if index.slice + 1 == total_slices {
                info!(
                    "Finished converting volume {}/{}",
                    current_volume + 1,
                    total_volumes
                );
            }
        }
    }
    if !four_d {
        info!("Finished converting 3D image");
    }

    info!("Successfully converted {slice_counter} slices to PNG");
    Ok(output_dir)
}
