use crate::enums::PlaneIndex;
use crate::pipeline::PipelineError;

use image::{GrayImage, ImageBuffer, ImageFormat, Luma};
use ndarray::Array2;
use std::path::{Path, PathBuf};

pub struct ImageWriter;

impl ImageWriter {
    /// Convert a normalized plane into a grayscale image (rows become
    /// image rows). Returns `None` for a plane without pixels.
    pub fn plane_to_image(plane: &Array2<u8>) -> Option<GrayImage> {
        if plane.is_empty() {
            return None;
        }
        let (height, width) = plane.dim();
        let pixel_data: Vec<u8> = plane.iter().copied().collect();
        ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(width as u32, height as u32, pixel_data)
    }

    /// Write `image` as a single channel 8-bit PNG at `path`
    pub fn save(image: &GrayImage, path: impl AsRef<Path>) -> Result<PathBuf, PipelineError> {
        let path = path.as_ref();
        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| PipelineError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(path.to_path_buf())
    }

    /// `processed_nifti_<8 hex digits>.png`
    pub fn random_file_name() -> String {
        format!("processed_nifti_{:08x}.png", rand::random::<u32>())
    }

    /// Basename of `path` up to its first `.`, so `scan.nii.gz` gives `scan`
    pub fn file_stem(path: impl AsRef<Path>) -> String {
        let name = path
            .as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        match name.split_once('.') {
            Some((stem, _)) => stem.to_string(),
            None => name,
        }
    }

    /// Per-plane file name; indices are written 1-based
    pub fn plane_file_name(stem: &str, index: PlaneIndex) -> String {
        match index.volume {
            Some(volume) => format!("{stem}_vol{}_z{:03}.png", volume + 1, index.slice + 1),
            None => format!("{stem}_z{:03}.png", index.slice + 1),
        }
    }

    /// Output directory for a batch conversion of `input`.
    ///
    /// `<output_dir>/<stem>` when an output directory is given, otherwise
    /// `<directory of input>/<stem>`. Both are made absolute.
    pub fn output_dir_for(
        input: impl AsRef<Path>,
        output_dir: Option<&Path>,
    ) -> std::io::Result<PathBuf> {
        let input = input.as_ref();
        let stem = Self::file_stem(input);
        let base = match output_dir {
            Some(dir) => std::path::absolute(dir)?,
            None => {
                let input = std::path::absolute(input)?;
                input
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("/"))
            }
        };
        Ok(base.join(stem))
    }
}
