//! Convert a NIfTI file into one PNG image per slice.
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use nifti_slice::logger::{self, error};
use nifti_slice::{ErrorKind, convert_nii_to_png};

/// Convert a NIfTI file to PNG images
#[derive(Debug, Parser)]
struct App {
    /// Path to the input NIfTI file (.nii or .nii.gz)
    #[arg(long = "input_file")]
    input_file: PathBuf,

    /// Directory where PNG files should be saved
    /// (default is a directory next to the input file)
    #[arg(long = "output_dir_path")]
    output_dir_path: Option<PathBuf>,

    /// Rotation in degrees: 90, 180 or 270
    #[arg(long = "rotation_angle", default_value_t = 90, allow_negative_numbers = true)]
    rotation_angle: i32,
}

fn main() -> ExitCode {
    let App {
        input_file,
        output_dir_path,
        rotation_angle,
    } = App::parse();

    logger::init();

    match convert_nii_to_png(&input_file, output_dir_path.as_deref(), rotation_angle) {
        Ok(output_dir) => {
            println!("PNG files saved to: {}", output_dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.kind() {
                ErrorKind::NotFound | ErrorKind::Format | ErrorKind::InvalidParameter => {
                    println!("Error: {e}");
                }
                ErrorKind::Other => error!("Conversion failed: {e}"),
            }
            ExitCode::FAILURE
        }
    }
}
