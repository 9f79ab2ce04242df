//! # nifti-slice
//!
//! This crate turns NIfTI-1 volumes (`.nii` and `.nii.gz`) into 2-D
//! grayscale PNG images.
//!
//! A volume is loaded as floating point voxels together with its affine
//! and header fields. Planes are taken along the third (slice) axis, turned
//! counter-clockwise by a multiple of 90° and rescaled to 0..=255 from their
//! own minimum and maximum. Two drivers are built on top of that:
//!
//!  - [`NiftiProcessor`]: a single-slice tool for agent frameworks. It keeps
//!    only the first slice (of the first volume for 4-D data), writes it to a
//!    randomly named file and always answers with a result/metadata pair,
//!    even on failure.
//!  - [`convert_nii_to_png`]: a batch converter writing every slice of every
//!    volume, used by the `nii2png` binary. It fails fast on bad input.
//!
//! A constant plane has no intensity range and is written all black.
//!
//! # Examples
//!
//! ## Extracting the first slice
//!
//! ```no_run
//! # use nifti_slice::{NiftiProcessor, ToolResult};
//! let processor = NiftiProcessor::new("temp").expect("should have created temp directory");
//! let (result, metadata) = processor.run("brain.nii.gz", 90);
//! if let ToolResult::Image { image_path } = result {
//!     println!("{}", image_path.display());
//! }
//! println!("{}", serde_json::to_string_pretty(&metadata).unwrap());
//! ```
//!
//! ## Converting a whole volume
//!
//! ```no_run
//! # use nifti_slice::convert_nii_to_png;
//! # use std::path::Path;
//! let output_dir = convert_nii_to_png("brain_scan.nii", Some(Path::new("output/pngs")), 90)
//!     .expect("should have converted every slice");
//! println!("PNG files saved to: {}", output_dir.display());
//! ```

pub mod converter;
pub mod enums;
pub mod intensity;
pub mod logger;
pub mod metadata;
pub mod orientation;
pub mod pipeline;
pub mod processor;
pub mod volume;
pub mod volume_loader;
pub mod writer;

pub use converter::convert_nii_to_png;
pub use enums::{AnalysisStatus, Extent, InvalidRotation, PlaneIndex, Rotation};
pub use metadata::{ToolMetadata, ToolResult, VolumeMetadata};
pub use pipeline::{ErrorKind, PipelineError, render_plane};
pub use processor::{NiftiProcessor, NiftiProcessorInput};
pub use volume::Volume;
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
