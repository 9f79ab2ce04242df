use crate::volume::{Affine, UnsupportedDimensions, Volume};

use ndarray::{ArrayD, Dimension, IxDyn};
use nifti::volume::RandomAccessNiftiVolume;
use nifti::{NiftiHeader, NiftiObject, NiftiVolume, ReaderOptions};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Suffixes accepted as NIfTI-1 input
pub const NIFTI_SUFFIXES: [&str; 2] = [".nii", ".nii.gz"];

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Could not decode NIfTI file: {0}")]
    Decode(#[from] nifti::error::NiftiError),

    #[error("Unsupported {0}D volume (expected 3D or 4D)")]
    UnsupportedDimensions(usize),

    #[error("Inconsistent voxel data: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl From<UnsupportedDimensions> for VolumeLoaderError {
    fn from(UnsupportedDimensions(rank): UnsupportedDimensions) -> Self {
        VolumeLoaderError::UnsupportedDimensions(rank)
    }
}

/// Whether `path` carries one of the NIfTI suffixes (case-sensitive)
pub fn is_nifti_path(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref().to_string_lossy();
    NIFTI_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from a `.nii` or `.nii.gz` file
    ///
    /// Voxel values are read as scaled floating point data.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, cannot be decoded, or is not
    /// a 3-D or 4-D volume
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Volume, VolumeLoaderError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VolumeLoaderError::NotFound(path.to_path_buf()));
        }

        let object = ReaderOptions::new().read_file(path)?;
        let header = object.header();
        let volume = object.volume();
        debug!(
            "Decoding {} volume of shape {:?} (datatype {})",
            path.display(),
            volume.dim(),
            header.datatype
        );

        let rank = volume.dimensionality();
        if !(3..=4).contains(&rank) {
            return Err(VolumeLoaderError::UnsupportedDimensions(rank));
        }

        let data = Self::read_voxels(volume)?;
        let volume = Volume::new(data, best_affine(header), header_info(header))?;
        Ok(volume)
    }

    fn read_voxels<V: RandomAccessNiftiVolume>(
        volume: &V,
    ) -> Result<ArrayD<f64>, VolumeLoaderError> {
        let shape: Vec<usize> = volume.dim().iter().map(|&d| d as usize).collect();
        let mut coords = vec![0u16; shape.len()];

        let values = ndarray::indices(IxDyn(&shape))
            .into_iter()
            .map(|index| {
                for (coord, &i) in coords.iter_mut().zip(index.slice()) {
                    *coord = i as u16;
                }
                volume.get_f64(&coords)
            })
            .collect::<Result<Vec<f64>, _>>()?;

        Ok(ArrayD::from_shape_vec(IxDyn(&shape), values)?)
    }
}

/// Pick the voxel-to-world transform: sform, then qform, then the base
/// affine derived from the voxel sizes.
pub(crate) fn best_affine(header: &NiftiHeader) -> Affine {
    if header.sform_code > 0 {
        sform_affine(header)
    } else if header.qform_code > 0 {
        qform_affine(header)
    } else {
        base_affine(header)
    }
}

fn sform_affine(header: &NiftiHeader) -> Affine {
    let row = |r: [f32; 4]| r.map(f64::from);
    [
        row(header.srow_x),
        row(header.srow_y),
        row(header.srow_z),
        [0.0, 0.0, 0.0, 1.0],
    ]
}

fn qform_affine(header: &NiftiHeader) -> Affine {
    let (b, c, d) = (
        f64::from(header.quatern_b),
        f64::from(header.quatern_c),
        f64::from(header.quatern_d),
    );
    // a is implied by the unit quaternion; rounding can push it slightly negative
    let a = (1.0 - (b * b + c * c + d * d)).max(0.0).sqrt();
    let rotation = quaternion_to_matrix(a, b, c, d);

    let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };
    let zooms = [
        f64::from(header.pixdim[1]),
        f64::from(header.pixdim[2]),
        f64::from(header.pixdim[3]) * qfac,
    ];
    let offsets = [
        f64::from(header.quatern_x),
        f64::from(header.quatern_y),
        f64::from(header.quatern_z),
    ];

    let mut affine = crate::volume::IDENTITY;
    for (i, row) in affine.iter_mut().take(3).enumerate() {
        for j in 0..3 {
            row[j] = rotation[i][j] * zooms[j];
        }
        row[3] = offsets[i];
    }
    affine
}

fn quaternion_to_matrix(w: f64, x: f64, y: f64, z: f64) -> [[f64; 3]; 3] {
    let norm = w * w + x * x + y * y + z * z;
    if norm < f64::EPSILON {
        return [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    }
    let s = 2.0 / norm;
    let (xs, ys, zs) = (x * s, y * s, z * s);
    let (wx, wy, wz) = (w * xs, w * ys, w * zs);
    let (xx, xy, xz) = (x * xs, x * ys, x * zs);
    let (yy, yz, zz) = (y * ys, y * zs, z * zs);
    [
        [1.0 - (yy + zz), xy - wz, xz + wy],
        [xy + wz, 1.0 - (xx + zz), yz - wx],
        [xz - wy, yz + wx, 1.0 - (xx + yy)],
    ]
}

// Voxel sizes on the diagonal, x flipped, origin at the volume centre
fn base_affine(header: &NiftiHeader) -> Affine {
    let rank = (header.dim[0] as usize).clamp(1, 7);
    let axis = |i: usize| {
        let extent = if i <= rank { header.dim[i] as f64 } else { 1.0 };
        let zoom = if i <= rank { f64::from(header.pixdim[i]) } else { 1.0 };
        (extent, zoom)
    };
    let (sx, zx) = axis(1);
    let (sy, zy) = axis(2);
    let (sz, zz) = axis(3);
    [
        [-zx, 0.0, 0.0, (sx - 1.0) / 2.0 * zx],
        [0.0, zy, 0.0, -(sy - 1.0) / 2.0 * zy],
        [0.0, 0.0, zz, -(sz - 1.0) / 2.0 * zz],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .to_string()
}

/// Header fields by name, passed through verbatim
pub(crate) fn header_info(header: &NiftiHeader) -> Map<String, Value> {
    let info = json!({
        "sizeof_hdr": header.sizeof_hdr,
        "dim": header.dim,
        "intent_p1": header.intent_p1,
        "intent_p2": header.intent_p2,
        "intent_p3": header.intent_p3,
        "intent_code": header.intent_code,
        "datatype": header.datatype,
        "bitpix": header.bitpix,
        "slice_start": header.slice_start,
        "pixdim": header.pixdim,
        "vox_offset": header.vox_offset,
        "scl_slope": header.scl_slope,
        "scl_inter": header.scl_inter,
        "slice_end": header.slice_end,
        "slice_code": header.slice_code,
        "xyzt_units": header.xyzt_units,
        "cal_max": header.cal_max,
        "cal_min": header.cal_min,
        "slice_duration": header.slice_duration,
        "toffset": header.toffset,
        "glmax": header.glmax,
        "glmin": header.glmin,
        "descrip": text(&header.descrip),
        "aux_file": text(&header.aux_file),
        "qform_code": header.qform_code,
        "sform_code": header.sform_code,
        "quatern_b": header.quatern_b,
        "quatern_c": header.quatern_c,
        "quatern_d": header.quatern_d,
        "qoffset_x": header.quatern_x,
        "qoffset_y": header.quatern_y,
        "qoffset_z": header.quatern_z,
        "srow_x": header.srow_x,
        "srow_y": header.srow_y,
        "srow_z": header.srow_z,
        "intent_name": text(&header.intent_name),
        "magic": text(&header.magic),
    });
    match info {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
