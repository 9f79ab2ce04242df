#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::Path;

pub const SROW: [[f32; 4]; 3] = [
    [2.0, 0.0, 0.0, -10.0],
    [0.0, 2.0, 0.0, -20.0],
    [0.0, 0.0, 3.0, -30.0],
];

fn put_i16(header: &mut [u8], offset: usize, value: i16) {
    header[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_f32(header: &mut [u8], offset: usize, value: f32) {
    header[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Serialize a single-file NIfTI-1 volume of float32 voxels.
///
/// `voxel` receives the 0-based coordinates of each voxel. Files ending in
/// `.gz` are gzip compressed.
pub fn write_nifti(path: &Path, shape: &[usize], voxel: impl Fn(&[usize]) -> f32) {
    let mut header = [0u8; 348];
    header[0..4].copy_from_slice(&348i32.to_le_bytes());

    let mut dim = [1i16; 8];
    dim[0] = shape.len() as i16;
    for (i, &extent) in shape.iter().enumerate() {
        dim[i + 1] = extent as i16;
    }
    for (i, &d) in dim.iter().enumerate() {
        put_i16(&mut header, 40 + i * 2, d);
    }

    // float32
    put_i16(&mut header, 70, 16);
    put_i16(&mut header, 72, 32);
    for (i, p) in [1.0f32, 2.0, 2.0, 3.0, 1.0, 1.0, 1.0, 1.0].iter().enumerate() {
        put_f32(&mut header, 76 + i * 4, *p);
    }
    put_f32(&mut header, 108, 352.0);
    put_f32(&mut header, 112, 1.0);
    put_f32(&mut header, 116, 0.0);

    header[148..148 + 12].copy_from_slice(b"test fixture");
    put_i16(&mut header, 252, 0);
    put_i16(&mut header, 254, 1);
    for (row, offset) in SROW.iter().zip([280, 296, 312]) {
        for (i, value) in row.iter().enumerate() {
            put_f32(&mut header, offset + i * 4, *value);
        }
    }
    header[344..348].copy_from_slice(b"n+1\0");

    let mut bytes = header.to_vec();
    // no extensions
    bytes.extend_from_slice(&[0u8; 4]);

    // x varies fastest
    let total: usize = shape.iter().product();
    let mut coords = vec![0usize; shape.len()];
    for linear in 0..total {
        let mut rest = linear;
        for (coord, &extent) in coords.iter_mut().zip(shape) {
            *coord = rest % extent;
            rest /= extent;
        }
        bytes.extend_from_slice(&voxel(coords.as_slice()).to_le_bytes());
    }

    if path.to_string_lossy().ends_with(".gz") {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&bytes).unwrap();
        std::fs::write(path, encoder.finish().unwrap()).unwrap();
    } else {
        std::fs::write(path, bytes).unwrap();
    }
}

pub fn png_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".png"))
        .collect();
    names.sort();
    names
}
