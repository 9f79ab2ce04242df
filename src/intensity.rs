use ndarray::{Array2, ArrayView2};

pub struct IntensityNormalizer;

impl IntensityNormalizer {
    /// Rescale a plane to the 0..=255 range using its own min and max.
    ///
    /// A constant plane, or one without any finite voxel, comes out all
    /// zero. Non-finite voxels are left out of the range and map to 0.
    pub fn normalize(plane: ArrayView2<'_, f64>) -> Array2<u8> {
        match Self::finite_range(plane) {
            Some((min, max)) if max > min => {
                plane.mapv(|value| Self::normalize_to_u8(value, min, max - min))
            }
            _ => Array2::zeros(plane.raw_dim()),
        }
    }

    pub(crate) fn finite_range(plane: ArrayView2<'_, f64>) -> Option<(f64, f64)> {
        plane
            .iter()
            .copied()
            .filter(|value| value.is_finite())
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            })
    }

    #[inline]
    fn normalize_to_u8(value: f64, min: f64, range: f64) -> u8 {
        if !value.is_finite() {
            return 0;
        }
        // the maximum lands on exactly 1.0 before scaling
        ((value - min) / range * 255.0).clamp(0.0, 255.0) as u8
    }
}
