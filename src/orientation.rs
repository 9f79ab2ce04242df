use crate::enums::Rotation;

use ndarray::{Array2, ArrayView2, s};

/// Rotate a plane counter-clockwise by `rotation`.
///
/// The plane is turned by repeated canonical quarter turns, so a full
/// turn gives back the input unchanged.
pub fn rotate(plane: ArrayView2<'_, f64>, rotation: Rotation) -> Array2<f64> {
    (0..rotation.quarter_turns()).fold(plane.to_owned(), |rotated, _| quarter_turn(rotated.view()))
}

// out[i, j] = in[j, cols - 1 - i]
#[inline]
fn quarter_turn(plane: ArrayView2<'_, f64>) -> Array2<f64> {
    plane
        .slice_move(s![.., ..;-1])
        .reversed_axes()
        .as_standard_layout()
        .into_owned()
}
