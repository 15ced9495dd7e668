//! Shared helpers for distance implementations.

use super::types::{DistanceError, Result, Vector, VectorKind};

/// Ensures both vectors share the same dimensionality.
pub(crate) fn validate_dimensions(left: &Vector<'_>, right: &Vector<'_>) -> Result<()> {
    if left.dimension() != right.dimension() {
        return Err(DistanceError::DimensionMismatch {
            left: left.dimension(),
            right: right.dimension(),
        });
    }
    Ok(())
}

/// Validates both operands and returns them as [`Vector`] views.
pub(crate) fn validate_pair<'a>(
    left: &'a [f32],
    right: &'a [f32],
) -> Result<(Vector<'a>, Vector<'a>)> {
    let left = Vector::new(left, VectorKind::Left)?;
    let right = Vector::new(right, VectorKind::Right)?;
    validate_dimensions(&left, &right)?;
    Ok((left, right))
}

/// Accumulates the dot product and squared magnitudes across both vectors.
pub(crate) fn accumulate_components(left: &[f32], right: &[f32]) -> (f64, f64, f64) {
    let mut dot = 0.0f64;
    let mut left_squares = 0.0f64;
    let mut right_squares = 0.0f64;

    for (&l, &r) in left.iter().zip(right.iter()) {
        dot += f64::from(l) * f64::from(r);
        left_squares += f64::from(l) * f64::from(l);
        right_squares += f64::from(r) * f64::from(r);
    }

    (dot, left_squares, right_squares)
}

/// Narrows an `f64` distance to `f32`, capping values beyond the `f32` range
/// at [`f32::MAX`] instead of letting them become infinite. NaN passes
/// through unchanged.
pub(crate) fn saturate_to_f32(value: f64) -> f32 {
    if value > f64::from(f32::MAX) {
        f32::MAX
    } else {
        value as f32
    }
}

/// Computes the Euclidean (L2) norm of `values`, accumulating in `f64`.
///
/// # Examples
/// ```
/// use kaiso_core::l2_norm;
///
/// assert!((l2_norm(&[3.0, 4.0]) - 5.0).abs() < 1e-6);
/// assert_eq!(l2_norm(&[]), 0.0);
/// ```
#[must_use]
pub fn l2_norm(values: &[f32]) -> f32 {
    let sum: f64 = values
        .iter()
        .map(|&value| f64::from(value) * f64::from(value))
        .sum();
    sum.sqrt() as f32
}
