use crate::distance::helpers::{saturate_to_f32, validate_pair};
use crate::distance::types::{Distance, Result};

/// Computes the Euclidean distance between two vectors.
///
/// # Examples
///
/// ```
/// use kaiso_core::{DistanceError, euclidean_distance};
///
/// fn main() -> Result<(), DistanceError> {
///     let distance = euclidean_distance(&[1.0, 2.0, 3.0], &[4.0, 6.0, 8.0])?;
///     assert!((distance.value() - 7.071_068).abs() < 1e-6);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// - [`crate::DistanceError::ZeroLength`] when any input is empty.
/// - [`crate::DistanceError::DimensionMismatch`] when input lengths differ.
/// - [`crate::DistanceError::NonFinite`] when a value is NaN or infinite.
pub fn euclidean_distance(left: &[f32], right: &[f32]) -> Result<Distance> {
    let (left, right) = validate_pair(left, right)?;
    Ok(Distance::from_raw(euclidean_kernel(&left, &right)))
}

pub(crate) fn euclidean_kernel(left: &[f32], right: &[f32]) -> f32 {
    let mut sum = 0.0f64;
    for (&l, &r) in left.iter().zip(right.iter()) {
        let diff = f64::from(l) - f64::from(r);
        sum += diff * diff;
    }
    saturate_to_f32(sum.sqrt())
}
