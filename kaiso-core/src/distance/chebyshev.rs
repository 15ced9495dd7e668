use crate::distance::helpers::{saturate_to_f32, validate_pair};
use crate::distance::types::{Distance, Result};

/// Computes the Chebyshev (L-infinity) distance between two vectors.
///
/// # Examples
///
/// ```
/// use kaiso_core::chebyshev_distance;
///
/// let distance = chebyshev_distance(&[1.0, -2.0], &[4.0, 2.0]).expect("valid input");
/// assert!((distance.value() - 4.0).abs() < 1e-6);
/// ```
///
/// # Errors
///
/// Same validation failures as [`crate::euclidean_distance`].
pub fn chebyshev_distance(left: &[f32], right: &[f32]) -> Result<Distance> {
    let (left, right) = validate_pair(left, right)?;
    Ok(Distance::from_raw(chebyshev_kernel(&left, &right)))
}

pub(crate) fn chebyshev_kernel(left: &[f32], right: &[f32]) -> f32 {
    let largest = left
        .iter()
        .zip(right.iter())
        .map(|(&l, &r)| (f64::from(l) - f64::from(r)).abs())
        .fold(0.0_f64, f64::max);
    saturate_to_f32(largest)
}
