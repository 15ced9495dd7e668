use crate::distance::helpers::{saturate_to_f32, validate_pair};
use crate::distance::types::{Distance, Result};

/// Computes the Manhattan (L1, city-block) distance between two vectors.
///
/// # Examples
///
/// ```
/// use kaiso_core::manhattan_distance;
///
/// let distance = manhattan_distance(&[1.0, -2.0], &[4.0, 2.0]).expect("valid input");
/// assert!((distance.value() - 7.0).abs() < 1e-6);
/// ```
///
/// # Errors
///
/// Same validation failures as [`crate::euclidean_distance`].
pub fn manhattan_distance(left: &[f32], right: &[f32]) -> Result<Distance> {
    let (left, right) = validate_pair(left, right)?;
    Ok(Distance::from_raw(manhattan_kernel(&left, &right)))
}

pub(crate) fn manhattan_kernel(left: &[f32], right: &[f32]) -> f32 {
    let sum = left
        .iter()
        .zip(right.iter())
        .map(|(&l, &r)| (f64::from(l) - f64::from(r)).abs())
        .sum::<f64>();
    saturate_to_f32(sum)
}
