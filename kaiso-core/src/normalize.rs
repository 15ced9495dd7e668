//! L2 normalisation of embedding rows.

use crate::distance::l2_norm;

/// Smallest norm a row is divided by; guards against division by zero.
pub const NORM_FLOOR: f32 = 1e-8;

/// Scales `row` in place to unit L2 norm.
///
/// Rows whose norm is at or below [`NORM_FLOOR`] are divided by the floor
/// instead, so an all-zero row stays all-zero.
///
/// # Examples
/// ```
/// use kaiso_core::l2_normalize;
///
/// let mut row = [3.0, 4.0];
/// l2_normalize(&mut row);
/// assert!((row[0] - 0.6).abs() < 1e-6);
/// assert!((row[1] - 0.8).abs() < 1e-6);
///
/// let mut zeros = [0.0, 0.0];
/// l2_normalize(&mut zeros);
/// assert_eq!(zeros, [0.0, 0.0]);
/// ```
pub fn l2_normalize(row: &mut [f32]) {
    let divisor = l2_norm(row).max(NORM_FLOOR);
    for value in row.iter_mut() {
        *value /= divisor;
    }
}
