//! Pairwise-distance abstraction consumed by the clustering engine.

use crate::error::DataSourceError;

/// A finite collection of points that can report distances between them.
///
/// The engine only ever asks for distances by index, so any storage layout
/// works as long as indices in `0..len()` are valid.
///
/// # Examples
/// ```
/// use kaiso_core::{DataSource, DataSourceError};
///
/// struct Line(Vec<f32>);
///
/// impl DataSource for Line {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "line" }
///     fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
///         let a = self.0.get(i).ok_or(DataSourceError::OutOfBounds { index: i })?;
///         let b = self.0.get(j).ok_or(DataSourceError::OutOfBounds { index: j })?;
///         Ok((a - b).abs())
///     }
/// }
///
/// let line = Line(vec![0.0, 2.5, 10.0]);
/// assert_eq!(line.distance(1, 2)?, 7.5);
/// assert_eq!(line.batch_distances(0, &[1, 2])?, [2.5, 10.0]);
/// # Ok::<(), DataSourceError>(())
/// ```
pub trait DataSource {
    /// Number of points in the source.
    fn len(&self) -> usize;

    /// Returns whether the source holds no points.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable name used in errors and logs.
    fn name(&self) -> &str;

    /// Distance between points `i` and `j`.
    ///
    /// # Errors
    /// Implementations must return [`DataSourceError::OutOfBounds`] for
    /// invalid indices and must not yield non-finite distances.
    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError>;

    /// Distances from `query` to every entry in `candidates`, in order.
    ///
    /// The default implementation calls [`DataSource::distance`] once per
    /// candidate. Sources with contiguous storage can override it.
    ///
    /// # Errors
    /// Returns the first [`DataSourceError`] surfaced by
    /// [`DataSource::distance`].
    fn batch_distances(
        &self,
        query: usize,
        candidates: &[usize],
    ) -> Result<Vec<f32>, DataSourceError> {
        candidates
            .iter()
            .map(|&candidate| self.distance(query, candidate))
            .collect()
    }
}
