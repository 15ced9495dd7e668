//! Dense, validated embedding storage.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    datasource::DataSource, distance::Metric, error::DataSourceError, normalize::l2_normalize,
};

/// Row-major matrix of embeddings compared under a fixed [`Metric`].
///
/// Construction rejects empty input, zero-width rows, ragged rows and
/// non-finite values, which lets distance calls skip per-pair validation.
///
/// # Examples
/// ```
/// use kaiso_core::{DataSource, EmbeddingMatrix, Metric};
///
/// let matrix = EmbeddingMatrix::try_new(
///     "demo",
///     vec![vec![0.0, 0.0], vec![3.0, 4.0]],
///     Metric::Euclidean,
/// )
/// .expect("rows are valid");
/// assert_eq!(matrix.len(), 2);
/// assert_eq!(matrix.dimension(), 2);
/// assert!((matrix.distance(0, 1)? - 5.0).abs() < 1e-6);
/// # Ok::<(), kaiso_core::DataSourceError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddingMatrix {
    name: String,
    values: Vec<f32>,
    rows: usize,
    dimension: usize,
    metric: Metric,
}

impl EmbeddingMatrix {
    /// Validates `rows` and packs them into contiguous storage.
    ///
    /// # Errors
    /// - [`DataSourceError::EmptyData`] when `rows` is empty.
    /// - [`DataSourceError::ZeroDimension`] when the first row is empty.
    /// - [`DataSourceError::RaggedRow`] when a row's length differs from the
    ///   first row's.
    /// - [`DataSourceError::NonFinite`] when a value is NaN or infinite.
    pub fn try_new(
        name: impl Into<String>,
        rows: Vec<Vec<f32>>,
        metric: Metric,
    ) -> Result<Self, DataSourceError> {
        let first = rows.first().ok_or(DataSourceError::EmptyData)?;
        let dimension = first.len();
        if dimension == 0 {
            return Err(DataSourceError::ZeroDimension);
        }

        let mut values = Vec::with_capacity(rows.len() * dimension);
        for (row, vector) in rows.iter().enumerate() {
            if vector.len() != dimension {
                return Err(DataSourceError::RaggedRow {
                    row,
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            if let Some(column) = vector.iter().position(|value| !value.is_finite()) {
                return Err(DataSourceError::NonFinite { row, column });
            }
            values.extend_from_slice(vector);
        }

        Ok(Self {
            name: name.into(),
            rows: rows.len(),
            values,
            dimension,
            metric,
        })
    }

    /// Scales every row to unit L2 norm in parallel.
    #[instrument(name = "matrix.l2_normalize", skip(self), fields(rows = self.rows, dimension = self.dimension))]
    pub fn l2_normalize(&mut self) {
        self.values
            .par_chunks_mut(self.dimension)
            .for_each(l2_normalize);
        debug!("rows normalised");
    }

    /// Width of every row.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Metric used by [`DataSource::distance`].
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns row `index`, or `None` when out of bounds.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.dimension;
        self.values.get(start..start + self.dimension)
    }

    fn checked_row(&self, index: usize) -> Result<&[f32], DataSourceError> {
        self.row(index).ok_or(DataSourceError::OutOfBounds { index })
    }
}

impl DataSource for EmbeddingMatrix {
    fn len(&self) -> usize {
        self.rows
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
        let left = self.checked_row(i)?;
        let right = self.checked_row(j)?;
        Ok(self.metric.distance_unchecked(left, right))
    }

    fn batch_distances(
        &self,
        query: usize,
        candidates: &[usize],
    ) -> Result<Vec<f32>, DataSourceError> {
        let left = self.checked_row(query)?;
        candidates
            .iter()
            .map(|&candidate| {
                let right = self.checked_row(candidate)?;
                Ok(self.metric.distance_unchecked(left, right))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty(vec![], DataSourceError::EmptyData)]
    #[case::zero_width(vec![vec![], vec![]], DataSourceError::ZeroDimension)]
    #[case::ragged(
        vec![vec![1.0, 2.0], vec![1.0]],
        DataSourceError::RaggedRow { row: 1, expected: 2, actual: 1 },
    )]
    #[case::nan(
        vec![vec![1.0, 2.0], vec![0.0, f32::NAN]],
        DataSourceError::NonFinite { row: 1, column: 1 },
    )]
    #[case::infinite(
        vec![vec![f32::NEG_INFINITY, 2.0]],
        DataSourceError::NonFinite { row: 0, column: 0 },
    )]
    fn rejects_invalid_rows(#[case] rows: Vec<Vec<f32>>, #[case] expected: DataSourceError) {
        let err = EmbeddingMatrix::try_new("bad", rows, Metric::Euclidean)
            .expect_err("invalid rows must be rejected");
        assert_eq!(err, expected);
    }

    #[test]
    fn out_of_bounds_rows_are_reported() {
        let matrix = EmbeddingMatrix::try_new("m", vec![vec![1.0]], Metric::Manhattan)
            .expect("valid matrix");
        assert_eq!(
            matrix.distance(0, 3),
            Err(DataSourceError::OutOfBounds { index: 3 })
        );
        assert!(matrix.row(1).is_none());
    }

    #[test]
    fn normalisation_rescales_rows_in_place() {
        let mut matrix = EmbeddingMatrix::try_new(
            "m",
            vec![vec![3.0, 4.0], vec![0.0, 0.0], vec![0.0, -2.0]],
            Metric::Euclidean,
        )
        .expect("valid matrix");
        matrix.l2_normalize();

        assert_eq!(matrix.row(0), Some(&[0.6_f32, 0.8][..]));
        assert_eq!(matrix.row(1), Some(&[0.0_f32, 0.0][..]));
        assert_eq!(matrix.row(2), Some(&[0.0_f32, -1.0][..]));
    }

    #[test]
    fn batch_distances_use_configured_metric() {
        let matrix = EmbeddingMatrix::try_new(
            "m",
            vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![-2.0, 0.5]],
            Metric::Chebyshev,
        )
        .expect("valid matrix");
        let distances = matrix.batch_distances(0, &[1, 2]).expect("valid indices");
        assert_eq!(distances, vec![1.0, 2.0]);
    }
}
