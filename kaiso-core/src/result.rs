//! Result types for clustering operations.
//!
//! Provides structures to represent clustering results, including noise
//! assignments and validation of cluster identifier constraints.

use std::collections::HashSet;
use thiserror::Error;

/// Label value used for points that belong to no cluster.
pub const NOISE_LABEL: i64 = -1;

/// Represents the output of a [`crate::Hdbscan::fit_predict`] invocation.
///
/// Each point either belongs to a cluster or is noise (`None`).
///
/// # Examples
/// ```
/// use kaiso_core::{ClusterId, ClusteringResult};
///
/// let result = ClusteringResult::try_from_assignments(vec![
///     Some(ClusterId::new(0)),
///     None,
///     Some(ClusterId::new(1)),
/// ])
/// .expect("assignments are contiguous");
/// assert_eq!(result.cluster_count(), 2);
/// assert_eq!(result.noise_count(), 1);
/// assert_eq!(result.labels(), vec![0, -1, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteringResult {
    assignments: Vec<Option<ClusterId>>,
    cluster_count: usize,
    noise_count: usize,
}

/// Error returned when cluster identifiers are not contiguous starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NonContiguousClusterIds {
    /// The assignments do not include cluster `0`.
    #[error("cluster identifiers must include 0")]
    MissingZero,
    /// The assignments skip identifiers.
    #[error("cluster identifiers must be contiguous without gaps")]
    Gap,
    /// The assignments require identifiers beyond the signed label range.
    #[error("cluster identifiers exceed the signed label range")]
    Overflow,
}

impl ClusteringResult {
    /// Attempts to build a result from cluster assignments.
    ///
    /// Non-noise identifiers must be contiguous starting at zero. Inputs that
    /// are empty or contain only noise yield `cluster_count == 0`.
    ///
    /// # Errors
    /// Returns [`NonContiguousClusterIds::MissingZero`] when clusters exist but
    /// cluster `0` does not, [`NonContiguousClusterIds::Gap`] when identifiers
    /// skip values, and [`NonContiguousClusterIds::Overflow`] when an
    /// identifier cannot be represented as a signed label.
    pub fn try_from_assignments(
        assignments: Vec<Option<ClusterId>>,
    ) -> Result<Self, NonContiguousClusterIds> {
        let mut seen = HashSet::new();
        let mut max_id = None::<u64>;
        let mut noise_count = 0usize;

        for id in &assignments {
            let Some(id) = id else {
                noise_count += 1;
                continue;
            };
            let value = id.get();
            if i64::try_from(value).is_err() {
                return Err(NonContiguousClusterIds::Overflow);
            }
            seen.insert(value);
            max_id = Some(max_id.map_or(value, |current| current.max(value)));
        }

        let Some(max_id) = max_id else {
            return Ok(Self {
                assignments,
                cluster_count: 0,
                noise_count,
            });
        };

        if !seen.contains(&0) {
            return Err(NonContiguousClusterIds::MissingZero);
        }
        if seen.len() as u64 != max_id + 1 {
            return Err(NonContiguousClusterIds::Gap);
        }

        Ok(Self {
            assignments,
            cluster_count: seen.len(),
            noise_count,
        })
    }

    /// Returns the assignments in input order; `None` marks noise.
    #[must_use]
    pub fn assignments(&self) -> &[Option<ClusterId>] {
        &self.assignments
    }

    /// Returns signed labels in input order, using [`NOISE_LABEL`] for noise.
    ///
    /// # Examples
    /// ```
    /// use kaiso_core::{ClusterId, ClusteringResult, NOISE_LABEL};
    ///
    /// let result = ClusteringResult::try_from_assignments(vec![None, Some(ClusterId::new(0))])
    ///     .expect("assignments are contiguous");
    /// assert_eq!(result.labels(), vec![NOISE_LABEL, 0]);
    /// ```
    #[must_use]
    pub fn labels(&self) -> Vec<i64> {
        self.assignments
            .iter()
            .map(|id| id.map_or(NOISE_LABEL, |id| id.get() as i64))
            .collect()
    }

    /// Number of distinct clusters, equal to the largest identifier plus one.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Number of points labelled as noise.
    #[must_use]
    pub fn noise_count(&self) -> usize {
        self.noise_count
    }

    /// Number of labelled points, noise included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns `true` when the result holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Identifier assigned to a cluster.
///
/// # Examples
/// ```
/// use kaiso_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u64);

impl ClusterId {
    /// Creates a new cluster identifier.
    #[rustfmt::skip]
    #[must_use]
    pub fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub fn get(self) -> u64 { self.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ids(raw: &[Option<u64>]) -> Vec<Option<ClusterId>> {
        raw.iter().map(|id| id.map(ClusterId::new)).collect()
    }

    #[rstest]
    #[case::empty(&[], 0, 0)]
    #[case::all_noise(&[None, None], 0, 2)]
    #[case::mixed(&[Some(0), None, Some(1), Some(1)], 2, 1)]
    fn counts_clusters_and_noise(
        #[case] raw: &[Option<u64>],
        #[case] clusters: usize,
        #[case] noise: usize,
    ) {
        let result = ClusteringResult::try_from_assignments(ids(raw)).expect("valid assignments");
        assert_eq!(result.cluster_count(), clusters);
        assert_eq!(result.noise_count(), noise);
        assert_eq!(result.len(), raw.len());
    }

    #[rstest]
    #[case::missing_zero(&[Some(1), Some(1)], NonContiguousClusterIds::MissingZero)]
    #[case::gap(&[Some(0), None, Some(2)], NonContiguousClusterIds::Gap)]
    #[case::overflow(&[Some(0), Some(u64::MAX)], NonContiguousClusterIds::Overflow)]
    fn rejects_invalid_assignments(
        #[case] raw: &[Option<u64>],
        #[case] expected: NonContiguousClusterIds,
    ) {
        let err = ClusteringResult::try_from_assignments(ids(raw)).expect_err("must reject");
        assert_eq!(err, expected);
    }

    #[test]
    fn labels_use_noise_sentinel() {
        let result = ClusteringResult::try_from_assignments(ids(&[Some(0), None]))
            .expect("valid assignments");
        assert_eq!(result.labels(), vec![0, NOISE_LABEL]);
    }
}
