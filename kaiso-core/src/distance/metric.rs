//! Metric selection by name.

use std::{fmt, str::FromStr, sync::Arc};

use super::{
    chebyshev::{chebyshev_distance, chebyshev_kernel},
    cosine::{cosine_distance, cosine_kernel},
    euclidean::{euclidean_distance, euclidean_kernel},
    manhattan::{manhattan_distance, manhattan_kernel},
    types::{Distance, Result},
};
use crate::error::HdbscanError;

/// Distance metric used to compare embedding rows.
///
/// Parsed from the names accepted on the command line:
///
/// | Metric      | Accepted names                    |
/// |-------------|-----------------------------------|
/// | `Euclidean` | `euclidean`, `l2`                 |
/// | `Cosine`    | `cosine`                          |
/// | `Manhattan` | `manhattan`, `l1`, `cityblock`    |
/// | `Chebyshev` | `chebyshev`, `infinity`           |
///
/// # Examples
/// ```
/// use kaiso_core::Metric;
///
/// let metric: Metric = "L2".parse().expect("alias is recognised");
/// assert_eq!(metric, Metric::Euclidean);
/// assert!(metric.normalizes_input());
/// assert!("hamming".parse::<Metric>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Metric {
    /// Straight-line (L2) distance.
    #[default]
    Euclidean,
    /// `1 - cosine similarity`.
    Cosine,
    /// Sum of absolute differences (L1).
    Manhattan,
    /// Largest absolute difference (L-infinity).
    Chebyshev,
}

impl Metric {
    /// Canonical lowercase name of the metric.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Cosine => "cosine",
            Self::Manhattan => "manhattan",
            Self::Chebyshev => "chebyshev",
        }
    }

    /// Whether rows are L2-normalised before clustering with this metric.
    #[must_use]
    pub const fn normalizes_input(self) -> bool {
        matches!(self, Self::Euclidean)
    }

    /// Computes the distance between two vectors after validating them.
    ///
    /// # Errors
    /// Returns [`crate::DistanceError`] when the inputs are empty, differ in
    /// length, or hold non-finite values. Cosine additionally rejects
    /// zero-magnitude vectors.
    pub fn distance(self, left: &[f32], right: &[f32]) -> Result<Distance> {
        match self {
            Self::Euclidean => euclidean_distance(left, right),
            Self::Cosine => cosine_distance(left, right),
            Self::Manhattan => manhattan_distance(left, right),
            Self::Chebyshev => chebyshev_distance(left, right),
        }
    }

    /// Computes the distance between two rows that were validated up front.
    ///
    /// Callers must guarantee equal, non-zero lengths and finite values.
    pub(crate) fn distance_unchecked(self, left: &[f32], right: &[f32]) -> f32 {
        debug_assert_eq!(left.len(), right.len());
        match self {
            Self::Euclidean => euclidean_kernel(left, right),
            Self::Cosine => cosine_kernel(left, right),
            Self::Manhattan => manhattan_kernel(left, right),
            Self::Chebyshev => chebyshev_kernel(left, right),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = HdbscanError;

    fn from_str(name: &str) -> core::result::Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(Self::Euclidean),
            "cosine" => Ok(Self::Cosine),
            "manhattan" | "l1" | "cityblock" => Ok(Self::Manhattan),
            "chebyshev" | "infinity" => Ok(Self::Chebyshev),
            _ => Err(HdbscanError::UnknownMetric {
                name: Arc::from(name),
            }),
        }
    }
}
