//! Builder for configuring [`Hdbscan`] runs.
//!
//! Collects the tuning parameters, validates them together, and freezes them
//! into an [`Hdbscan`] instance.

use std::num::NonZeroUsize;

use crate::{
    Result, distance::Metric, error::HdbscanError, hdbscan::Hdbscan,
    hierarchy::ClusterSelectionMethod,
};

/// Default smallest group of points treated as a cluster.
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 4;

/// Job count meaning "one worker per available core".
pub const ALL_CORES: isize = -1;

/// Configures and constructs [`Hdbscan`] instances.
///
/// # Examples
/// ```
/// use kaiso_core::{ClusterSelectionMethod, HdbscanBuilder, Metric};
///
/// let hdbscan = HdbscanBuilder::new()
///     .with_min_cluster_size(8)
///     .with_metric(Metric::Cosine)
///     .with_cluster_selection_method(ClusterSelectionMethod::Leaf)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(hdbscan.min_cluster_size().get(), 8);
/// assert_eq!(hdbscan.min_samples().get(), 8);
/// assert_eq!(hdbscan.metric(), Metric::Cosine);
/// ```
#[derive(Debug, Clone)]
pub struct HdbscanBuilder {
    min_cluster_size: usize,
    min_samples: Option<usize>,
    metric: Metric,
    core_dist_n_jobs: isize,
    cluster_selection_method: ClusterSelectionMethod,
    allow_single_cluster: bool,
    alpha: f32,
}

impl Default for HdbscanBuilder {
    fn default() -> Self {
        Self {
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            min_samples: None,
            metric: Metric::Euclidean,
            core_dist_n_jobs: ALL_CORES,
            cluster_selection_method: ClusterSelectionMethod::Eom,
            allow_single_cluster: false,
            alpha: 1.0,
        }
    }
}

impl HdbscanBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use kaiso_core::{HdbscanBuilder, Metric};
    ///
    /// let builder = HdbscanBuilder::new();
    /// assert_eq!(builder.min_cluster_size(), 4);
    /// assert_eq!(builder.min_samples(), None);
    /// assert_eq!(builder.metric(), Metric::Euclidean);
    /// assert_eq!(builder.core_dist_n_jobs(), -1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the minimum cluster size.
    #[must_use]
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }

    /// Overrides the neighbour count used for core distances. `None` falls
    /// back to the minimum cluster size.
    #[must_use]
    pub fn with_min_samples(mut self, samples: Option<usize>) -> Self {
        self.min_samples = samples;
        self
    }

    /// Selects the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Sizes the worker pool: `-1` uses every core, `n > 0` uses `n`
    /// workers, and `n < -1` leaves `-n - 1` cores idle.
    #[must_use]
    pub fn with_core_dist_n_jobs(mut self, jobs: isize) -> Self {
        self.core_dist_n_jobs = jobs;
        self
    }

    /// Selects how flat clusters are chosen from the condensed tree.
    #[must_use]
    pub fn with_cluster_selection_method(mut self, method: ClusterSelectionMethod) -> Self {
        self.cluster_selection_method = method;
        self
    }

    /// Allows the whole dataset to be reported as a single cluster.
    #[must_use]
    pub fn with_allow_single_cluster(mut self, allow: bool) -> Self {
        self.allow_single_cluster = allow;
        self
    }

    /// Scales raw distances by `1 / alpha` before mutual reachability.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Returns the configured minimum cluster size.
    #[must_use]
    pub fn min_cluster_size(&self) -> usize {
        self.min_cluster_size
    }

    /// Returns the explicit minimum samples, if any.
    #[must_use]
    pub fn min_samples(&self) -> Option<usize> {
        self.min_samples
    }

    /// Returns the configured metric.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the configured job count.
    #[must_use]
    pub fn core_dist_n_jobs(&self) -> isize {
        self.core_dist_n_jobs
    }

    /// Validates the configuration and constructs an [`Hdbscan`] instance.
    ///
    /// # Errors
    /// - [`HdbscanError::InvalidMinClusterSize`] when the size is below 2.
    /// - [`HdbscanError::InvalidMinSamples`] when `min_samples` is `Some(0)`.
    /// - [`HdbscanError::InvalidAlpha`] when alpha is not finite and positive.
    /// - [`HdbscanError::InvalidJobCount`] when the job count is `0`.
    ///
    /// # Examples
    /// ```
    /// use kaiso_core::{HdbscanBuilder, HdbscanError};
    ///
    /// let err = HdbscanBuilder::new().with_min_cluster_size(1).build().unwrap_err();
    /// assert_eq!(err, HdbscanError::InvalidMinClusterSize { got: 1 });
    /// ```
    pub fn build(self) -> Result<Hdbscan> {
        let min_cluster_size = NonZeroUsize::new(self.min_cluster_size)
            .filter(|size| size.get() >= 2)
            .ok_or(HdbscanError::InvalidMinClusterSize {
                got: self.min_cluster_size,
            })?;

        let min_samples = match self.min_samples {
            None => min_cluster_size,
            Some(samples) => NonZeroUsize::new(samples)
                .ok_or(HdbscanError::InvalidMinSamples { got: samples })?,
        };

        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(HdbscanError::InvalidAlpha { got: self.alpha });
        }
        if self.core_dist_n_jobs == 0 {
            return Err(HdbscanError::InvalidJobCount {
                got: self.core_dist_n_jobs,
            });
        }

        Ok(Hdbscan::new(
            min_cluster_size,
            min_samples,
            self.metric,
            self.core_dist_n_jobs,
            self.cluster_selection_method,
            self.allow_single_cluster,
            self.alpha,
        ))
    }
}
