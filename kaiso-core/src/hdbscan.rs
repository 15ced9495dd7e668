//! The [`Hdbscan`] entry point.
//!
//! Owns the frozen configuration, sizes a dedicated Rayon pool from the job
//! count, and runs the pipeline inside it.

use std::{num::NonZeroUsize, sync::Arc, thread};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{info, instrument, warn};

use crate::{
    Result,
    datasource::DataSource,
    distance::Metric,
    error::HdbscanError,
    hierarchy::{ClusterSelectionMethod, HierarchyConfig},
    pipeline::run_pipeline,
    result::ClusteringResult,
};

/// Configured HDBSCAN clusterer.
///
/// Build one with [`crate::HdbscanBuilder`].
///
/// # Examples
/// ```
/// use kaiso_core::{DataSource, EmbeddingMatrix, HdbscanBuilder, Metric};
///
/// let hdbscan = HdbscanBuilder::new()
///     .with_min_cluster_size(2)
///     .with_min_samples(Some(1))
///     .build()
///     .expect("configuration is valid");
/// let matrix = EmbeddingMatrix::try_new(
///     "demo",
///     vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![10.0, 10.0], vec![10.0, 11.0]],
///     Metric::Euclidean,
/// )
/// .expect("rows are valid");
///
/// let result = hdbscan.fit_predict(&matrix).expect("clustering succeeds");
/// assert_eq!(result.labels(), vec![0, 0, 1, 1]);
/// assert_eq!(result.noise_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Hdbscan {
    min_cluster_size: NonZeroUsize,
    min_samples: NonZeroUsize,
    metric: Metric,
    core_dist_n_jobs: isize,
    cluster_selection_method: ClusterSelectionMethod,
    allow_single_cluster: bool,
    alpha: f32,
}

impl Hdbscan {
    pub(crate) fn new(
        min_cluster_size: NonZeroUsize,
        min_samples: NonZeroUsize,
        metric: Metric,
        core_dist_n_jobs: isize,
        cluster_selection_method: ClusterSelectionMethod,
        allow_single_cluster: bool,
        alpha: f32,
    ) -> Self {
        Self {
            min_cluster_size,
            min_samples,
            metric,
            core_dist_n_jobs,
            cluster_selection_method,
            allow_single_cluster,
            alpha,
        }
    }

    /// Smallest group of points reported as a cluster.
    #[must_use]
    pub fn min_cluster_size(&self) -> NonZeroUsize {
        self.min_cluster_size
    }

    /// Neighbour rank used for core distances, before clamping to the data.
    #[must_use]
    pub fn min_samples(&self) -> NonZeroUsize {
        self.min_samples
    }

    /// Metric the caller should build its data source with.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Job count as configured.
    #[must_use]
    pub fn core_dist_n_jobs(&self) -> isize {
        self.core_dist_n_jobs
    }

    /// How flat clusters are chosen.
    #[must_use]
    pub fn cluster_selection_method(&self) -> ClusterSelectionMethod {
        self.cluster_selection_method
    }

    /// Whether a single all-encompassing cluster may be reported.
    #[must_use]
    pub fn allow_single_cluster(&self) -> bool {
        self.allow_single_cluster
    }

    /// Distance scaling factor.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Worker count handed to Rayon; `0` means one per available core.
    #[must_use]
    pub fn worker_threads(&self) -> usize {
        resolve_worker_threads(self.core_dist_n_jobs, available_cores())
    }

    /// Clusters every point in `source`.
    ///
    /// # Errors
    /// Returns [`HdbscanError::EmptySource`] when the source is empty,
    /// [`HdbscanError::ThreadPool`] when the worker pool cannot be built,
    /// [`HdbscanError::DataSource`] when the source fails, and
    /// [`HdbscanError::MstFailure`] or [`HdbscanError::HierarchyFailure`]
    /// when a pipeline stage rejects its input.
    #[instrument(
        name = "core.fit_predict",
        err,
        skip(self, source),
        fields(
            data_source = %source.name(),
            items = source.len(),
            min_cluster_size = %self.min_cluster_size,
            min_samples = %self.min_samples,
            selection = %self.cluster_selection_method,
        ),
    )]
    pub fn fit_predict<D: DataSource + Sync>(&self, source: &D) -> Result<ClusteringResult> {
        if source.is_empty() {
            warn!(
                data_source = source.name(),
                "data source is empty, returning error"
            );
            return Err(HdbscanError::EmptySource {
                data_source: Arc::from(source.name()),
            });
        }

        let config = HierarchyConfig::new(self.min_cluster_size)
            .with_selection(self.cluster_selection_method)
            .with_allow_single_cluster(self.allow_single_cluster);
        let pool = self.thread_pool()?;
        let result = pool.install(|| {
            run_pipeline(source, self.min_samples.get(), self.alpha, config)
        })?;

        info!(
            clusters = result.cluster_count(),
            noise = result.noise_count(),
            "clustering completed"
        );
        Ok(result)
    }

    fn thread_pool(&self) -> Result<ThreadPool> {
        let threads = self.worker_threads();
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("kaiso-worker-{index}"))
            .build()
            .map_err(|error| HdbscanError::ThreadPool {
                threads,
                message: Arc::from(error.to_string()),
            })
    }
}

fn available_cores() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Maps a job count onto a Rayon thread count, where `0` asks Rayon for
/// one worker per core.
fn resolve_worker_threads(jobs: isize, cores: usize) -> usize {
    match jobs {
        -1 => 0,
        jobs if jobs > 0 => jobs.unsigned_abs(),
        jobs => {
            let idle = jobs.unsigned_abs() - 1;
            cores.saturating_sub(idle).max(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        EmbeddingMatrix, HdbscanBuilder, HdbscanErrorCode,
        test_utils::{line, suite_proptest_config},
    };
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case::all_cores(-1, 8, 0)]
    #[case::explicit(3, 8, 3)]
    #[case::leave_one_idle(-2, 8, 7)]
    #[case::leave_many_idle(-5, 8, 4)]
    #[case::never_below_one(-20, 8, 1)]
    fn maps_job_counts_to_threads(
        #[case] jobs: isize,
        #[case] cores: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(resolve_worker_threads(jobs, cores), expected);
    }

    #[test]
    fn empty_sources_are_rejected() {
        let hdbscan = HdbscanBuilder::new().build().expect("valid configuration");
        let err = hdbscan.fit_predict(&line(&[])).expect_err("empty source");
        assert_eq!(err.code(), HdbscanErrorCode::EmptySource);
    }

    #[test]
    fn single_point_is_noise() {
        let hdbscan = HdbscanBuilder::new().build().expect("valid configuration");
        let result = hdbscan.fit_predict(&line(&[3.0])).expect("single point");
        assert_eq!(result.labels(), vec![-1]);
        assert_eq!(result.cluster_count(), 0);
        assert_eq!(result.noise_count(), 1);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(-1)]
    fn labels_do_not_depend_on_job_count(#[case] jobs: isize) {
        let points = [0.0, 0.2, 0.4, 0.5, 7.0, 7.1, 7.3, 7.4, 30.0];
        let reference = HdbscanBuilder::new()
            .with_min_cluster_size(3)
            .with_core_dist_n_jobs(1)
            .build()
            .expect("valid configuration")
            .fit_predict(&line(&points))
            .expect("clustering succeeds");
        let result = HdbscanBuilder::new()
            .with_min_cluster_size(3)
            .with_core_dist_n_jobs(jobs)
            .build()
            .expect("valid configuration")
            .fit_predict(&line(&points))
            .expect("clustering succeeds");
        assert_eq!(result, reference);
    }

    /// Points on a small integer grid, so duplicates and distance ties are common.
    fn grid_rows() -> impl Strategy<Value = Vec<Vec<f32>>> {
        prop::collection::vec((0_u8..6, 0_u8..6), 1..30).prop_map(|points| {
            points
                .into_iter()
                .map(|(x, y)| vec![f32::from(x), f32::from(y)])
                .collect()
        })
    }

    fn cluster_with_jobs(
        rows: &EmbeddingMatrix,
        builder: &HdbscanBuilder,
        jobs: isize,
    ) -> ClusteringResult {
        builder
            .clone()
            .with_core_dist_n_jobs(jobs)
            .build()
            .expect("valid configuration")
            .fit_predict(rows)
            .expect("clustering succeeds")
    }

    proptest! {
        #![proptest_config(suite_proptest_config(64))]

        #[test]
        fn labels_are_well_formed_for_any_grid(
            rows in grid_rows(),
            min_cluster_size in 2_usize..7,
            min_samples in 1_usize..7,
            leaf in any::<bool>(),
            allow_single_cluster in any::<bool>(),
        ) {
            let count = rows.len();
            let matrix = EmbeddingMatrix::try_new("grid", rows, Metric::Euclidean)
                .expect("grid rows are valid");
            let selection = if leaf {
                ClusterSelectionMethod::Leaf
            } else {
                ClusterSelectionMethod::Eom
            };
            let builder = HdbscanBuilder::new()
                .with_min_cluster_size(min_cluster_size)
                .with_min_samples(Some(min_samples))
                .with_cluster_selection_method(selection)
                .with_allow_single_cluster(allow_single_cluster);

            let single = cluster_with_jobs(&matrix, &builder, 1);
            let labels = single.labels();
            prop_assert_eq!(labels.len(), count);
            prop_assert!(labels.iter().all(|&label| label >= -1));

            let max = labels.iter().copied().max().unwrap_or(-1);
            let expected_clusters = usize::try_from(max + 1).expect("max is at least -1");
            prop_assert_eq!(single.cluster_count(), expected_clusters);
            for cluster in 0..=max {
                prop_assert!(labels.contains(&cluster), "label {} is missing", cluster);
            }
            prop_assert_eq!(
                single.noise_count(),
                labels.iter().filter(|&&label| label == -1).count()
            );

            let pooled = cluster_with_jobs(&matrix, &builder, 3);
            prop_assert_eq!(pooled, single);
        }
    }
}
