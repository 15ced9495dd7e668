//! The HDBSCAN stages chained end to end.
//!
//! - Core distances from brute-force neighbour search.
//! - Prim's MST over the mutual-reachability graph.
//! - Condensed-tree cluster selection and labelling.
//!
//! Everything here runs on whichever Rayon pool is current; [`crate::Hdbscan`]
//! installs its own sized pool before calling in.

use std::sync::Arc;

use crate::{
    ClusterId, DataSource, HierarchyConfig, HierarchyError, MstError, Result,
    core_distance::core_distances,
    error::{DataSourceError, HdbscanError},
    extract_labels_from_mst, prim_mst,
    result::ClusteringResult,
};

pub(crate) fn run_pipeline<D: DataSource + Sync>(
    source: &D,
    min_samples: usize,
    alpha: f32,
    config: HierarchyConfig,
) -> Result<ClusteringResult> {
    let items = source.len();
    let cores =
        core_distances(source, min_samples).map_err(|error| map_data_source_error(source, error))?;
    let edges = prim_mst(source, &cores, alpha).map_err(|error| map_mst_error(source, error))?;
    let labels = extract_labels_from_mst(items, &edges, config).map_err(map_hierarchy_error)?;

    let assignments = labels
        .into_iter()
        .map(|label| label.map(|label| ClusterId::new(label as u64)))
        .collect();
    Ok(ClusteringResult::try_from_assignments(assignments)?)
}

fn map_data_source_error<D: DataSource>(source: &D, error: DataSourceError) -> HdbscanError {
    HdbscanError::DataSource {
        data_source: Arc::from(source.name()),
        error,
    }
}

fn map_mst_error<D: DataSource>(source: &D, error: MstError) -> HdbscanError {
    match error {
        MstError::DataSource(error) => map_data_source_error(source, error),
        other => HdbscanError::MstFailure {
            code: Arc::from(other.code().as_str()),
            message: Arc::from(other.to_string()),
        },
    }
}

fn map_hierarchy_error(error: HierarchyError) -> HdbscanError {
    HdbscanError::HierarchyFailure {
        code: Arc::from(error.code().as_str()),
        message: Arc::from(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::{HdbscanErrorCode, test_utils::line};

    fn config(min_cluster_size: usize) -> HierarchyConfig {
        HierarchyConfig::new(NonZeroUsize::new(min_cluster_size).expect("non-zero"))
    }

    #[test]
    fn labels_two_separated_pairs() {
        let result = run_pipeline(&line(&[0.0, 1.0, 10.0, 11.0]), 1, 1.0, config(2))
            .expect("pipeline succeeds");
        assert_eq!(result.labels(), vec![0, 0, 1, 1]);
        assert_eq!(result.cluster_count(), 2);
        assert_eq!(result.noise_count(), 0);
    }

    #[test]
    fn mst_data_source_errors_keep_their_origin() {
        let err = map_mst_error(
            &line(&[0.0]),
            MstError::DataSource(DataSourceError::OutOfBounds { index: 3 }),
        );
        assert_eq!(err.code(), HdbscanErrorCode::DataSourceFailure);
        assert_eq!(
            err.data_source_code().map(|code| code.as_str()),
            Some("DATA_SOURCE_OUT_OF_BOUNDS")
        );
    }

    #[test]
    fn other_mst_errors_carry_their_code() {
        let err = map_mst_error(&line(&[0.0]), MstError::EmptyGraph);
        assert_eq!(
            err,
            HdbscanError::MstFailure {
                code: Arc::from("EMPTY_GRAPH"),
                message: Arc::from("cannot compute an MST for an empty graph"),
            }
        );
    }

    #[test]
    fn hierarchy_errors_carry_their_code() {
        let err = map_hierarchy_error(HierarchyError::EmptyDataset);
        assert!(matches!(
            err,
            HdbscanError::HierarchyFailure { ref code, .. } if &**code == "EMPTY_DATASET"
        ));
    }
}
