//! Flat clustering from the mutual-reachability minimum spanning tree.
//!
//! The stages run in order:
//!
//! - build the single-linkage dendrogram from the MST;
//! - condense it with `min_cluster_size`, scoring each condensed cluster by
//!   stability (`sum((lambda - lambda_birth) * size)`);
//! - select clusters by excess of mass or by leaves;
//! - label each point by the selected cluster containing it.
//!
//! This stage is sequential; it is linear in the number of points once the
//! MST edges are sorted.

mod labels;
mod selection;
mod single_linkage;
mod union_find;

use std::num::NonZeroUsize;

use tracing::{debug, instrument};

use crate::mst::MstEdge;

pub use self::selection::ClusterSelectionMethod;
pub use self::single_linkage::{HierarchyError, HierarchyErrorCode};

use self::{
    labels::label_points,
    selection::select_clusters,
    single_linkage::{Dendrogram, condense},
};

/// Configuration for hierarchy extraction.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use kaiso_core::{ClusterSelectionMethod, HierarchyConfig};
///
/// let size = NonZeroUsize::new(5).expect("non-zero");
/// let config = HierarchyConfig::new(size).with_selection(ClusterSelectionMethod::Leaf);
/// assert_eq!(config.selection(), ClusterSelectionMethod::Leaf);
/// assert!(!config.allow_single_cluster());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HierarchyConfig {
    min_cluster_size: NonZeroUsize,
    selection: ClusterSelectionMethod,
    allow_single_cluster: bool,
}

impl HierarchyConfig {
    /// Creates a configuration using the provided `min_cluster_size`, EOM
    /// selection, and no single-cluster results.
    #[must_use]
    pub fn new(min_cluster_size: NonZeroUsize) -> Self {
        Self {
            min_cluster_size,
            selection: ClusterSelectionMethod::Eom,
            allow_single_cluster: false,
        }
    }

    /// Sets the selection method.
    #[must_use]
    pub fn with_selection(mut self, selection: ClusterSelectionMethod) -> Self {
        self.selection = selection;
        self
    }

    /// Allows the whole dataset to come back as one cluster.
    #[must_use]
    pub fn with_allow_single_cluster(mut self, allow: bool) -> Self {
        self.allow_single_cluster = allow;
        self
    }

    /// Returns the minimum cluster size.
    #[must_use]
    pub fn min_cluster_size(&self) -> NonZeroUsize {
        self.min_cluster_size
    }

    /// Returns the selection method.
    #[must_use]
    pub fn selection(&self) -> ClusterSelectionMethod {
        self.selection
    }

    /// Returns whether a single all-encompassing cluster may be selected.
    #[must_use]
    pub fn allow_single_cluster(&self) -> bool {
        self.allow_single_cluster
    }
}

/// Extracts flat cluster labels from a mutual-reachability MST.
///
/// `edges` must form a spanning tree over `node_count` points. Labels are
/// dense cluster indices starting at `0`; `None` marks noise. A dataset
/// smaller than `min_cluster_size` is all noise.
///
/// # Errors
/// Returns [`HierarchyError`] when `node_count == 0`, when the edges do not
/// span the points, or when an edge weight is negative or non-finite.
#[instrument(
    name = "core.extract_labels",
    err,
    skip(edges),
    fields(edges = edges.len()),
)]
pub fn extract_labels_from_mst(
    node_count: usize,
    edges: &[MstEdge],
    config: HierarchyConfig,
) -> Result<Vec<Option<usize>>, HierarchyError> {
    let dendrogram = Dendrogram::from_mst(node_count, edges)?;
    let min_cluster_size = config.min_cluster_size().get().max(2);
    if node_count < min_cluster_size {
        debug!("fewer points than min_cluster_size, all noise");
        return Ok(vec![None; node_count]);
    }

    let tree = condense(&dendrogram, min_cluster_size);
    let selected = select_clusters(&tree, config.selection(), config.allow_single_cluster());
    debug!(
        condensed = tree.clusters.len(),
        selected = selected.iter().filter(|&&chosen| chosen).count(),
        "clusters selected"
    );
    Ok(label_points(&tree, &selected, node_count))
}

#[cfg(test)]
mod tests;
