//! Choosing which condensed clusters become flat clusters.

use std::fmt;

use super::single_linkage::CondensedTree;

/// Strategy for picking flat clusters out of the condensed tree.
///
/// # Examples
/// ```
/// use kaiso_core::ClusterSelectionMethod;
///
/// assert_eq!(ClusterSelectionMethod::default(), ClusterSelectionMethod::Eom);
/// assert_eq!(ClusterSelectionMethod::Leaf.as_str(), "leaf");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ClusterSelectionMethod {
    /// Excess of mass: the non-overlapping clusters with the largest total
    /// stability.
    #[default]
    Eom,
    /// The leaves of the condensed tree.
    Leaf,
}

impl ClusterSelectionMethod {
    /// Lowercase name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eom => "eom",
            Self::Leaf => "leaf",
        }
    }
}

impl fmt::Display for ClusterSelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns one flag per condensed cluster marking the selected ones.
///
/// No selected cluster is ever nested inside another. The root is only a
/// candidate when `allow_single_cluster` is set.
pub(super) fn select_clusters(
    tree: &CondensedTree,
    method: ClusterSelectionMethod,
    allow_single_cluster: bool,
) -> Vec<bool> {
    let mut selected = match method {
        ClusterSelectionMethod::Eom => excess_of_mass(tree, allow_single_cluster),
        ClusterSelectionMethod::Leaf => leaves(tree, allow_single_cluster),
    };
    drop_nested(tree, &mut selected);
    selected
}

fn is_candidate(cluster_id: usize, allow_single_cluster: bool) -> bool {
    cluster_id != CondensedTree::ROOT || allow_single_cluster
}

/// Bottom-up: a cluster wins when its own stability is at least the best
/// total its descendants can offer. Ties favour the parent.
fn excess_of_mass(tree: &CondensedTree, allow_single_cluster: bool) -> Vec<bool> {
    let count = tree.clusters.len();
    let mut best = vec![0.0_f64; count];
    let mut selected = vec![false; count];

    for cluster_id in (0..count).rev() {
        let cluster = &tree.clusters[cluster_id];
        let from_children: f64 = cluster.children.iter().map(|&child| best[child]).sum();
        if is_candidate(cluster_id, allow_single_cluster) && cluster.stability >= from_children {
            selected[cluster_id] = true;
            best[cluster_id] = cluster.stability;
        } else {
            best[cluster_id] = from_children;
        }
    }
    selected
}

/// Clusters without children. A tree that never splits has the root as its
/// only leaf, so it is selected only when `allow_single_cluster` is set.
fn leaves(tree: &CondensedTree, allow_single_cluster: bool) -> Vec<bool> {
    tree.clusters
        .iter()
        .enumerate()
        .map(|(cluster_id, cluster)| {
            cluster.children.is_empty() && is_candidate(cluster_id, allow_single_cluster)
        })
        .collect()
}

/// Top-down: clears any selection that sits below a selected ancestor.
fn drop_nested(tree: &CondensedTree, selected: &mut [bool]) {
    let mut covered = vec![false; selected.len()];
    for (cluster_id, cluster) in tree.clusters.iter().enumerate() {
        let Some(parent) = cluster.parent else {
            continue;
        };
        covered[cluster_id] = covered[parent] || selected[parent];
        if covered[cluster_id] {
            selected[cluster_id] = false;
        }
    }
}
