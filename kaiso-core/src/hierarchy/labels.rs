//! Flat labels from a condensed tree and its selected clusters.

use super::single_linkage::{CondensedEvent, CondensedTree};

/// Labels every point with the dense index of the selected cluster that
/// holds it, or `None` for noise.
///
/// Selected clusters are numbered in id order, which is the order they were
/// created in. When the root itself is selected, only points that stayed in
/// it at least as long as its last event are kept.
pub(super) fn label_points(
    tree: &CondensedTree,
    selected: &[bool],
    node_count: usize,
) -> Vec<Option<usize>> {
    let mut dense = vec![None; selected.len()];
    for (label, cluster_id) in selected
        .iter()
        .enumerate()
        .filter_map(|(cluster_id, &chosen)| chosen.then_some(cluster_id))
        .enumerate()
    {
        dense[cluster_id] = Some(label);
    }

    let mut owner: Vec<Option<usize>> = vec![None; tree.clusters.len()];
    for (cluster_id, cluster) in tree.clusters.iter().enumerate() {
        owner[cluster_id] = if selected[cluster_id] {
            Some(cluster_id)
        } else {
            cluster.parent.and_then(|parent| owner[parent])
        };
    }

    let root_floor = selected
        .get(CondensedTree::ROOT)
        .copied()
        .unwrap_or(false)
        .then(|| last_root_lambda(tree));

    let mut labels = vec![None; node_count];
    for (cluster_id, cluster) in tree.clusters.iter().enumerate() {
        for event in &cluster.events {
            let CondensedEvent::Point { index, lambda } = *event else {
                continue;
            };
            labels[index] = match (owner[cluster_id], root_floor) {
                (Some(CondensedTree::ROOT), Some(floor)) if lambda < floor => None,
                (Some(holder), _) => dense[holder],
                (None, _) => None,
            };
        }
    }
    labels
}

fn last_root_lambda(tree: &CondensedTree) -> f64 {
    tree.clusters[CondensedTree::ROOT]
        .events
        .iter()
        .map(CondensedEvent::lambda)
        .fold(f64::MIN, f64::max)
}
