//! Condensation of a dendrogram into a tree of clusters.

use std::collections::VecDeque;

use super::{CondensedCluster, CondensedEvent, CondensedTree, Dendrogram};

/// Condenses `dendrogram` breadth-first, so condensed clusters are numbered
/// level by level with left children before right ones.
///
/// Callers guarantee `min_cluster_size >= 2` and that the root holds at
/// least `min_cluster_size` points.
pub(in crate::hierarchy) fn condense(
    dendrogram: &Dendrogram,
    min_cluster_size: usize,
) -> CondensedTree {
    let mut clusters = vec![CondensedCluster::new(None, 0.0)];
    let mut pending = VecDeque::from([(dendrogram.root(), CondensedTree::ROOT)]);

    while let Some((node_id, cluster_id)) = pending.pop_front() {
        let node = &dendrogram.nodes[node_id];
        let Some((left, right)) = node.children else {
            record_point(&mut clusters[cluster_id], node_id, f64::MAX);
            continue;
        };

        let lambda = weight_to_lambda(node.weight);
        let left_size = dendrogram.nodes[left].size;
        let right_size = dendrogram.nodes[right].size;

        match (left_size >= min_cluster_size, right_size >= min_cluster_size) {
            (true, true) => {
                let left_cluster = spawn_child(&mut clusters, cluster_id, lambda, left_size);
                let right_cluster = spawn_child(&mut clusters, cluster_id, lambda, right_size);
                pending.push_back((left, left_cluster));
                pending.push_back((right, right_cluster));
            }
            (true, false) => {
                shed_points(dendrogram, right, &mut clusters[cluster_id], lambda);
                pending.push_back((left, cluster_id));
            }
            (false, true) => {
                shed_points(dendrogram, left, &mut clusters[cluster_id], lambda);
                pending.push_back((right, cluster_id));
            }
            (false, false) => {
                shed_points(dendrogram, left, &mut clusters[cluster_id], lambda);
                shed_points(dendrogram, right, &mut clusters[cluster_id], lambda);
            }
        }
    }

    CondensedTree { clusters }
}

fn spawn_child(
    clusters: &mut Vec<CondensedCluster>,
    parent: usize,
    lambda: f64,
    size: usize,
) -> usize {
    let child = clusters.len();
    clusters.push(CondensedCluster::new(Some(parent), lambda));
    let parent = &mut clusters[parent];
    parent.children.push(child);
    parent.events.push(CondensedEvent::ChildCluster {
        cluster: child,
        lambda,
        size,
    });
    add_stability(parent, lambda, size);
    child
}

/// Every point under `node_id` falls out of `cluster` at `lambda`.
fn shed_points(
    dendrogram: &Dendrogram,
    node_id: usize,
    cluster: &mut CondensedCluster,
    lambda: f64,
) {
    let mut stack = vec![node_id];
    while let Some(current) = stack.pop() {
        match dendrogram.nodes[current].children {
            Some((left, right)) => {
                stack.push(right);
                stack.push(left);
            }
            None => record_point(cluster, current, lambda),
        }
    }
}

fn record_point(cluster: &mut CondensedCluster, index: usize, lambda: f64) {
    cluster.events.push(CondensedEvent::Point { index, lambda });
    add_stability(cluster, lambda, 1);
}

fn add_stability(cluster: &mut CondensedCluster, lambda: f64, size: usize) {
    cluster.stability += (lambda - cluster.birth_lambda) * size as f64;
}

/// `1 / weight`, with zero-length merges mapped to the largest finite lambda.
fn weight_to_lambda(weight: f32) -> f64 {
    if weight > 0.0 {
        1.0 / f64::from(weight)
    } else {
        f64::MAX
    }
}
