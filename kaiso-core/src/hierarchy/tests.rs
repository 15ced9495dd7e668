//! Unit tests for hierarchy extraction from the mutual-reachability MST.

use std::num::NonZeroUsize;

use rstest::rstest;

use crate::{
    ClusterSelectionMethod, HierarchyConfig, HierarchyError, MstEdge, core_distance::core_distances,
    extract_labels_from_mst, prim_mst, test_utils::line,
};

fn config(min_cluster_size: usize) -> HierarchyConfig {
    HierarchyConfig::new(NonZeroUsize::new(min_cluster_size).expect("non-zero"))
}

fn labels_1d(points: &[f32], min_samples: usize, config: HierarchyConfig) -> Vec<Option<usize>> {
    let source = line(points);
    let cores = core_distances(&source, min_samples).expect("core distances");
    let edges = prim_mst(&source, &cores, 1.0).expect("MST should succeed");
    extract_labels_from_mst(points.len(), &edges, config).expect("hierarchy extraction")
}

fn cluster_count(labels: &[Option<usize>]) -> usize {
    labels.iter().flatten().max().map_or(0, |max| max + 1)
}

#[rstest]
#[case::eom(ClusterSelectionMethod::Eom)]
#[case::leaf(ClusterSelectionMethod::Leaf)]
fn splits_two_pairs(#[case] selection: ClusterSelectionMethod) {
    let labels = labels_1d(
        &[0.0, 1.0, 10.0, 11.0],
        1,
        config(2).with_selection(selection),
    );
    assert_eq!(labels, vec![Some(0), Some(0), Some(1), Some(1)]);
}

#[rstest]
#[case(vec![0.0, 0.1, 0.2, 10.0, 10.1, 10.2])]
#[case(vec![0.0, 0.0, 0.0, 5.0, 5.0, 5.0])]
fn extracts_two_clusters_without_noise(#[case] points: Vec<f32>) {
    let labels = labels_1d(&points, 2, config(2));

    assert_eq!(cluster_count(&labels), 2);
    assert!(labels.iter().all(Option::is_some));
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[1], labels[2]);
    assert_ne!(labels[2], labels[3]);
    assert_eq!(labels[3], labels[4]);
    assert_eq!(labels[4], labels[5]);
}

#[test]
fn outlier_becomes_noise() {
    let points = [0.0, 0.1, 0.2, 0.3, 10.0, 10.1, 10.2, 10.3, 50.0];
    let labels = labels_1d(&points, 2, config(3));

    assert_eq!(
        labels,
        vec![
            Some(0),
            Some(0),
            Some(0),
            Some(0),
            Some(1),
            Some(1),
            Some(1),
            Some(1),
            None
        ]
    );
}

#[test]
fn leaf_selection_finds_at_least_as_many_clusters_as_eom() {
    let points = [
        0.0, 0.1, 0.2, 1.0, 1.1, 1.2, 10.0, 10.1, 10.2, 10.3, 10.4, 10.5,
    ];
    let eom = labels_1d(&points, 2, config(3));
    let leaf = labels_1d(
        &points,
        2,
        config(3).with_selection(ClusterSelectionMethod::Leaf),
    );
    assert!(cluster_count(&leaf) >= cluster_count(&eom));
    assert!(cluster_count(&leaf) >= 3);
}

#[rstest]
#[case::eom(ClusterSelectionMethod::Eom)]
#[case::leaf(ClusterSelectionMethod::Leaf)]
fn uniform_line_is_noise_unless_single_cluster_allowed(
    #[case] selection: ClusterSelectionMethod,
) {
    // Equal gaps never split the root, so it is the only condensed cluster.
    let points = [0.0, 1.0, 2.0, 3.0];

    let labels = labels_1d(&points, 1, config(2).with_selection(selection));
    assert_eq!(labels, vec![None; 4]);

    let single = config(2)
        .with_selection(selection)
        .with_allow_single_cluster(true);
    let labels = labels_1d(&points, 1, single);
    assert_eq!(labels, vec![Some(0); 4]);
}

#[test]
fn leaf_single_cluster_keeps_only_points_that_reach_the_root_floor() {
    let points = [0.0, 0.5, 1.0, 1.5, 9.0];
    let single = config(2)
        .with_selection(ClusterSelectionMethod::Leaf)
        .with_allow_single_cluster(true);
    let labels = labels_1d(&points, 1, single);
    assert_eq!(labels, vec![Some(0), Some(0), Some(0), Some(0), None]);
}

#[test]
fn single_cluster_drops_points_that_left_the_root_early() {
    // The straggler at 9 leaves the root long before the rest merge.
    let points = [0.0, 0.5, 1.0, 1.5, 9.0];
    let labels = labels_1d(&points, 1, config(2).with_allow_single_cluster(true));
    assert_eq!(labels[4], None);
    assert!(labels[..4].iter().all(|label| *label == Some(0)));
}

#[test]
fn clusters_are_numbered_level_by_level() {
    // Root splits into a (0..=5.1) and b (100..). a splits into a1 (0..=1.1)
    // and a2, b into b1 and b2, and a1 splits once more one level down.
    let points = [0.0, 0.1, 1.0, 1.1, 5.0, 5.1, 100.0, 100.1, 110.0, 110.1];
    let labels = labels_1d(
        &points,
        1,
        config(2).with_selection(ClusterSelectionMethod::Leaf),
    );
    let expected: Vec<Option<usize>> = [3, 3, 4, 4, 0, 0, 1, 1, 2, 2]
        .into_iter()
        .map(Some)
        .collect();
    assert_eq!(labels, expected);
}

#[test]
fn datasets_smaller_than_min_cluster_size_are_noise() {
    let labels = labels_1d(&[0.0, 1.0, 2.0], 1, config(5));
    assert_eq!(labels, vec![None; 3]);
}

#[test]
fn single_point_is_noise() {
    let labels = extract_labels_from_mst(1, &[], config(2)).expect("single point is valid");
    assert_eq!(labels, vec![None]);
}

#[test]
fn rejects_empty_dataset() {
    let err = extract_labels_from_mst(0, &[], config(2)).expect_err("empty datasets are invalid");
    assert_eq!(err, HierarchyError::EmptyDataset);
    assert_eq!(err.code().as_str(), "EMPTY_DATASET");
}

#[test]
fn rejects_negative_edge_weights() {
    let err = extract_labels_from_mst(2, &[MstEdge::new(0, 1, -1.0)], config(2))
        .expect_err("negative edge weights are invalid");
    assert!(matches!(err, HierarchyError::InvalidEdgeWeight { .. }));
}

#[rstest]
#[case::too_few_edges(3, vec![MstEdge::new(0, 1, 1.0)])]
#[case::cycle(3, vec![MstEdge::new(0, 1, 1.0), MstEdge::new(1, 0, 2.0)])]
fn rejects_edges_that_do_not_span(#[case] node_count: usize, #[case] edges: Vec<MstEdge>) {
    let err = extract_labels_from_mst(node_count, &edges, config(2))
        .expect_err("edges must span the dataset");
    assert!(matches!(err, HierarchyError::NotASpanningTree { .. }));
}

#[test]
fn rejects_out_of_range_endpoints() {
    let err = extract_labels_from_mst(2, &[MstEdge::new(0, 4, 1.0)], config(2))
        .expect_err("endpoint outside the dataset");
    assert_eq!(
        err,
        HierarchyError::InvalidNodeId {
            node: 4,
            node_count: 2
        }
    );
}
