//! Kaiso core library: HDBSCAN clustering over pairwise-distance sources.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod core_distance;
mod datasource;
mod distance;
mod error;
mod hdbscan;
mod hierarchy;
mod matrix;
mod mst;
mod normalize;
mod pipeline;
mod result;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{ALL_CORES, DEFAULT_MIN_CLUSTER_SIZE, HdbscanBuilder},
    datasource::DataSource,
    distance::{
        Distance, DistanceError, Metric, VectorKind, chebyshev_distance, cosine_distance,
        euclidean_distance, l2_norm, manhattan_distance,
    },
    error::{
        DataSourceError, DataSourceErrorCode, HdbscanError, HdbscanErrorCode, Result,
    },
    hdbscan::Hdbscan,
    hierarchy::{
        ClusterSelectionMethod, HierarchyConfig, HierarchyError, HierarchyErrorCode,
        extract_labels_from_mst,
    },
    matrix::EmbeddingMatrix,
    mst::{MstEdge, MstError, MstErrorCode, mutual_reachability, prim_mst},
    normalize::{NORM_FLOOR, l2_normalize},
    result::{ClusterId, ClusteringResult, NOISE_LABEL, NonContiguousClusterIds},
};
