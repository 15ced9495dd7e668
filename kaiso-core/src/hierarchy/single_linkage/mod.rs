//! Single-linkage dendrogram and its condensed tree.
//!
//! Sorting the MST edges by weight and merging components with a union-find
//! recovers the single-linkage dendrogram of the mutual-reachability graph.
//! Condensing that dendrogram with `min_cluster_size` then keeps only the
//! splits where both sides are large enough to be clusters:
//!
//! - both sides large: the parent ends and two child clusters are born;
//! - one side large: the parent carries on down that side and the small
//!   side's points fall out at the split's lambda;
//! - neither side large: the parent ends and every point falls out.
//!
//! Lambda is `1 / distance`. Both passes are iterative so deep hierarchies
//! cannot exhaust the stack.

mod condense;
mod forest;

pub(super) use self::condense::condense;

/// Errors returned by hierarchy extraction.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum HierarchyError {
    /// Hierarchy extraction requires at least one node.
    #[error("cannot extract a hierarchy for an empty dataset")]
    EmptyDataset,
    /// An MST edge referenced a point outside the dataset.
    #[error("edge references node {node}, but node_count is {node_count}")]
    InvalidNodeId {
        /// The offending endpoint.
        node: usize,
        /// Number of points in the dataset.
        node_count: usize,
    },
    /// An MST edge weight was invalid for hierarchy extraction.
    #[error("invalid MST edge weight {weight} for edge ({left}, {right})")]
    InvalidEdgeWeight {
        /// Smaller endpoint id for the offending edge.
        left: usize,
        /// Larger endpoint id for the offending edge.
        right: usize,
        /// Invalid weight value observed on the edge.
        weight: f32,
    },
    /// The edges do not connect every point exactly once.
    #[error("{edges} edges do not form a spanning tree over {node_count} nodes")]
    NotASpanningTree {
        /// Number of points in the dataset.
        node_count: usize,
        /// Number of edges supplied.
        edges: usize,
    },
}

impl HierarchyError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> HierarchyErrorCode {
        match self {
            Self::EmptyDataset => HierarchyErrorCode::EmptyDataset,
            Self::InvalidNodeId { .. } => HierarchyErrorCode::InvalidNodeId,
            Self::InvalidEdgeWeight { .. } => HierarchyErrorCode::InvalidEdgeWeight,
            Self::NotASpanningTree { .. } => HierarchyErrorCode::NotASpanningTree,
        }
    }
}

/// Machine-readable error codes for [`HierarchyError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HierarchyErrorCode {
    /// The caller requested hierarchy extraction for an empty dataset.
    EmptyDataset,
    /// An MST edge referenced a point outside the dataset.
    InvalidNodeId,
    /// An input edge weight was invalid for hierarchy extraction.
    InvalidEdgeWeight,
    /// The edges do not connect every point exactly once.
    NotASpanningTree,
}

impl HierarchyErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::InvalidNodeId => "INVALID_NODE_ID",
            Self::InvalidEdgeWeight => "INVALID_EDGE_WEIGHT",
            Self::NotASpanningTree => "NOT_A_SPANNING_TREE",
        }
    }
}

/// A dendrogram node. Ids below the point count are leaves.
#[derive(Clone, Debug)]
pub(super) struct LinkageNode {
    pub(super) children: Option<(usize, usize)>,
    pub(super) weight: f32,
    pub(super) size: usize,
}

/// Binary merge tree over all points; the last node is the root.
#[derive(Clone, Debug)]
pub(super) struct Dendrogram {
    pub(super) nodes: Vec<LinkageNode>,
}

impl Dendrogram {
    pub(super) fn root(&self) -> usize {
        self.nodes.len() - 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum CondensedEvent {
    Point {
        index: usize,
        lambda: f64,
    },
    ChildCluster {
        cluster: usize,
        lambda: f64,
        size: usize,
    },
}

impl CondensedEvent {
    pub(super) fn lambda(&self) -> f64 {
        match *self {
            Self::Point { lambda, .. } | Self::ChildCluster { lambda, .. } => lambda,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct CondensedCluster {
    pub(super) parent: Option<usize>,
    pub(super) birth_lambda: f64,
    pub(super) stability: f64,
    pub(super) events: Vec<CondensedEvent>,
    pub(super) children: Vec<usize>,
}

impl CondensedCluster {
    fn new(parent: Option<usize>, birth_lambda: f64) -> Self {
        Self {
            parent,
            birth_lambda,
            stability: 0.0,
            events: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Condensed clusters indexed by id. Cluster `0` is the root, and every
/// child's id is larger than its parent's.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct CondensedTree {
    pub(super) clusters: Vec<CondensedCluster>,
}

impl CondensedTree {
    pub(super) const ROOT: usize = 0;
}
