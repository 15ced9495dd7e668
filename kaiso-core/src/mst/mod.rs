//! Minimum spanning tree over the dense mutual-reachability graph.
//!
//! Prim's algorithm keeps, for every point outside the tree, the lightest
//! known edge into the tree. Each round relaxes those candidates against the
//! newest tree point in parallel and then attaches the lightest candidate.
//! Memory stays linear in the number of points because the graph itself is
//! never materialised.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{datasource::DataSource, distance::saturate_to_f32, error::DataSourceError};

/// Errors returned while computing a minimum spanning tree.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum MstError {
    /// The caller requested an MST for an empty graph.
    #[error("cannot compute an MST for an empty graph")]
    EmptyGraph,
    /// The core distances did not cover every point.
    #[error("expected {expected} core distances, got {actual}")]
    CoreDistanceLengthMismatch {
        /// Number of points in the source.
        expected: usize,
        /// Number of core distances supplied.
        actual: usize,
    },
    /// An edge weight evaluated to NaN or an infinity.
    #[error("edge ({left}, {right}) has non-finite weight")]
    NonFiniteWeight {
        /// The tree-side endpoint.
        left: usize,
        /// The candidate endpoint.
        right: usize,
    },
    /// The data source failed to produce a distance.
    #[error("data source failed: {0}")]
    DataSource(#[from] DataSourceError),
}

impl MstError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> MstErrorCode {
        match self {
            Self::EmptyGraph => MstErrorCode::EmptyGraph,
            Self::CoreDistanceLengthMismatch { .. } => MstErrorCode::CoreDistanceLengthMismatch,
            Self::NonFiniteWeight { .. } => MstErrorCode::NonFiniteWeight,
            Self::DataSource(_) => MstErrorCode::DataSource,
        }
    }
}

/// Machine-readable error codes for [`MstError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MstErrorCode {
    /// The caller requested an MST for an empty graph.
    EmptyGraph,
    /// The core distances did not cover every point.
    CoreDistanceLengthMismatch,
    /// An edge weight evaluated to NaN or an infinity.
    NonFiniteWeight,
    /// The data source failed to produce a distance.
    DataSource,
}

impl MstErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyGraph => "EMPTY_GRAPH",
            Self::CoreDistanceLengthMismatch => "CORE_DISTANCE_LENGTH_MISMATCH",
            Self::NonFiniteWeight => "NON_FINITE_WEIGHT",
            Self::DataSource => "DATA_SOURCE",
        }
    }
}

/// A single MST edge in canonical undirected form (`source < target`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MstEdge {
    source: usize,
    target: usize,
    weight: f32,
}

impl MstEdge {
    /// Builds an edge, ordering the endpoints canonically.
    #[must_use]
    pub fn new(left: usize, right: usize, weight: f32) -> Self {
        let (source, target) = if left <= right {
            (left, right)
        } else {
            (right, left)
        };
        Self {
            source,
            target,
            weight,
        }
    }

    /// Returns the smaller endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> usize { self.source }

    /// Returns the larger endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> usize { self.target }

    /// Returns the mutual-reachability weight.
    #[must_use]
    #[rustfmt::skip]
    pub fn weight(&self) -> f32 { self.weight }
}

impl Eq for MstEdge {}

impl Ord for MstEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.source.cmp(&other.source))
            .then_with(|| self.target.cmp(&other.target))
    }
}

impl PartialOrd for MstEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Mutual-reachability distance between two points.
///
/// `max(core_left, core_right, distance / alpha)`. The scaled distance is
/// capped at [`f32::MAX`], so finite inputs always give a finite weight.
#[must_use]
pub fn mutual_reachability(distance: f32, core_left: f32, core_right: f32, alpha: f32) -> f32 {
    saturate_to_f32(f64::from(distance) / f64::from(alpha))
        .max(core_left)
        .max(core_right)
}

#[derive(Clone, Copy)]
struct Candidate {
    weight: f32,
    from: usize,
}

/// Computes the minimum spanning tree of the mutual-reachability graph.
///
/// Edges are returned sorted by `(weight, source, target)`. Among equally
/// light candidates the one with the lowest point index joins the tree
/// first, so the output does not depend on the size of the Rayon pool.
///
/// # Errors
/// Returns an error when the source is empty, when `core_distances` does not
/// have one entry per point, when the source fails, or when a weight is
/// non-finite.
#[instrument(
    name = "core.prim_mst",
    err,
    skip(source, core_distances),
    fields(data_source = %source.name(), items = source.len()),
)]
pub fn prim_mst<D: DataSource + Sync>(
    source: &D,
    core_distances: &[f32],
    alpha: f32,
) -> Result<Vec<MstEdge>, MstError> {
    let items = source.len();
    if items == 0 {
        return Err(MstError::EmptyGraph);
    }
    if core_distances.len() != items {
        return Err(MstError::CoreDistanceLengthMismatch {
            expected: items,
            actual: core_distances.len(),
        });
    }

    let mut in_tree = vec![false; items];
    let mut candidates = vec![
        Candidate {
            weight: f32::INFINITY,
            from: 0,
        };
        items
    ];
    let mut edges = Vec::with_capacity(items - 1);
    let mut newest = 0usize;
    in_tree[newest] = true;

    for _ in 1..items {
        relax(source, core_distances, alpha, &in_tree, newest, &mut candidates)?;
        let next = lightest_outside(&in_tree, &candidates);
        let Candidate { weight, from } = candidates[next];
        if !weight.is_finite() {
            return Err(MstError::NonFiniteWeight {
                left: from,
                right: next,
            });
        }
        edges.push(MstEdge::new(from, next, weight));
        in_tree[next] = true;
        newest = next;
    }

    edges.sort_unstable();
    debug!(edges = edges.len(), "minimum spanning tree complete");
    Ok(edges)
}

fn relax<D: DataSource + Sync>(
    source: &D,
    core_distances: &[f32],
    alpha: f32,
    in_tree: &[bool],
    newest: usize,
    candidates: &mut [Candidate],
) -> Result<(), MstError> {
    candidates
        .par_iter_mut()
        .enumerate()
        .filter(|(point, _)| !in_tree[*point])
        .try_for_each(|(point, candidate)| {
            let distance = source.distance(newest, point)?;
            let weight = mutual_reachability(
                distance,
                core_distances[newest],
                core_distances[point],
                alpha,
            );
            if weight.is_nan() {
                return Err(MstError::NonFiniteWeight {
                    left: newest,
                    right: point,
                });
            }
            if weight < candidate.weight {
                *candidate = Candidate {
                    weight,
                    from: newest,
                };
            }
            Ok(())
        })
}

/// Index of the lightest candidate not yet in the tree, lowest index first
/// on ties. Callers guarantee at least one point remains outside.
fn lightest_outside(in_tree: &[bool], candidates: &[Candidate]) -> usize {
    let mut best: Option<usize> = None;
    for (point, candidate) in candidates.iter().enumerate() {
        if in_tree[point] {
            continue;
        }
        match best {
            Some(current) if candidates[current].weight <= candidate.weight => {}
            _ => best = Some(point),
        }
    }
    best.unwrap_or(0)
}
