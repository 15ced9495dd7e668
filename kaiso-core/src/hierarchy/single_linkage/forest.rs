//! Dendrogram construction from mutual-reachability MST edges.

use crate::mst::MstEdge;

use super::super::union_find::DisjointSet;
use super::{Dendrogram, HierarchyError, LinkageNode};

impl Dendrogram {
    /// Builds the dendrogram for a spanning tree over `node_count` points.
    pub(in crate::hierarchy) fn from_mst(
        node_count: usize,
        edges: &[MstEdge],
    ) -> Result<Self, HierarchyError> {
        if node_count == 0 {
            return Err(HierarchyError::EmptyDataset);
        }
        if edges.len() != node_count - 1 {
            return Err(HierarchyError::NotASpanningTree {
                node_count,
                edges: edges.len(),
            });
        }
        validate_edges(node_count, edges)?;

        let mut nodes = Vec::with_capacity(2 * node_count - 1);
        nodes.extend((0..node_count).map(|_| LinkageNode {
            children: None,
            weight: 0.0,
            size: 1,
        }));

        let mut sorted = edges.to_vec();
        sorted.sort_unstable();

        let mut dsu = DisjointSet::new(node_count);
        for edge in sorted {
            let left = dsu.find(edge.source());
            let right = dsu.find(edge.target());
            if left == right {
                return Err(HierarchyError::NotASpanningTree {
                    node_count,
                    edges: edges.len(),
                });
            }
            let size = nodes[left].size + nodes[right].size;
            nodes.push(LinkageNode {
                children: Some((left, right)),
                weight: edge.weight(),
                size,
            });
            dsu.merge(left, right);
        }

        Ok(Self { nodes })
    }
}

fn validate_edges(node_count: usize, edges: &[MstEdge]) -> Result<(), HierarchyError> {
    for edge in edges {
        if edge.target() >= node_count {
            return Err(HierarchyError::InvalidNodeId {
                node: edge.target(),
                node_count,
            });
        }
        let weight = edge.weight();
        if !weight.is_finite() || weight < 0.0 {
            return Err(HierarchyError::InvalidEdgeWeight {
                left: edge.source(),
                right: edge.target(),
                weight,
            });
        }
    }
    Ok(())
}
