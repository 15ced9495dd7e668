//! Union-find used to assemble the single-linkage dendrogram.
//!
//! Every merge allocates a fresh dendrogram node id (`points..`), and both
//! merged roots point at it, so `find` on any point yields the dendrogram
//! node that currently represents its component.

#[derive(Clone, Debug)]
pub(super) struct DisjointSet {
    parent: Vec<usize>,
    next: usize,
}

impl DisjointSet {
    pub(super) fn new(points: usize) -> Self {
        let capacity = points.saturating_mul(2).saturating_sub(1);
        Self {
            parent: (0..capacity).collect(),
            next: points,
        }
    }

    pub(super) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Joins two roots under a new node and returns the new node's id.
    pub(super) fn merge(&mut self, left_root: usize, right_root: usize) -> usize {
        let merged = self.next;
        self.parent[left_root] = merged;
        self.parent[right_root] = merged;
        self.next += 1;
        merged
    }
}
