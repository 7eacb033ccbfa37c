//! In-memory k-d tree for exact k-nearest-neighbour queries.
//!
//! The tree is built once per point cloud by median splits on a cycling
//! axis. Queries keep a bounded max-heap of the best candidates and only
//! descend into the far side of a split when the splitting plane is no
//! farther than the current worst candidate.

use std::collections::BinaryHeap;

use super::{Neighbour, points::PointCloud};

#[derive(Clone, Copy, Debug)]
struct Node {
    point: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Arena-backed k-d tree over the indices of a [`PointCloud`].
#[derive(Debug)]
pub(super) struct KdTree<'a> {
    points: &'a PointCloud,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl<'a> KdTree<'a> {
    pub(super) fn build(points: &'a PointCloud) -> Self {
        let mut indices: Vec<usize> = (0..points.len()).collect();
        let mut tree = Self {
            points,
            nodes: Vec::with_capacity(indices.len()),
            root: None,
        };
        tree.root = tree.build_node(&mut indices, 0);
        tree
    }

    fn build_node(&mut self, indices: &mut [usize], depth: usize) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }
        let axis = depth % self.points.dimension();
        let median = indices.len() / 2;
        let points = self.points;
        indices.select_nth_unstable_by(median, |&a, &b| {
            points.point(a)[axis]
                .total_cmp(&points.point(b)[axis])
                .then(a.cmp(&b))
        });

        let slot = self.nodes.len();
        self.nodes.push(Node {
            point: indices[median],
            axis,
            left: None,
            right: None,
        });
        let (below, rest) = indices.split_at_mut(median);
        let left = self.build_node(below, depth + 1);
        let right = self.build_node(&mut rest[1..], depth + 1);
        self.nodes[slot].left = left;
        self.nodes[slot].right = right;
        Some(slot)
    }

    /// Returns the `k` nearest points to `query` other than itself, nearest
    /// first, ordered by `(squared distance, index)`.
    pub(super) fn nearest(&self, query: usize, k: usize) -> Vec<Neighbour> {
        let mut best = BinaryHeap::with_capacity(k + 1);
        if let Some(root) = self.root {
            self.search(root, query, k, &mut best);
        }
        best.into_sorted_vec()
    }

    fn search(&self, slot: usize, query: usize, k: usize, best: &mut BinaryHeap<Neighbour>) {
        let node = self.nodes[slot];
        if node.point != query {
            best.push(Neighbour {
                id: node.point,
                distance: self.points.squared_distance(query, node.point),
            });
            if best.len() > k {
                best.pop();
            }
        }

        let diff = self.points.point(query)[node.axis] - self.points.point(node.point)[node.axis];
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        if let Some(near) = near {
            self.search(near, query, k, best);
        }
        if let Some(far) = far {
            // Equal distances must still be visited: a tied point with a
            // lower index displaces the current worst candidate.
            let worst = best.peek().map_or(f64::INFINITY, |worst| worst.distance);
            if best.len() < k || diff * diff <= worst {
                self.search(far, query, k, best);
            }
        }
    }
}
