//! Exhaustive neighbour scan.

use std::collections::BinaryHeap;

use super::{Neighbour, points::PointCloud};

/// Returns the `k` nearest other points of `query`, nearest first.
pub(super) fn nearest(points: &PointCloud, query: usize, k: usize) -> Vec<Neighbour> {
    let mut heap: BinaryHeap<Neighbour> = BinaryHeap::with_capacity(k + 1);
    for candidate in (0..points.len()).filter(|&candidate| candidate != query) {
        heap.push(Neighbour {
            id: candidate,
            distance: points.squared_distance(query, candidate),
        });
        if heap.len() > k {
            heap.pop();
        }
    }
    heap.into_sorted_vec()
}
