//! k-nearest-neighbour proximity complexes.
//!
//! The complex is the graph handed to `ctree` together with the vertex
//! values: every point is joined to its `k` nearest other points, and the
//! directed neighbour relation is symmetrised into an undirected edge list.
//!
//! Neighbours are ranked by `(squared Euclidean distance, point index)`, so
//! among equidistant candidates the lower index wins. Both search engines
//! apply the same rule and therefore produce identical complexes.

mod brute;
mod kdtree;
mod points;

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::{NodeId, Result, error::ArgumentError};

use self::kdtree::KdTree;
pub use self::points::PointCloud;

/// Largest cloud [`NeighborStrategy::Auto`] scans exhaustively.
pub const AUTO_BRUTE_FORCE_LIMIT: usize = 64;

/// Selects the engine used to answer neighbour queries.
///
/// # Examples
/// ```
/// use denali_core::{ComplexBuilder, NeighborStrategy};
///
/// let builder = ComplexBuilder::new(2).with_strategy(NeighborStrategy::BruteForce);
/// assert_eq!(builder.strategy(), NeighborStrategy::BruteForce);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NeighborStrategy {
    /// Brute force up to [`AUTO_BRUTE_FORCE_LIMIT`] points, k-d tree above.
    #[default]
    Auto,
    /// Always build a k-d tree.
    KdTree,
    /// Always compare every pair of points.
    BruteForce,
}

impl NeighborStrategy {
    fn resolve(self, points: usize) -> Self {
        match self {
            Self::Auto if points <= AUTO_BRUTE_FORCE_LIMIT => Self::BruteForce,
            Self::Auto => Self::KdTree,
            fixed => fixed,
        }
    }
}

/// A candidate neighbour and its squared distance from the query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Neighbour {
    pub(crate) id: usize,
    pub(crate) distance: f64,
}

impl Eq for Neighbour {}

impl Ord for Neighbour {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for Neighbour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Configures and builds k-nearest-neighbour complexes.
///
/// # Examples
/// ```
/// use denali_core::{ComplexBuilder, PointCloud};
///
/// let cloud = PointCloud::from_rows(&[[0.0], [1.0], [3.0], [7.0]])?;
/// let edges = ComplexBuilder::new(1).build(&cloud)?;
/// assert_eq!(edges, vec![(0, 1), (1, 2), (2, 3)]);
/// # Ok::<(), denali_core::DenaliError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComplexBuilder {
    k: usize,
    strategy: NeighborStrategy,
}

impl ComplexBuilder {
    /// Creates a builder joining each point to its `k` nearest neighbours.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            strategy: NeighborStrategy::Auto,
        }
    }

    /// Overrides the neighbour search engine.
    #[must_use]
    pub fn with_strategy(mut self, strategy: NeighborStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the configured neighbour count.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the configured search strategy.
    #[must_use]
    pub fn strategy(&self) -> NeighborStrategy {
        self.strategy
    }

    /// Builds the symmetrised neighbour graph of `points`.
    ///
    /// Edges are `(min, max)` pairs without self-loops or duplicates, sorted
    /// ascending. The graph is not guaranteed to be connected; raise `k`
    /// when `ctree` needs a connected complex.
    ///
    /// # Errors
    /// Returns [`ArgumentError::ZeroNeighbors`] when `k == 0` and
    /// [`ArgumentError::TooManyNeighbors`] unless `k` is smaller than the
    /// number of points.
    #[instrument(
        name = "core.build_complex",
        skip_all,
        fields(points = points.len(), dimension = points.dimension(), k = self.k),
    )]
    pub fn build(&self, points: &PointCloud) -> Result<Vec<(NodeId, NodeId)>> {
        self.validate(points)?;
        let strategy = self.strategy.resolve(points.len());
        let lists = self.neighbour_lists(points, strategy);

        let mut edges = BTreeSet::new();
        for (point, neighbours) in lists.iter().enumerate() {
            for neighbour in neighbours {
                if neighbour.id != point {
                    edges.insert((point.min(neighbour.id), point.max(neighbour.id)));
                }
            }
        }
        let edges: Vec<_> = edges.into_iter().collect();
        debug!(?strategy, edges = edges.len(), "built neighbour complex");
        Ok(edges)
    }

    fn validate(&self, points: &PointCloud) -> core::result::Result<(), ArgumentError> {
        if self.k == 0 {
            return Err(ArgumentError::ZeroNeighbors);
        }
        if self.k >= points.len() {
            return Err(ArgumentError::TooManyNeighbors {
                k: self.k,
                points: points.len(),
            });
        }
        Ok(())
    }

    fn neighbour_lists(
        &self,
        points: &PointCloud,
        strategy: NeighborStrategy,
    ) -> Vec<Vec<Neighbour>> {
        match strategy {
            NeighborStrategy::KdTree => {
                let tree = KdTree::build(points);
                (0..points.len())
                    .map(|query| tree.nearest(query, self.k))
                    .collect()
            }
            NeighborStrategy::BruteForce | NeighborStrategy::Auto => (0..points.len())
                .map(|query| brute::nearest(points, query, self.k))
                .collect(),
        }
    }
}

/// Builds the k-nearest-neighbour complex of `points` with default settings.
///
/// # Errors
/// Returns [`ArgumentError`] for an empty cloud, zero-dimensional, ragged or
/// non-finite rows, and for `k` outside `1..points.len()`.
///
/// # Examples
/// ```
/// let points = [[0.0, 0.0], [0.0, 1.0], [5.0, 5.0]];
/// let edges = denali_core::kneighbors_complex(&points, 1)?;
/// assert_eq!(edges, vec![(0, 1), (1, 2)]);
/// # Ok::<(), denali_core::DenaliError>(())
/// ```
pub fn kneighbors_complex<R: AsRef<[f64]>>(
    points: &[R],
    k: usize,
) -> Result<Vec<(NodeId, NodeId)>> {
    let cloud = PointCloud::from_rows(points)?;
    ComplexBuilder::new(k).build(&cloud)
}

#[cfg(test)]
mod tests;
