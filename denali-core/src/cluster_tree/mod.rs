//! Cluster trees derived from single-linkage clusterings.
//!
//! A single-linkage clustering of `n` points is an ordered list of `n - 1`
//! merges. Merge `i` joins two existing clusters (original points `0..n` or
//! clusters formed by earlier merges) into the new cluster `n + i`. The
//! cluster tree has one node per cluster; each merge becomes a parent with
//! two children, both valued by the merge's height.

mod linkage;

#[cfg(feature = "graph")]
use tracing::{debug, instrument};

use crate::{NodeId, error::ArgumentError};
#[cfg(feature = "graph")]
use crate::{
    Result,
    tree::{RootedTree, Tree, TreeEdge},
};

pub use self::linkage::read_linkage;

/// `gamma` used by [`exp_height_factory`] when the caller has no preference.
pub const DEFAULT_GAMMA: f64 = 0.1;

/// One merge step of a single-linkage clustering.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClusterMerge {
    /// First cluster joined by the merge.
    pub left: NodeId,
    /// Second cluster joined by the merge.
    pub right: NodeId,
    /// Linkage distance at which the merge happened.
    pub height: f64,
}

impl ClusterMerge {
    /// Creates a merge of `left` and `right` at `height`.
    #[must_use]
    pub const fn new(left: NodeId, right: NodeId, height: f64) -> Self {
        Self {
            left,
            right,
            height,
        }
    }
}

/// Builds the rooted cluster tree of `merges`.
///
/// With `n = merges.len() + 1` the tree has `2n - 1` nodes: leaves `0..n`
/// and internal nodes `n..2n-1`, where node `n + i` is the parent of both
/// clusters joined by `merges[i]`. Both children of a merge are valued
/// `height(&merges[i])`; the root `2n - 2` is valued `0`. An empty merge list
/// yields the single leaf `0`.
///
/// # Errors
/// Returns [`ArgumentError::SelfMerge`] when a merge joins a cluster with
/// itself, [`ArgumentError::UnknownCluster`] when it references a cluster
/// not formed yet and [`ArgumentError::ClusterMergedTwice`] when a cluster
/// is consumed by more than one merge.
///
/// # Examples
/// ```
/// use denali_core::{ClusterMerge, build_cluster_tree};
///
/// let merges = [ClusterMerge::new(0, 1, 0.5), ClusterMerge::new(2, 3, 2.0)];
/// let tree = build_cluster_tree(&merges, |merge| merge.height)?;
/// assert_eq!(tree.root(), 4);
/// assert_eq!(tree.tree().value(0), Some(0.5));
/// assert_eq!(tree.tree().value(3), Some(2.0));
/// assert_eq!(tree.tree().value(4), Some(0.0));
/// # Ok::<(), denali_core::DenaliError>(())
/// ```
#[cfg(feature = "graph")]
#[instrument(name = "core.build_cluster_tree", skip_all, fields(merges = merges.len()))]
pub fn build_cluster_tree(
    merges: &[ClusterMerge],
    mut height: impl FnMut(&ClusterMerge) -> f64,
) -> Result<RootedTree> {
    let leaves = merges.len() + 1;
    let root = 2 * leaves - 2;
    let mut consumed = vec![false; root + 1];
    let mut tree = Tree::new();
    for leaf in 0..leaves {
        tree.add_node(leaf, 0.0);
    }

    for (index, merge) in merges.iter().enumerate() {
        let parent = leaves + index;
        if merge.left == merge.right {
            return Err(ArgumentError::SelfMerge {
                merge: index,
                cluster: merge.left,
            }
            .into());
        }
        for cluster in [merge.left, merge.right] {
            if cluster >= parent {
                return Err(ArgumentError::UnknownCluster {
                    merge: index,
                    cluster,
                }
                .into());
            }
            if std::mem::replace(&mut consumed[cluster], true) {
                return Err(ArgumentError::ClusterMergedTwice {
                    merge: index,
                    cluster,
                }
                .into());
            }
        }

        let value = height(merge);
        tree.add_node(parent, 0.0);
        for child in [merge.left, merge.right] {
            tree.add_node(child, value);
            tree.add_edge(parent, child, TreeEdge::default());
        }
    }

    debug!(nodes = tree.node_count(), root, "built cluster tree");
    Ok(RootedTree::from_parts(root, tree))
}

/// Returns a height function mapping merge heights onto an exponential scale.
///
/// The function computes `exp(-a * (height - beta))` with
/// `a = -ln(gamma) / (alpha - beta)`, so a merge at `beta` maps to `1` and a
/// merge at `alpha` maps to `gamma`.
///
/// # Errors
/// Returns [`ArgumentError::InvalidGamma`] unless `gamma` is finite and
/// positive, and [`ArgumentError::DegenerateHeightRange`] when `alpha` or
/// `beta` is not finite or they do not give a finite scale (for example
/// `alpha == beta`).
///
/// # Examples
/// ```
/// use denali_core::{ClusterMerge, DEFAULT_GAMMA, exp_height_factory};
///
/// let height = exp_height_factory(10.0, 0.0, DEFAULT_GAMMA)?;
/// assert!((height(&ClusterMerge::new(0, 1, 0.0)) - 1.0).abs() < 1e-12);
/// assert!((height(&ClusterMerge::new(0, 1, 10.0)) - 0.1).abs() < 1e-12);
/// # Ok::<(), denali_core::ArgumentError>(())
/// ```
pub fn exp_height_factory(
    alpha: f64,
    beta: f64,
    gamma: f64,
) -> core::result::Result<impl Fn(&ClusterMerge) -> f64 + Copy, ArgumentError> {
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(ArgumentError::InvalidGamma { gamma });
    }
    let a = -gamma.ln() / (alpha - beta);
    if !(alpha.is_finite() && beta.is_finite() && a.is_finite()) {
        return Err(ArgumentError::DegenerateHeightRange { alpha, beta });
    }
    Ok(move |merge: &ClusterMerge| (-a * (merge.height - beta)).exp())
}

#[cfg(test)]
mod tests;
