//! Scalar trees as exchanged through `.tree` files.
//!
//! A [`Tree`] is a graph whose nodes carry a scalar value and whose edges
//! carry a map of member ids to member values plus an optional reduction.
//! Trees read from disk are undirected ([`UndirectedTree`]); orienting one
//! from a chosen root yields a [`RootedTree`]. Connectivity and acyclicity
//! are assumed by the codec, never checked.

mod codec;
mod rooting;

use std::collections::{BTreeMap, BTreeSet};

use petgraph::{
    Directed, Direction, EdgeType, Undirected,
    graphmap::{GraphMap, NodeTrait},
};

use crate::{NodeId, NodeValue};

pub use self::codec::{read_tree, write_tree};
pub(crate) use self::codec::parse_tree;

/// Attributes attached to a tree edge.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TreeEdge {
    /// Members collapsed onto this edge, keyed by member id.
    pub members: BTreeMap<NodeId, f64>,
    /// Scalar summary computed for the edge by a callback, if any.
    pub reduction: Option<f64>,
}

impl TreeEdge {
    /// Creates an edge carrying `members` and no reduction.
    #[must_use]
    pub fn with_members(members: BTreeMap<NodeId, f64>) -> Self {
        Self {
            members,
            reduction: None,
        }
    }
}

/// A scalar-valued tree over a [`GraphMap`] container.
///
/// Node and edge iteration follow insertion order.
///
/// # Examples
/// ```
/// use denali_core::{TreeEdge, UndirectedTree};
///
/// let mut tree = UndirectedTree::new();
/// tree.add_node(0, 1.0);
/// tree.add_node(1, 2.0);
/// tree.add_edge(0, 1, TreeEdge::default());
/// assert_eq!(tree.node_count(), 2);
/// assert!(tree.edge(1, 0).is_some());
/// ```
#[derive(Clone, Debug)]
pub struct Tree<Ty: EdgeType = Undirected> {
    graph: GraphMap<NodeId, TreeEdge, Ty>,
    values: BTreeMap<NodeId, f64>,
}

/// Tree as read from a `.tree` file.
pub type UndirectedTree = Tree<Undirected>;

impl<Ty: EdgeType> Default for Tree<Ty> {
    fn default() -> Self {
        Self {
            graph: GraphMap::new(),
            values: BTreeMap::new(),
        }
    }
}

impl<Ty: EdgeType> Tree<Ty> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` with `value`, overwriting the value if the node exists.
    pub fn add_node(&mut self, id: NodeId, value: f64) {
        self.graph.add_node(id);
        self.values.insert(id, value);
    }

    pub(crate) fn add_unvalued_node(&mut self, id: NodeId) {
        self.graph.add_node(id);
    }

    /// Adds the edge `(u, v)`, inserting missing endpoints without a value.
    ///
    /// Returns the previous attributes when the edge already existed.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, edge: TreeEdge) -> Option<TreeEdge> {
        self.graph.add_edge(u, v, edge)
    }

    /// Returns the value of `id`, if the node exists and has one.
    #[must_use]
    pub fn value(&self, id: NodeId) -> Option<f64> {
        self.values.get(&id).copied()
    }

    /// Reports whether `id` is a node of the tree.
    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.graph.contains_node(id)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.nodes()
    }

    /// Iterates nodes that carry a value as [`NodeValue`] rows.
    pub fn node_values(&self) -> impl Iterator<Item = NodeValue> + '_ {
        self.graph
            .nodes()
            .filter_map(|id| self.value(id).map(|value| NodeValue { id, value }))
    }

    /// Iterates edges as `(u, v, attributes)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &TreeEdge)> + '_ {
        self.graph.all_edges()
    }

    /// Returns the attributes of edge `(u, v)`.
    #[must_use]
    pub fn edge(&self, u: NodeId, v: NodeId) -> Option<&TreeEdge> {
        self.graph.edge_weight(u, v)
    }

    /// Returns mutable attributes of edge `(u, v)`.
    pub fn edge_mut(&mut self, u: NodeId, v: NodeId) -> Option<&mut TreeEdge> {
        self.graph.edge_weight_mut(u, v)
    }

    /// Iterates the neighbours of `id` (successors for directed trees).
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.neighbors(id)
    }

    /// Total number of members across all edges.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.graph
            .all_edges()
            .map(|(_, _, edge)| edge.members.len())
            .sum()
    }

    /// Borrows the underlying graph for use with `petgraph` algorithms.
    #[must_use]
    pub fn graph(&self) -> &GraphMap<NodeId, TreeEdge, Ty> {
        &self.graph
    }

    fn edge_set(&self) -> BTreeMap<(NodeId, NodeId), &TreeEdge> {
        self.graph
            .all_edges()
            .map(|(u, v, edge)| (edge_key::<_, Ty>(u, v), edge))
            .collect()
    }
}

fn edge_key<N: NodeTrait, Ty: EdgeType>(u: N, v: N) -> (N, N) {
    if Ty::is_directed() || u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

impl<Ty: EdgeType> PartialEq for Tree<Ty> {
    fn eq(&self, other: &Self) -> bool {
        let nodes: BTreeSet<NodeId> = self.nodes().collect();
        let other_nodes: BTreeSet<NodeId> = other.nodes().collect();
        nodes == other_nodes && self.values == other.values && self.edge_set() == other.edge_set()
    }
}

/// A tree oriented away from a root: every edge points parent to child.
#[derive(Clone, Debug, PartialEq)]
pub struct RootedTree {
    root: NodeId,
    tree: Tree<Directed>,
}

impl RootedTree {
    pub(crate) fn from_parts(root: NodeId, tree: Tree<Directed>) -> Self {
        Self { root, tree }
    }

    /// Returns the root id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrows the directed tree.
    #[must_use]
    pub fn tree(&self) -> &Tree<Directed> {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut Tree<Directed> {
        &mut self.tree
    }

    /// Consumes the wrapper and returns the directed tree.
    #[must_use]
    pub fn into_tree(self) -> Tree<Directed> {
        self.tree
    }

    /// Iterates the children of `id`.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.tree.graph.neighbors_directed(id, Direction::Outgoing)
    }

    /// Returns the parent of `id`; `None` for the root and for unknown ids.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        if !self.tree.contains_node(id) {
            return None;
        }
        self.tree
            .graph
            .neighbors_directed(id, Direction::Incoming)
            .next()
    }

    /// Iterates nodes without children, in insertion order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.tree
            .nodes()
            .filter(|&id| self.children(id).next().is_none())
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use petgraph::EdgeType;
    use serde::{Serialize, Serializer, ser::SerializeStruct};

    use super::{RootedTree, Tree, TreeEdge};
    use crate::{NodeId, NodeValue};

    #[derive(Serialize)]
    struct EdgeRow<'a> {
        source: NodeId,
        target: NodeId,
        #[serde(flatten)]
        attributes: &'a TreeEdge,
    }

    impl<Ty: EdgeType> Serialize for Tree<Ty> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let nodes: Vec<NodeValue> = self.node_values().collect();
            let edges: Vec<EdgeRow<'_>> = self
                .edges()
                .map(|(source, target, attributes)| EdgeRow {
                    source,
                    target,
                    attributes,
                })
                .collect();
            let mut state = serializer.serialize_struct("Tree", 3)?;
            state.serialize_field("directed", &Ty::is_directed())?;
            state.serialize_field("nodes", &nodes)?;
            state.serialize_field("edges", &edges)?;
            state.end()
        }
    }

    impl Serialize for RootedTree {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut state = serializer.serialize_struct("RootedTree", 2)?;
            state.serialize_field("root", &self.root)?;
            state.serialize_field("tree", &self.tree)?;
            state.end()
        }
    }
}
