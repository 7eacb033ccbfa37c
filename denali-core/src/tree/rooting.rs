//! Orienting an undirected tree away from a chosen root.

use std::collections::HashSet;

use petgraph::Directed;

use super::{RootedTree, Tree, UndirectedTree};
use crate::{NodeId, error::ParseError};

impl UndirectedTree {
    /// Orients the tree by a depth-first traversal from `root`.
    ///
    /// Every traversed edge points from the endpoint nearer the root to the
    /// other one and keeps its attributes. Nodes unreachable from `root` are
    /// not part of the result.
    ///
    /// # Errors
    /// Returns [`ParseError::RootNotInSubtree`] when `root` is not a node.
    ///
    /// # Examples
    /// ```
    /// let tree = denali_core::read_tree("3\n0 0\n1 1\n2 2\n1 0\n2 1\n".as_bytes())?;
    /// let rooted = tree.root_at(0)?;
    /// assert_eq!(rooted.parent(2), Some(1));
    /// assert_eq!(rooted.children(0).collect::<Vec<_>>(), vec![1]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn root_at(&self, root: NodeId) -> Result<RootedTree, ParseError> {
        if !self.contains_node(root) {
            return Err(ParseError::RootNotInSubtree { root });
        }

        let mut directed = Tree::<Directed>::new();
        self.copy_node(root, &mut directed);
        let mut visited = HashSet::from([root]);
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            for next in self.neighbors(node) {
                if !visited.insert(next) {
                    continue;
                }
                self.copy_node(next, &mut directed);
                let edge = self.edge(node, next).cloned().unwrap_or_default();
                directed.add_edge(node, next, edge);
                stack.push(next);
            }
        }
        Ok(RootedTree::from_parts(root, directed))
    }

    fn copy_node(&self, id: NodeId, into: &mut Tree<Directed>) {
        match self.value(id) {
            Some(value) => into.add_node(id, value),
            None => into.add_unvalued_node(id),
        }
    }
}
