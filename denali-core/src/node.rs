//! Node identifiers and `id value` rows.

/// Identifier of a vertex, tree node or member.
///
/// Ids are non-negative integers. Tree files mirror whatever ids existed
/// upstream, so they need not be contiguous.
pub type NodeId = usize;

/// One `id value` row: a node together with its scalar value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeValue {
    /// Node identifier.
    pub id: NodeId,
    /// Scalar value attached to the node.
    pub value: f64,
}

impl NodeValue {
    /// Pairs `id` with `value`.
    #[must_use]
    pub const fn new(id: NodeId, value: f64) -> Self {
        Self { id, value }
    }
}

impl From<(NodeId, f64)> for NodeValue {
    fn from((id, value): (NodeId, f64)) -> Self {
        Self { id, value }
    }
}
