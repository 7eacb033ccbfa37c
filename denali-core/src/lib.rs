//! Denali core library.
//!
//! Text codecs for the files exchanged with the denali contour-tree viewer,
//! the selection-file parser used by denali callbacks, a k-nearest-neighbour
//! complex builder feeding the external `ctree` tool, and a cluster-tree
//! builder for single-linkage clusterings.
//!
//! Every operation is a pure function over explicit readers, writers and
//! values. Nothing is printed; diagnostics are emitted as `tracing` events.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod capability;
mod cluster_tree;
mod codec;
mod complex;
mod error;
mod node;
mod selection;
#[cfg(feature = "graph")]
mod tree;

#[cfg(feature = "graph")]
pub use crate::{
    cluster_tree::build_cluster_tree,
    tree::{RootedTree, Tree, TreeEdge, UndirectedTree, read_tree, write_tree},
};
pub use crate::{
    capability::{CAPABILITIES, Capabilities, Capability},
    cluster_tree::{ClusterMerge, DEFAULT_GAMMA, exp_height_factory, read_linkage},
    codec::{
        read_edges, read_points, read_vertices, write_colors, write_edges, write_vertices,
        write_weights,
    },
    complex::{
        AUTO_BRUTE_FORCE_LIMIT, ComplexBuilder, NeighborStrategy, PointCloud, kneighbors_complex,
    },
    error::{
        ArgumentError, ArgumentErrorCode, DenaliError, DenaliErrorCode, ParseError,
        ParseErrorCode, Result,
    },
    node::{NodeId, NodeValue},
    selection::{Component, Selection, read_selection, write_selection},
};
