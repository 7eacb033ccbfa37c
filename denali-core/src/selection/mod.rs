//! Selection files handed to denali callbacks.
//!
//! A selection file is a sequence of `# name` headers, each followed by the
//! body of that section:
//!
//! ```text
//! # file
//! /path/to/tree.tree
//! # component
//! 4  16.0
//! 5  32.0
//! # members
//! 0  25.0
//! # subtree
//! <tree-format blob>
//! # subtree_reduction
//! 4 5 0.73
//! ```
//!
//! Unknown sections are skipped so newer denali builds can add sections
//! without breaking older readers.

mod sections;
mod write;

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::{
    NodeId, NodeValue, Result,
    codec::tokens::{numbered, parse_id, parse_value, read_lines},
    error::ParseError,
};
#[cfg(feature = "graph")]
use crate::tree::{RootedTree, UndirectedTree, parse_tree};
#[cfg(not(feature = "graph"))]
use crate::capability::{CAPABILITIES, Capability};

use self::sections::{Section, Sections, split_sections};

pub use self::write::write_selection;

/// The selected tree edge.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Component {
    /// Endpoint nearer the root; the subtree is rooted here.
    pub parent: NodeValue,
    /// Endpoint farther from the root.
    pub child: NodeValue,
}

impl Component {
    /// Returns the component as a `(parent, child)` id pair.
    #[must_use]
    pub fn edge(&self) -> (NodeId, NodeId) {
        (self.parent.id, self.child.id)
    }
}

/// Parsed selection record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Selection {
    /// Tree file the visualisation was generated from.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub file: Option<PathBuf>,
    /// The selected edge.
    pub component: Component,
    /// Members collapsed onto the selection; empty when the file lists none.
    pub members: Vec<NodeValue>,
    /// Subtree below the component, rooted at the component's parent, with
    /// per-edge reductions applied.
    #[cfg(feature = "graph")]
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub subtree: Option<RootedTree>,
    /// Scalar reduction computed over the whole selection.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub reduction: Option<f64>,
}

impl Selection {
    /// Creates a selection holding only `component`.
    #[must_use]
    pub fn new(component: Component) -> Self {
        Self {
            file: None,
            component,
            members: Vec::new(),
            #[cfg(feature = "graph")]
            subtree: None,
            reduction: None,
        }
    }
}

/// Reads a selection file.
///
/// # Errors
/// Returns [`ParseError`] when the `component` section is missing or does
/// not list exactly two nodes, a row has the wrong number of columns, a value
/// is not numeric, text precedes the first header, the subtree lacks the
/// component's parent, or a subtree reduction names an edge the rooted
/// subtree does not have. Without the `graph` capability a `subtree` section
/// fails with [`crate::DenaliError::MissingDependency`].
///
/// # Examples
/// ```
/// let text = "# file\n/tmp/t.tree\n# component\n1 10.0\n2 20.0\n";
/// let selection = denali_core::read_selection(text.as_bytes())?;
/// assert_eq!(selection.component.edge(), (1, 2));
/// assert!(selection.members.is_empty());
/// # Ok::<(), denali_core::DenaliError>(())
/// ```
#[instrument(name = "core.read_selection", skip_all)]
pub fn read_selection<R: BufRead>(reader: R) -> Result<Selection> {
    let lines = read_lines(reader)?;
    let mut sections = split_sections(numbered(&lines))?;

    let component = parse_last(&mut sections, "component", parse_component)?.ok_or(
        ParseError::MissingSection {
            section: "component",
        },
    )?;
    let file = parse_last(&mut sections, "file", parse_file)?;
    let members = parse_last(&mut sections, "members", |s| parse_rows(s, "members"))?
        .unwrap_or_default();
    let reduction = parse_last(&mut sections, "reduction", parse_reduction)?;
    let reductions =
        parse_last(&mut sections, "subtree_reduction", parse_reductions)?.unwrap_or_default();

    #[cfg(feature = "graph")]
    let subtree = parse_last(&mut sections, "subtree", |s| {
        parse_tree(s.body.iter().copied())
    })?
    .map(|tree| root_subtree(&tree, component.parent.id, reductions))
    .transpose()?;
    #[cfg(not(feature = "graph"))]
    {
        if sections.contains_key("subtree") {
            CAPABILITIES.require(Capability::Graph)?;
        }
        drop(reductions);
    }

    debug!(
        members = members.len(),
        ignored_sections = sections.len(),
        "read selection"
    );
    Ok(Selection {
        file,
        component,
        members,
        #[cfg(feature = "graph")]
        subtree,
        reduction,
    })
}

/// Parses every occurrence of `name` in file order and keeps the last.
///
/// An earlier occurrence that fails to parse fails the whole read.
fn parse_last<'a, T>(
    sections: &mut Sections<'a>,
    name: &str,
    parse: impl Fn(&Section<'a>) -> core::result::Result<T, ParseError>,
) -> core::result::Result<Option<T>, ParseError> {
    let mut last = None;
    for section in sections.remove(name).unwrap_or_default() {
        last = Some(parse(&section)?);
    }
    Ok(last)
}

/// First body line of a single-value section, trimmed.
///
/// Only a section without body lines is empty; a blank first line is
/// returned as the empty string.
fn first_line<'a>(
    section: &Section<'a>,
    name: &'static str,
) -> core::result::Result<(usize, &'a str), ParseError> {
    section
        .body
        .first()
        .map(|line| (line.number, line.text.trim()))
        .ok_or(ParseError::EmptySection { section: name })
}

fn parse_file(section: &Section<'_>) -> core::result::Result<PathBuf, ParseError> {
    first_line(section, "file").map(|(_, text)| PathBuf::from(text))
}

fn parse_reduction(section: &Section<'_>) -> core::result::Result<f64, ParseError> {
    let (line, text) = first_line(section, "reduction")?;
    parse_value(text, line)
}

fn parse_rows(
    section: &Section<'_>,
    name: &'static str,
) -> core::result::Result<Vec<NodeValue>, ParseError> {
    section
        .rows()
        .map(|line| {
            let columns = line.columns(name, 2)?;
            Ok(NodeValue::new(
                parse_id(columns[0], line.number)?,
                parse_value(columns[1], line.number)?,
            ))
        })
        .collect()
}

fn parse_component(section: &Section<'_>) -> core::result::Result<Component, ParseError> {
    match parse_rows(section, "component")?.as_slice() {
        &[parent, child] => Ok(Component { parent, child }),
        rows => Err(ParseError::ComponentShape { rows: rows.len() }),
    }
}

fn parse_reductions(
    section: &Section<'_>,
) -> core::result::Result<BTreeMap<(NodeId, NodeId), f64>, ParseError> {
    section
        .rows()
        .map(|line| {
            let columns = line.columns("subtree_reduction", 3)?;
            Ok((
                (
                    parse_id(columns[0], line.number)?,
                    parse_id(columns[1], line.number)?,
                ),
                parse_value(columns[2], line.number)?,
            ))
        })
        .collect()
}

#[cfg(feature = "graph")]
fn root_subtree(
    tree: &UndirectedTree,
    root: NodeId,
    reductions: BTreeMap<(NodeId, NodeId), f64>,
) -> core::result::Result<RootedTree, ParseError> {
    let mut subtree = tree.root_at(root)?;
    for ((parent, child), value) in reductions {
        let edge = subtree
            .tree_mut()
            .edge_mut(parent, child)
            .ok_or(ParseError::UnknownReductionEdge { parent, child })?;
        edge.reduction = Some(value);
    }
    Ok(subtree)
}

#[cfg(test)]
mod tests;
