//! Reader and writer for the `.tree` text format.
//!
//! ```text
//! <n_vertices>
//! <id> <value>                              (n_vertices lines)
//! <u> <v> [<member_id> <member_value>]*     (one line per edge)
//! ```

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use petgraph::EdgeType;
use tracing::{debug, instrument};

use super::{Tree, TreeEdge, UndirectedTree};
use crate::{
    Result,
    codec::tokens::{Line, numbered, parse_id, parse_value, read_lines},
    error::{ArgumentError, ParseError},
};

/// Reads an undirected tree from `.tree` text.
///
/// Blank lines are ignored. Extra tokens on a vertex line are ignored. Every
/// edge endpoint must have been declared by a vertex line.
///
/// # Errors
/// Returns [`ParseError`] when the vertex count is not an integer, a vertex
/// or edge line has too few tokens, a member id lacks its value, a token is
/// not numeric, fewer vertices are listed than declared, or an edge names an
/// undeclared vertex. Returns [`crate::DenaliError::Io`] when reading fails.
///
/// # Examples
/// ```
/// let text = "2\n0 1.5\n1 3.0\n0 1 7 2.5\n";
/// let tree = denali_core::read_tree(text.as_bytes())?;
/// assert_eq!(tree.value(1), Some(3.0));
/// assert_eq!(tree.edge(0, 1).map(|edge| edge.members[&7]), Some(2.5));
/// # Ok::<(), denali_core::DenaliError>(())
/// ```
#[instrument(name = "core.read_tree", skip_all)]
pub fn read_tree<R: BufRead>(reader: R) -> Result<UndirectedTree> {
    let lines = read_lines(reader)?;
    let tree = parse_tree(numbered(&lines))?;
    debug!(
        nodes = tree.node_count(),
        edges = tree.edge_count(),
        "read tree"
    );
    Ok(tree)
}

pub(crate) fn parse_tree<'a>(
    lines: impl Iterator<Item = Line<'a>>,
) -> core::result::Result<UndirectedTree, ParseError> {
    let mut lines = lines.filter(|line| !line.is_blank());
    let header = lines.next().ok_or(ParseError::MissingVertexCount)?;
    let declared = header
        .text
        .trim()
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidVertexCount {
            line: header.number,
            text: header.text.trim().to_owned(),
        })?;

    let mut tree = UndirectedTree::new();
    for found in 0..declared {
        let line = lines
            .next()
            .ok_or(ParseError::TruncatedVertices { declared, found })?;
        parse_vertex(&line, &mut tree)?;
    }
    for line in lines {
        parse_edge(&line, &mut tree)?;
    }
    Ok(tree)
}

fn parse_vertex(line: &Line<'_>, tree: &mut UndirectedTree) -> core::result::Result<(), ParseError> {
    let tokens: Vec<&str> = line.tokens().collect();
    let [id, value, ..] = tokens.as_slice() else {
        return Err(ParseError::TooFewTokens {
            line: line.number,
            expected: 2,
            found: tokens.len(),
        });
    };
    tree.add_node(parse_id(id, line.number)?, parse_value(value, line.number)?);
    Ok(())
}

fn parse_edge(line: &Line<'_>, tree: &mut UndirectedTree) -> core::result::Result<(), ParseError> {
    let tokens: Vec<&str> = line.tokens().collect();
    let [u, v, tail @ ..] = tokens.as_slice() else {
        return Err(ParseError::TooFewTokens {
            line: line.number,
            expected: 2,
            found: tokens.len(),
        });
    };
    if tail.len() % 2 != 0 {
        return Err(ParseError::UnpairedMember { line: line.number });
    }

    let u = parse_id(u, line.number)?;
    let v = parse_id(v, line.number)?;
    for node in [u, v] {
        if !tree.contains_node(node) {
            return Err(ParseError::UndeclaredVertex {
                line: line.number,
                node,
            });
        }
    }

    let mut members = BTreeMap::new();
    for pair in tail.chunks_exact(2) {
        members.insert(
            parse_id(pair[0], line.number)?,
            parse_value(pair[1], line.number)?,
        );
    }
    tree.add_edge(u, v, TreeEdge::with_members(members));
    Ok(())
}

/// Writes `tree` in `.tree` format.
///
/// Nodes are written in insertion order, members in ascending id order.
/// Values use the shortest representation that parses back to the same
/// float, so [`read_tree`] reproduces the tree exactly. Edge reductions are
/// not part of the format and are not written.
///
/// # Errors
/// Returns [`ArgumentError::MissingNodeValue`] before writing anything if a
/// node has no value, and [`crate::DenaliError::Io`] when the writer fails.
///
/// # Examples
/// ```
/// use denali_core::{TreeEdge, UndirectedTree, write_tree};
///
/// let mut tree = UndirectedTree::new();
/// tree.add_node(4, 16.0);
/// tree.add_node(5, 32.0);
/// tree.add_edge(4, 5, TreeEdge::with_members([(0, 25.0)].into()));
/// let mut out = Vec::new();
/// write_tree(&mut out, &tree)?;
/// assert_eq!(String::from_utf8(out)?, "2\n4\t16.0\n5\t32.0\n4\t5\t0\t25.0\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(name = "core.write_tree", skip_all, fields(nodes = tree.node_count(), edges = tree.edge_count()))]
pub fn write_tree<Ty: EdgeType>(mut writer: impl Write, tree: &Tree<Ty>) -> Result<()> {
    if let Some(node) = tree.nodes().find(|&node| tree.value(node).is_none()) {
        return Err(ArgumentError::MissingNodeValue { node }.into());
    }

    writeln!(writer, "{}", tree.node_count())?;
    for row in tree.node_values() {
        writeln!(writer, "{}\t{:?}", row.id, row.value)?;
    }
    for (u, v, edge) in tree.edges() {
        write!(writer, "{u}\t{v}")?;
        for (id, value) in &edge.members {
            write!(writer, "\t{id}\t{value:?}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
