//! Flat vertex, edge and scalar-map text formats.
//!
//! These are the primitive shapes exchanged with the external `ctree` binary
//! and the denali viewer:
//!
//! - *vertices*: one value per line, the line index is the vertex id;
//! - *edges*: `u\tv` per line;
//! - *weights* and *colors*: `id\tvalue` per line.
//!
//! Weights use a fixed six-decimal layout while colours use the natural
//! shortest round-trip form.

pub(crate) mod tokens;

use std::io::{BufRead, Write};

use tracing::instrument;

use crate::{
    NodeId, Result,
    error::{ArgumentError, ParseError},
};

use self::tokens::{numbered, parse_id, parse_value, read_lines};

/// Writes `values` one per line with no header and no trailing newline.
///
/// # Errors
/// Returns [`crate::DenaliError::Io`] when the writer fails.
///
/// # Examples
/// ```
/// let mut out = Vec::new();
/// denali_core::write_vertices(&mut out, &[1.5, 2.0])?;
/// assert_eq!(String::from_utf8(out)?, "1.5\n2.0");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_vertices(mut writer: impl Write, values: &[f64]) -> Result<()> {
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            writer.write_all(b"\n")?;
        }
        write!(writer, "{value:?}")?;
    }
    Ok(())
}

/// Writes one `u\tv` line per edge.
///
/// Duplicate edges and self-loops are written as given.
///
/// # Errors
/// Returns [`crate::DenaliError::Io`] when the writer fails.
pub fn write_edges(mut writer: impl Write, edges: &[(NodeId, NodeId)]) -> Result<()> {
    for (u, v) in edges {
        writeln!(writer, "{u}\t{v}")?;
    }
    Ok(())
}

/// Writes a sparse weight map as `id\tvalue` lines using `%d\t%f` layout.
///
/// # Errors
/// Returns [`ArgumentError::LengthMismatch`] when `ids` and `weights` differ
/// in length, or [`crate::DenaliError::Io`] when the writer fails.
///
/// # Examples
/// ```
/// let mut out = Vec::new();
/// denali_core::write_weights(&mut out, &[3], &[0.5])?;
/// assert_eq!(String::from_utf8(out)?, "3\t0.500000\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_weights(mut writer: impl Write, ids: &[NodeId], weights: &[f64]) -> Result<()> {
    check_lengths(ids, weights)?;
    for (id, weight) in ids.iter().zip(weights) {
        writeln!(writer, "{id}\t{weight:.6}")?;
    }
    Ok(())
}

/// Writes a colour map as `id\tvalue` lines with values in natural form.
///
/// # Errors
/// Returns [`ArgumentError::LengthMismatch`] when `ids` and `values` differ
/// in length, or [`crate::DenaliError::Io`] when the writer fails.
pub fn write_colors(mut writer: impl Write, ids: &[NodeId], values: &[f64]) -> Result<()> {
    check_lengths(ids, values)?;
    for (id, value) in ids.iter().zip(values) {
        writeln!(writer, "{id}\t{value:?}")?;
    }
    Ok(())
}

fn check_lengths(ids: &[NodeId], values: &[f64]) -> Result<()> {
    if ids.len() == values.len() {
        Ok(())
    } else {
        Err(ArgumentError::LengthMismatch {
            ids: ids.len(),
            values: values.len(),
        }
        .into())
    }
}

/// Reads a vertex file: one value per non-blank line.
///
/// # Errors
/// Returns [`ParseError`] for lines that do not hold exactly one number and
/// [`crate::DenaliError::Io`] when reading fails.
///
/// # Examples
/// ```
/// let values = denali_core::read_vertices("1.5\n2\n".as_bytes())?;
/// assert_eq!(values, vec![1.5, 2.0]);
/// # Ok::<(), denali_core::DenaliError>(())
/// ```
#[instrument(name = "core.read_vertices", skip_all)]
pub fn read_vertices<R: BufRead>(reader: R) -> Result<Vec<f64>> {
    let lines = read_lines(reader)?;
    let mut values = Vec::with_capacity(lines.len());
    for line in numbered(&lines).filter(|line| !line.is_blank()) {
        let columns = line.columns("vertices", 1)?;
        values.push(parse_value(columns[0], line.number)?);
    }
    Ok(values)
}

/// Reads an edge file: one `u v` pair per non-blank line.
///
/// # Errors
/// Returns [`ParseError`] for rows without exactly two integer ids and
/// [`crate::DenaliError::Io`] when reading fails.
#[instrument(name = "core.read_edges", skip_all)]
pub fn read_edges<R: BufRead>(reader: R) -> Result<Vec<(NodeId, NodeId)>> {
    let lines = read_lines(reader)?;
    let mut edges = Vec::with_capacity(lines.len());
    for line in numbered(&lines).filter(|line| !line.is_blank()) {
        let columns = line.columns("edges", 2)?;
        edges.push((
            parse_id(columns[0], line.number)?,
            parse_id(columns[1], line.number)?,
        ));
    }
    Ok(edges)
}

/// Reads a whitespace-delimited numeric table, one row per line.
///
/// Blank lines and lines starting with `#` are skipped. Every row must have
/// as many columns as the first.
///
/// # Errors
/// Returns [`ParseError`] for non-numeric tokens or ragged rows and
/// [`crate::DenaliError::Io`] when reading fails.
///
/// # Examples
/// ```
/// let rows = denali_core::read_points("# x y\n0 1\n2 3\n".as_bytes())?;
/// assert_eq!(rows, vec![vec![0.0, 1.0], vec![2.0, 3.0]]);
/// # Ok::<(), denali_core::DenaliError>(())
/// ```
#[instrument(name = "core.read_points", skip_all)]
pub fn read_points<R: BufRead>(reader: R) -> Result<Vec<Vec<f64>>> {
    let lines = read_lines(reader)?;
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for line in numbered(&lines) {
        if line.is_blank() || line.text.trim_start().starts_with('#') {
            continue;
        }
        let row = line
            .tokens()
            .map(|token| parse_value(token, line.number))
            .collect::<core::result::Result<Vec<_>, ParseError>>()?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(ParseError::ColumnCount {
                    section: "points",
                    line: line.number,
                    expected: first.len(),
                    found: row.len(),
                }
                .into());
            }
        }
        rows.push(row);
    }
    Ok(rows)
}
