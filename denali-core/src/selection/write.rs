use std::io::Write;

use tracing::instrument;

use super::Selection;
use crate::{NodeValue, Result};

/// Writes `selection` in the section layout [`super::read_selection`] reads.
///
/// Sections are emitted in the order `file`, `component`, `members`,
/// `reduction`, `subtree`, `subtree_reduction`; absent or empty optional
/// sections are left out. The whole record is rendered before anything
/// reaches `writer`, so a failure leaves the writer untouched.
///
/// # Errors
/// Returns [`crate::ArgumentError::MissingNodeValue`] when a subtree node has
/// no value and [`crate::DenaliError::Io`] when the writer fails.
///
/// # Examples
/// ```
/// use denali_core::{Component, NodeValue, Selection, read_selection, write_selection};
///
/// let mut selection = Selection::new(Component {
///     parent: NodeValue::new(1, 10.0),
///     child: NodeValue::new(2, 20.0),
/// });
/// selection.reduction = Some(0.5);
/// let mut out = Vec::new();
/// write_selection(&mut out, &selection)?;
/// assert_eq!(read_selection(out.as_slice())?, selection);
/// # Ok::<(), denali_core::DenaliError>(())
/// ```
#[instrument(name = "core.write_selection", skip_all, fields(members = selection.members.len()))]
pub fn write_selection(mut writer: impl Write, selection: &Selection) -> Result<()> {
    let mut out = Vec::new();
    if let Some(file) = &selection.file {
        writeln!(out, "# file\n{}", file.display())?;
    }
    writeln!(out, "# component")?;
    write_rows(&mut out, &[selection.component.parent, selection.component.child])?;
    if !selection.members.is_empty() {
        writeln!(out, "# members")?;
        write_rows(&mut out, &selection.members)?;
    }
    if let Some(reduction) = selection.reduction {
        writeln!(out, "# reduction\n{reduction:?}")?;
    }
    #[cfg(feature = "graph")]
    write_subtree(&mut out, selection)?;
    writer.write_all(&out)?;
    Ok(())
}

#[cfg(feature = "graph")]
fn write_subtree(out: &mut Vec<u8>, selection: &Selection) -> Result<()> {
    let Some(subtree) = &selection.subtree else {
        return Ok(());
    };
    writeln!(out, "# subtree")?;
    crate::tree::write_tree(&mut *out, subtree.tree())?;
    let reduced: Vec<_> = subtree
        .tree()
        .edges()
        .filter_map(|(parent, child, edge)| edge.reduction.map(|value| (parent, child, value)))
        .collect();
    if !reduced.is_empty() {
        writeln!(out, "# subtree_reduction")?;
        for (parent, child, value) in reduced {
            writeln!(out, "{parent}\t{child}\t{value:?}")?;
        }
    }
    Ok(())
}

fn write_rows(out: &mut Vec<u8>, rows: &[NodeValue]) -> std::io::Result<()> {
    for row in rows {
        writeln!(out, "{}\t{:?}", row.id, row.value)?;
    }
    Ok(())
}
