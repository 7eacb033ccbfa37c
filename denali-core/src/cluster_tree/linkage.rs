//! Reader for single-linkage matrices saved as text.

use std::io::BufRead;

use tracing::{debug, instrument};

use super::ClusterMerge;
use crate::{
    Result,
    codec::tokens::{numbered, parse_id, parse_value, read_lines},
    error::ParseError,
};

/// Reads merge records from a linkage matrix.
///
/// Each non-blank row holds `left right height`, optionally followed by
/// further columns such as the merged cluster size, which are ignored. Ids
/// may be written as integral floats (`3.0`), as numeric tools save them.
/// Lines starting with `#` are comments.
///
/// # Errors
/// Returns [`ParseError`] for rows with fewer than three tokens or
/// non-numeric tokens, and [`crate::DenaliError::Io`] when reading fails.
///
/// # Examples
/// ```
/// let text = "0.0 1.0 0.5 2.0\n2.0 3.0 1.5 3.0\n";
/// let merges = denali_core::read_linkage(text.as_bytes())?;
/// assert_eq!(merges.len(), 2);
/// assert_eq!((merges[1].left, merges[1].right, merges[1].height), (2, 3, 1.5));
/// # Ok::<(), denali_core::DenaliError>(())
/// ```
#[instrument(name = "core.read_linkage", skip_all)]
pub fn read_linkage<R: BufRead>(reader: R) -> Result<Vec<ClusterMerge>> {
    let lines = read_lines(reader)?;
    let mut merges = Vec::with_capacity(lines.len());
    for line in numbered(&lines) {
        if line.is_blank() || line.text.trim_start().starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.tokens().collect();
        let [left, right, height, ..] = tokens.as_slice() else {
            return Err(ParseError::TooFewTokens {
                line: line.number,
                expected: 3,
                found: tokens.len(),
            }
            .into());
        };
        merges.push(ClusterMerge::new(
            parse_id(left, line.number)?,
            parse_id(right, line.number)?,
            parse_value(height, line.number)?,
        ));
    }
    debug!(merges = merges.len(), "read linkage");
    Ok(merges)
}
