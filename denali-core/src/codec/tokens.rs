//! Line and token helpers shared by every text decoder.

use std::io::{self, BufRead};

use crate::{NodeId, error::ParseError};

/// Largest float that still denotes an exact integer id.
const MAX_EXACT_ID: f64 = 9_007_199_254_740_992.0;

/// A single input line tagged with its 1-based position in the stream.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Line<'a> {
    pub(crate) number: usize,
    pub(crate) text: &'a str,
}

impl<'a> Line<'a> {
    pub(crate) fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub(crate) fn tokens(&self) -> impl Iterator<Item = &'a str> {
        self.text.split_whitespace()
    }

    /// Splits the line and checks it has exactly `expected` tokens.
    pub(crate) fn columns(
        &self,
        section: &'static str,
        expected: usize,
    ) -> Result<Vec<&'a str>, ParseError> {
        let tokens: Vec<&str> = self.tokens().collect();
        if tokens.len() == expected {
            Ok(tokens)
        } else {
            Err(ParseError::ColumnCount {
                section,
                line: self.number,
                expected,
                found: tokens.len(),
            })
        }
    }
}

/// Drains `reader` into owned lines with terminators stripped.
pub(crate) fn read_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    reader.lines().collect()
}

/// Numbers `lines` from 1.
pub(crate) fn numbered(lines: &[String]) -> impl Iterator<Item = Line<'_>> {
    lines.iter().enumerate().map(|(index, text)| Line {
        number: index + 1,
        text: text.as_str(),
    })
}

/// Parses a node id.
///
/// Ids written by numeric tooling sometimes carry a fractional part (`4.0`);
/// those are accepted as long as they denote an exact non-negative integer.
pub(crate) fn parse_id(token: &str, line: usize) -> Result<NodeId, ParseError> {
    if let Ok(id) = token.parse::<NodeId>() {
        return Ok(id);
    }
    let invalid = || ParseError::InvalidInteger {
        line,
        token: token.to_owned(),
    };
    let value = token.parse::<f64>().map_err(|_| invalid())?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= MAX_EXACT_ID {
        Ok(value as NodeId)
    } else {
        Err(invalid())
    }
}

/// Parses a scalar value.
pub(crate) fn parse_value(token: &str, line: usize) -> Result<f64, ParseError> {
    token.parse::<f64>().map_err(|_| ParseError::InvalidFloat {
        line,
        token: token.to_owned(),
    })
}
