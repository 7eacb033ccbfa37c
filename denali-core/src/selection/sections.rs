//! Splitting selection text into named sections.

use std::collections::HashMap;

use crate::{codec::tokens::Line, error::ParseError};

/// One `# name` header and the lines up to the next header.
#[derive(Clone, Debug)]
pub(super) struct Section<'a> {
    pub(super) name: &'a str,
    pub(super) body: Vec<Line<'a>>,
}

impl<'a> Section<'a> {
    /// Body lines that carry content.
    pub(super) fn rows(&self) -> impl Iterator<Item = &Line<'a>> {
        self.body.iter().filter(|line| !line.is_blank())
    }
}

/// Returns the section name if `line` is a header.
fn header_name<'a>(line: &Line<'a>) -> Option<&'a str> {
    line.text
        .starts_with('#')
        .then(|| line.text.trim_start_matches(|c| c == '#' || c == ' ').trim())
}

/// Occurrences of each section name, in file order.
pub(super) type Sections<'a> = HashMap<&'a str, Vec<Section<'a>>>;

/// Groups `lines` into sections, keyed by name.
///
/// A repeated name keeps every occurrence so callers can validate each one.
pub(super) fn split_sections<'a>(
    lines: impl Iterator<Item = Line<'a>>,
) -> Result<Sections<'a>, ParseError> {
    let mut sections = Sections::new();
    let mut current: Option<Section<'a>> = None;
    for line in lines {
        if let Some(name) = header_name(&line) {
            if let Some(done) = current.replace(Section {
                name,
                body: Vec::new(),
            }) {
                sections.entry(done.name).or_default().push(done);
            }
            continue;
        }
        match current.as_mut() {
            Some(section) => section.body.push(line),
            None if line.is_blank() => {}
            None => return Err(ParseError::OrphanBody { line: line.number }),
        }
    }
    if let Some(done) = current {
        sections.entry(done.name).or_default().push(done);
    }
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tokens::numbered;

    fn split(text: &str) -> Result<Vec<(String, Vec<String>)>, ParseError> {
        let lines: Vec<String> = text.lines().map(str::to_owned).collect();
        let sections = split_sections(numbered(&lines))?;
        let mut out: Vec<_> = sections
            .into_values()
            .flatten()
            .map(|section| {
                (
                    section.name.to_owned(),
                    section.body.iter().map(|line| line.text.to_owned()).collect(),
                )
            })
            .collect();
        out.sort();
        Ok(out)
    }

    #[test]
    fn header_names_drop_hashes_and_padding() {
        let sections = split("## file  \n/a\n#members\n1 2\n").expect("valid layout");
        assert_eq!(
            sections,
            vec![
                ("file".to_owned(), vec!["/a".to_owned()]),
                ("members".to_owned(), vec!["1 2".to_owned()]),
            ]
        );
    }

    #[test]
    fn consecutive_headers_leave_first_body_empty() {
        let sections = split("# members\n# file\n/a\n").expect("valid layout");
        assert_eq!(sections[1], ("members".to_owned(), Vec::new()));
    }

    #[test]
    fn repeated_section_keeps_every_body_in_order() {
        let lines: Vec<String> = ["# file", "/a", "# members", "# file", "/b"]
            .map(str::to_owned)
            .into();
        let sections = split_sections(numbered(&lines)).expect("valid layout");
        let bodies: Vec<_> = sections["file"]
            .iter()
            .map(|section| section.body[0].text)
            .collect();
        assert_eq!(bodies, vec!["/a", "/b"]);
        assert_eq!(sections["members"].len(), 1);
    }

    #[test]
    fn leading_blank_lines_are_ignored() {
        assert!(split("\n  \n# file\n/a\n").is_ok());
    }

    #[test]
    fn text_before_first_header_is_rejected() {
        let err = split("\nstray\n# file\n/a\n").expect_err("orphan body");
        assert_eq!(err, ParseError::OrphanBody { line: 2 });
    }
}
