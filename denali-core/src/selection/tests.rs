//! Unit tests for selection parsing and writing.

use std::path::PathBuf;

use rstest::rstest;

use super::*;
use crate::{DenaliError, ParseErrorCode};

const CONCRETE: &str = "\
# file
/tmp/t.tree
# component
1 10.0
2 20.0
# members
0 5.0
1 10.0
";

const WITH_SUBTREE: &str = "\
# file
/home/user/tree.tree
# component
4  16.0
5  32.0
# members
0  25.0
4  16.0
5  32.0
# subtree
3
4 16.0
5 32.0
7 39.0
4 5 0 25.0
5 7
# subtree_reduction
4 5 0.73
5 7 0.25
";

#[test]
fn concrete_selection_parses_without_subtree() {
    let selection = read_selection(CONCRETE.as_bytes()).expect("selection is valid");
    assert_eq!(selection.file, Some(PathBuf::from("/tmp/t.tree")));
    assert_eq!(
        selection.component,
        Component {
            parent: NodeValue::new(1, 10.0),
            child: NodeValue::new(2, 20.0),
        }
    );
    assert_eq!(
        selection.members,
        vec![NodeValue::new(0, 5.0), NodeValue::new(1, 10.0)]
    );
    #[cfg(feature = "graph")]
    assert!(selection.subtree.is_none());
    assert_eq!(selection.reduction, None);
}

#[test]
fn malformed_component_is_rejected() {
    let err = read_selection("# component\n1 notanumber\n2 20.0".as_bytes())
        .expect_err("component value is not numeric");
    assert!(matches!(
        err,
        DenaliError::Parse(ParseError::InvalidFloat { line: 2, ref token }) if token == "notanumber"
    ));
}

#[cfg(feature = "graph")]
#[test]
fn subtree_is_rooted_at_component_parent_with_reductions() {
    let selection = read_selection(WITH_SUBTREE.as_bytes()).expect("selection is valid");
    let subtree = selection.subtree.expect("subtree section is present");
    assert_eq!(subtree.root(), 4);
    assert_eq!(subtree.parent(7), Some(5));
    let edge = subtree.tree().edge(4, 5).expect("edge oriented from root");
    assert_eq!(edge.reduction, Some(0.73));
    assert_eq!(edge.members.get(&0), Some(&25.0));
    assert_eq!(
        subtree.tree().edge(5, 7).and_then(|edge| edge.reduction),
        Some(0.25)
    );
}

#[cfg(feature = "graph")]
#[test]
fn reduction_against_reversed_edge_is_rejected() {
    let text = WITH_SUBTREE.replace("5 7 0.25", "7 5 0.25");
    let err = read_selection(text.as_bytes()).expect_err("7 -> 5 points at the root");
    assert!(matches!(
        err,
        DenaliError::Parse(ParseError::UnknownReductionEdge {
            parent: 7,
            child: 5
        })
    ));
}

#[cfg(feature = "graph")]
#[test]
fn subtree_without_component_parent_is_rejected() {
    let text = WITH_SUBTREE
        .replace("4  16.0\n5  32.0\n# members", "9  16.0\n5  32.0\n# members");
    let err = read_selection(text.as_bytes()).expect_err("9 is not in the subtree");
    assert_eq!(err.parse_code(), Some(ParseErrorCode::RootNotInSubtree));
}

#[cfg(feature = "graph")]
#[test]
fn subtree_errors_carry_selection_line_numbers() {
    let text = WITH_SUBTREE.replace("5 7\n", "5 x\n");
    let err = read_selection(text.as_bytes()).expect_err("edge endpoint is not an id");
    assert!(matches!(
        err,
        DenaliError::Parse(ParseError::InvalidInteger { line: 16, .. })
    ));
}

#[test]
fn reduction_without_subtree_is_discarded() {
    let text = format!("{CONCRETE}# subtree_reduction\n1 2 0.5\n");
    let selection = read_selection(text.as_bytes()).expect("selection is valid");
    assert_eq!(selection, read_selection(CONCRETE.as_bytes()).expect("valid"));
}

#[test]
fn unknown_sections_are_ignored() {
    let text = format!("# colour_map\nwhatever 1 2 3\n{CONCRETE}# future\n\n");
    let selection = read_selection(text.as_bytes()).expect("unknown sections are skipped");
    assert_eq!(selection, read_selection(CONCRETE.as_bytes()).expect("valid"));
}

#[test]
fn section_order_does_not_matter() {
    let reordered = "\
# members
0 5.0
1 10.0
# component
1 10.0
2 20.0
# file
/tmp/t.tree
";
    assert_eq!(
        read_selection(reordered.as_bytes()).expect("valid"),
        read_selection(CONCRETE.as_bytes()).expect("valid"),
    );
}

#[test]
fn file_is_first_body_line_even_with_trailing_blanks() {
    let text = "# file\n  /tmp/a b.tree  \n\n\n# component\n1 1\n2 2\n";
    let selection = read_selection(text.as_bytes()).expect("valid");
    assert_eq!(selection.file, Some(PathBuf::from("/tmp/a b.tree")));
}

#[test]
fn blank_first_file_line_is_an_empty_path() {
    let text = "# file\n\n/tmp/a\n# component\n1 1\n2 2\n";
    let selection = read_selection(text.as_bytes()).expect("valid");
    assert_eq!(selection.file, Some(PathBuf::new()));
}

#[test]
fn blank_first_reduction_line_is_not_a_number() {
    let text = format!("{CONCRETE}# reduction\n\n0.5\n");
    let err = read_selection(text.as_bytes()).expect_err("first line is blank");
    assert!(matches!(
        err,
        DenaliError::Parse(ParseError::InvalidFloat { line: 10, .. })
    ));
}

#[test]
fn reduction_section_reads_first_line() {
    let text = format!("{CONCRETE}# reduction\n0.125\nignored\n");
    let selection = read_selection(text.as_bytes()).expect("valid");
    assert_eq!(selection.reduction, Some(0.125));
}

#[rstest]
#[case::missing_component("# file\n/a\n", ParseErrorCode::MissingSection)]
#[case::one_row("# component\n1 1.0\n", ParseErrorCode::ComponentShape)]
#[case::three_rows("# component\n1 1\n2 2\n3 3\n", ParseErrorCode::ComponentShape)]
#[case::empty_component("# component\n# file\n/a\n", ParseErrorCode::ComponentShape)]
#[case::wide_row("# component\n1 1 1\n2 2\n", ParseErrorCode::ColumnCount)]
#[case::empty_file("# file\n# component\n1 1\n2 2\n", ParseErrorCode::EmptySection)]
#[case::orphan("stray\n# component\n1 1\n2 2\n", ParseErrorCode::OrphanBody)]
#[case::short_reduction("# component\n1 1\n2 2\n# subtree_reduction\n1 2\n", ParseErrorCode::ColumnCount)]
#[case::bad_reduction("# component\n1 1\n2 2\n# reduction\nlots\n", ParseErrorCode::InvalidFloat)]
fn malformed_selections_fail(#[case] text: &str, #[case] expected: ParseErrorCode) {
    let err = read_selection(text.as_bytes()).expect_err("selection is malformed");
    assert_eq!(err.parse_code(), Some(expected));
}

#[test]
fn later_repeat_of_a_section_wins() {
    let text = format!("{CONCRETE}# file\n/tmp/other.tree\n");
    let selection = read_selection(text.as_bytes()).expect("valid");
    assert_eq!(selection.file, Some(PathBuf::from("/tmp/other.tree")));
}

#[test]
fn earlier_malformed_repeat_is_rejected() {
    let text = "# component\n1 notanumber\n2 20.0\n# component\n1 10.0\n2 20.0\n";
    let err = read_selection(text.as_bytes()).expect_err("first component is malformed");
    assert!(matches!(
        err,
        DenaliError::Parse(ParseError::InvalidFloat { line: 2, ref token }) if token == "notanumber"
    ));
}

#[rstest]
#[case::empty_file("# file\n# file\n/a\n# component\n1 1\n2 2\n", ParseErrorCode::EmptySection)]
#[case::short_component(
    "# component\n1 1\n# component\n1 1\n2 2\n",
    ParseErrorCode::ComponentShape
)]
#[case::bad_reduction(
    "# component\n1 1\n2 2\n# reduction\nlots\n# reduction\n0.5\n",
    ParseErrorCode::InvalidFloat
)]
#[case::bad_members(
    "# members\n1\n# component\n1 1\n2 2\n# members\n1 1\n",
    ParseErrorCode::ColumnCount
)]
fn every_repeat_is_validated(#[case] text: &str, #[case] expected: ParseErrorCode) {
    let err = read_selection(text.as_bytes()).expect_err("an earlier repeat is malformed");
    assert_eq!(err.parse_code(), Some(expected));
}

#[cfg(feature = "graph")]
#[test]
fn earlier_malformed_subtree_repeat_is_rejected() {
    let text = format!("# subtree\n2\n4 1.0\n5 x\n{WITH_SUBTREE}");
    let err = read_selection(text.as_bytes()).expect_err("first subtree is malformed");
    assert_eq!(err.parse_code(), Some(ParseErrorCode::InvalidFloat));
}

#[cfg(not(feature = "graph"))]
#[test]
fn subtree_without_graph_capability_is_rejected() {
    use crate::Capability;

    let text = format!("{CONCRETE}# subtree\n2\n1 10.0\n2 20.0\n1 2\n");
    let err = read_selection(text.as_bytes()).expect_err("graph capability is absent");
    assert!(matches!(
        err,
        DenaliError::MissingDependency {
            capability: Capability::Graph
        }
    ));
}

#[cfg(not(feature = "graph"))]
#[test]
fn reductions_without_graph_capability_are_discarded() {
    let text = format!("{CONCRETE}# subtree_reduction\n1 2 0.5\n");
    let selection = read_selection(text.as_bytes()).expect("no subtree section");
    assert_eq!(selection.component.edge(), (1, 2));
}

#[test]
fn written_selection_reads_back() {
    let selection = read_selection(CONCRETE.as_bytes()).expect("valid");
    let mut out = Vec::new();
    write_selection(&mut out, &selection).expect("write succeeds");
    assert_eq!(read_selection(out.as_slice()).expect("valid"), selection);
}

#[cfg(feature = "graph")]
#[test]
fn written_subtree_and_reductions_read_back() {
    let selection = read_selection(WITH_SUBTREE.as_bytes()).expect("valid");
    let mut out = Vec::new();
    write_selection(&mut out, &selection).expect("write succeeds");
    let text = String::from_utf8(out).expect("utf-8");
    assert!(text.contains("# subtree_reduction\n"));
    assert_eq!(read_selection(text.as_bytes()).expect("valid"), selection);
}
