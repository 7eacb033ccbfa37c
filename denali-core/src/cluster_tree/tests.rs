//! Unit tests for cluster-tree construction and height functions.

use rstest::rstest;

use super::*;
use crate::ArgumentErrorCode;
#[cfg(feature = "graph")]
use crate::{DenaliError, write_tree};

#[cfg(feature = "graph")]
fn sorted(mut ids: Vec<NodeId>) -> Vec<NodeId> {
    ids.sort_unstable();
    ids
}

#[cfg(feature = "graph")]
#[test]
fn three_leaves_produce_five_node_tree() {
    let (h0, h1) = (0.25, 4.0);
    let merges = [ClusterMerge::new(0, 1, h0), ClusterMerge::new(2, 3, h1)];
    let tree = build_cluster_tree(&merges, |merge| merge.height).expect("merges are valid");

    assert_eq!(tree.tree().node_count(), 5);
    assert_eq!(tree.root(), 4);
    assert_eq!(sorted(tree.children(3).collect()), vec![0, 1]);
    assert_eq!(sorted(tree.children(4).collect()), vec![2, 3]);
    assert_eq!(tree.tree().value(0), Some(h0));
    assert_eq!(tree.tree().value(1), Some(h0));
    assert_eq!(tree.tree().value(2), Some(h1));
    assert_eq!(tree.tree().value(3), Some(h1));
    assert_eq!(tree.tree().value(4), Some(0.0));
    assert_eq!(tree.parent(4), None);
}

#[cfg(feature = "graph")]
#[test]
fn no_merges_yield_single_leaf() {
    let tree = build_cluster_tree(&[], |_| unreachable!("no merge to evaluate"))
        .expect("empty clustering is valid");
    assert_eq!(tree.root(), 0);
    assert_eq!(tree.tree().node_count(), 1);
    assert_eq!(tree.tree().value(0), Some(0.0));
}

#[cfg(feature = "graph")]
#[test]
fn height_function_sees_every_merge_in_order() {
    let merges = [
        ClusterMerge::new(2, 3, 1.0),
        ClusterMerge::new(0, 4, 2.0),
        ClusterMerge::new(1, 5, 3.0),
    ];
    let mut seen = Vec::new();
    let tree = build_cluster_tree(&merges, |merge| {
        seen.push(merge.height);
        merge.height * 10.0
    })
    .expect("merges are valid");
    assert_eq!(seen, vec![1.0, 2.0, 3.0]);
    assert_eq!(tree.tree().value(4), Some(20.0));
    assert_eq!(tree.tree().value(5), Some(30.0));
    assert_eq!(tree.root(), 6);
}

#[cfg(feature = "graph")]
#[test]
fn cluster_tree_writes_as_tree_file() {
    let merges = [ClusterMerge::new(0, 1, 0.5)];
    let tree = build_cluster_tree(&merges, |merge| merge.height).expect("merges are valid");
    let mut out = Vec::new();
    write_tree(&mut out, tree.tree()).expect("every node has a value");
    assert_eq!(
        String::from_utf8(out).expect("utf-8"),
        "3\n0\t0.5\n1\t0.5\n2\t0.0\n2\t0\n2\t1\n"
    );
}

#[cfg(feature = "graph")]
#[rstest]
#[case::self_merge(&[ClusterMerge::new(1, 1, 0.0)], ArgumentErrorCode::SelfMerge)]
#[case::future_cluster(&[ClusterMerge::new(0, 2, 0.0)], ArgumentErrorCode::UnknownCluster)]
#[case::merged_twice(
    &[ClusterMerge::new(0, 1, 0.0), ClusterMerge::new(0, 3, 1.0)],
    ArgumentErrorCode::ClusterMergedTwice
)]
fn invalid_merges_are_rejected(#[case] merges: &[ClusterMerge], #[case] expected: ArgumentErrorCode) {
    let err = build_cluster_tree(merges, |merge| merge.height).expect_err("merges are invalid");
    assert!(matches!(err, DenaliError::InvalidArgument(_)));
    assert_eq!(err.argument_code(), Some(expected));
}

#[test]
fn exp_height_maps_beta_to_one_and_alpha_to_gamma() {
    let height = exp_height_factory(2.0, 8.0, 0.25).expect("range is valid");
    assert!((height(&ClusterMerge::new(0, 1, 8.0)) - 1.0).abs() < 1e-12);
    assert!((height(&ClusterMerge::new(0, 1, 2.0)) - 0.25).abs() < 1e-12);
    let mid = height(&ClusterMerge::new(0, 1, 5.0));
    assert!(mid > 0.25 && mid < 1.0);
}

#[rstest]
#[case::equal_range(3.0, 3.0, DEFAULT_GAMMA, ArgumentErrorCode::DegenerateHeightRange)]
#[case::infinite_alpha(f64::INFINITY, 0.0, DEFAULT_GAMMA, ArgumentErrorCode::DegenerateHeightRange)]
#[case::zero_gamma(1.0, 0.0, 0.0, ArgumentErrorCode::InvalidGamma)]
#[case::negative_gamma(1.0, 0.0, -0.5, ArgumentErrorCode::InvalidGamma)]
#[case::nan_gamma(1.0, 0.0, f64::NAN, ArgumentErrorCode::InvalidGamma)]
fn degenerate_height_parameters_are_rejected(
    #[case] alpha: f64,
    #[case] beta: f64,
    #[case] gamma: f64,
    #[case] expected: ArgumentErrorCode,
) {
    let err = exp_height_factory(alpha, beta, gamma)
        .map(|_| ())
        .expect_err("parameters are degenerate");
    assert_eq!(err.code(), expected);
}

#[test]
fn read_linkage_accepts_float_ids_and_extra_columns() {
    let text = "# scipy linkage\n0.0 1.0 0.5 2.0\n\n2 3 1.25\n";
    let merges = read_linkage(text.as_bytes()).expect("linkage is valid");
    assert_eq!(
        merges,
        vec![ClusterMerge::new(0, 1, 0.5), ClusterMerge::new(2, 3, 1.25)]
    );
}

#[rstest]
#[case::short_row("0 1\n", crate::ParseErrorCode::TooFewTokens)]
#[case::fractional_id("0.5 1 2\n", crate::ParseErrorCode::InvalidInteger)]
#[case::bad_height("0 1 tall\n", crate::ParseErrorCode::InvalidFloat)]
fn read_linkage_rejects_malformed_rows(
    #[case] text: &str,
    #[case] expected: crate::ParseErrorCode,
) {
    let err = read_linkage(text.as_bytes()).expect_err("row is malformed");
    assert_eq!(err.parse_code(), Some(expected));
}
