//! Unit tests for the neighbour complex builder.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::{ArgumentErrorCode, DenaliError};

fn line_cloud(xs: &[f64]) -> PointCloud {
    let rows: Vec<[f64; 1]> = xs.iter().map(|&x| [x]).collect();
    PointCloud::from_rows(&rows).expect("rows are valid")
}

#[rstest]
#[case::brute(NeighborStrategy::BruteForce)]
#[case::kd_tree(NeighborStrategy::KdTree)]
#[case::auto(NeighborStrategy::Auto)]
fn two_clusters_stay_apart_for_small_k(#[case] strategy: NeighborStrategy) {
    let cloud = line_cloud(&[0.0, 0.1, 0.2, 10.0, 10.1, 10.2]);
    let edges = ComplexBuilder::new(2)
        .with_strategy(strategy)
        .build(&cloud)
        .expect("k is valid");
    assert_eq!(edges, vec![(0, 1), (0, 2), (1, 2), (3, 4), (3, 5), (4, 5)]);
}

#[rstest]
#[case::brute(NeighborStrategy::BruteForce)]
#[case::kd_tree(NeighborStrategy::KdTree)]
fn ties_prefer_lower_index(#[case] strategy: NeighborStrategy) {
    // Points 0 and 2 are equidistant from point 1.
    let cloud = line_cloud(&[-1.0, 0.0, 1.0]);
    let lists = ComplexBuilder::new(1).neighbour_lists(&cloud, strategy);
    assert_eq!(lists[1].iter().map(|n| n.id).collect::<Vec<_>>(), vec![0]);
}

#[test]
fn duplicate_points_do_not_create_self_loops() {
    let cloud = line_cloud(&[3.0, 3.0, 3.0]);
    let edges = ComplexBuilder::new(1).build(&cloud).expect("k is valid");
    assert_eq!(edges, vec![(0, 1), (0, 2)]);
}

#[test]
fn auto_switches_engine_at_limit() {
    assert_eq!(
        NeighborStrategy::Auto.resolve(AUTO_BRUTE_FORCE_LIMIT),
        NeighborStrategy::BruteForce
    );
    assert_eq!(
        NeighborStrategy::Auto.resolve(AUTO_BRUTE_FORCE_LIMIT + 1),
        NeighborStrategy::KdTree
    );
    assert_eq!(NeighborStrategy::KdTree.resolve(2), NeighborStrategy::KdTree);
}

#[rstest]
#[case::zero_k(0, ArgumentErrorCode::ZeroNeighbors)]
#[case::k_equals_n(3, ArgumentErrorCode::TooManyNeighbors)]
#[case::k_above_n(7, ArgumentErrorCode::TooManyNeighbors)]
fn invalid_k_is_rejected(#[case] k: usize, #[case] expected: ArgumentErrorCode) {
    let err = kneighbors_complex(&[[0.0], [1.0], [2.0]], k).expect_err("k is out of range");
    assert_eq!(err.argument_code(), Some(expected));
}

#[test]
fn ragged_rows_are_rejected() {
    let rows = vec![vec![0.0, 1.0], vec![2.0]];
    let err = kneighbors_complex(&rows, 1).expect_err("rows are ragged");
    assert!(matches!(
        err,
        DenaliError::InvalidArgument(ArgumentError::RaggedPoints {
            row: 1,
            expected: 2,
            found: 1
        })
    ));
}

#[rstest]
#[case::empty(Vec::new(), ArgumentErrorCode::EmptyPointCloud)]
#[case::zero_dimension(vec![vec![], vec![]], ArgumentErrorCode::ZeroDimension)]
#[case::nan(vec![vec![0.0], vec![f64::NAN]], ArgumentErrorCode::NonFiniteCoordinate)]
#[case::infinite(vec![vec![f64::INFINITY], vec![0.0]], ArgumentErrorCode::NonFiniteCoordinate)]
fn invalid_clouds_are_rejected(#[case] rows: Vec<Vec<f64>>, #[case] expected: ArgumentErrorCode) {
    let err = PointCloud::from_rows(&rows).expect_err("cloud is invalid");
    assert_eq!(err.code(), expected);
}

fn grid_cloud() -> impl Strategy<Value = (Vec<[f64; 2]>, usize)> {
    (2usize..90).prop_flat_map(|n| {
        (
            prop::collection::vec((0u8..5, 0u8..5), n)
                .prop_map(|cells| {
                    cells
                        .into_iter()
                        .map(|(x, y)| [f64::from(x), f64::from(y)])
                        .collect()
                }),
            1..n,
        )
    })
}

fn tie_free_cloud() -> impl Strategy<Value = (Vec<[f64; 3]>, usize, Vec<usize>)> {
    (3usize..24)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(prop::array::uniform3(-100.0f64..100.0), n),
                1..n,
                Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
            )
        })
        .prop_filter("pairwise distances must be distinct", |(points, _, _)| {
            let mut seen = BTreeSet::new();
            (0..points.len()).all(|a| {
                (a + 1..points.len()).all(|b| {
                    let distance = points::squared_distance(&points[a], &points[b]);
                    seen.insert(distance.to_bits())
                })
            })
        })
}

proptest! {
    #[test]
    fn engines_agree_even_with_ties((rows, k) in grid_cloud()) {
        let cloud = PointCloud::from_rows(&rows).expect("grid rows are valid");
        let builder = ComplexBuilder::new(k);
        let brute = builder.neighbour_lists(&cloud, NeighborStrategy::BruteForce);
        let kd = builder.neighbour_lists(&cloud, NeighborStrategy::KdTree);
        prop_assert_eq!(brute, kd);
    }

    #[test]
    fn edges_are_canonical_and_in_range((rows, k) in grid_cloud()) {
        let edges = kneighbors_complex(&rows, k).expect("k is valid");
        for window in edges.windows(2) {
            prop_assert!(window[0] < window[1]);
        }
        for &(u, v) in &edges {
            prop_assert!(u < v);
            prop_assert!(v < rows.len());
        }
        // Every point keeps at least its own k neighbours.
        for point in 0..rows.len() {
            let degree = edges.iter().filter(|&&(u, v)| u == point || v == point).count();
            prop_assert!(degree >= k);
        }
    }

    #[test]
    fn complex_is_equivariant_under_permutation((rows, k, perm) in tie_free_cloud()) {
        let original: BTreeSet<_> = kneighbors_complex(&rows, k)
            .expect("k is valid")
            .into_iter()
            .collect();
        let permuted: Vec<[f64; 3]> = perm.iter().map(|&old| rows[old]).collect();
        let relabelled: BTreeSet<_> = kneighbors_complex(&permuted, k)
            .expect("k is valid")
            .into_iter()
            .map(|(a, b)| {
                let (a, b) = (perm[a], perm[b]);
                (a.min(b), a.max(b))
            })
            .collect();
        prop_assert_eq!(original, relabelled);
    }
}
