//! Cluster-tree construction benchmarks.
//!
//! Builds trees from random single-linkage clusterings with raw and
//! exponential merge heights.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use denali_benches::{error::BenchSetupError, source::random_linkage};
use denali_core::{DEFAULT_GAMMA, build_cluster_tree, exp_height_factory};

const SEED: u64 = 7;

const LEAF_COUNTS: &[usize] = &[1_000, 10_000];

fn cluster_tree_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("build_cluster_tree");

    for &leaves in LEAF_COUNTS {
        let merges = random_linkage(leaves, SEED)?;
        let top = merges.last().map_or(1.0, |merge| merge.height);
        let exp_height = exp_height_factory(top, 0.0, DEFAULT_GAMMA)?;

        group.bench_with_input(BenchmarkId::new("raw", leaves), &merges, |b, merges| {
            b.iter(|| build_cluster_tree(merges, |merge| merge.height));
        });
        group.bench_with_input(
            BenchmarkId::new("exponential", leaves),
            &merges,
            |b, merges| {
                b.iter(|| build_cluster_tree(merges, exp_height));
            },
        );
    }

    group.finish();
    Ok(())
}

fn cluster_tree(c: &mut Criterion) {
    if let Err(err) = cluster_tree_impl(c) {
        panic!("build_cluster_tree benchmark setup failed: {err}");
    }
}

criterion_group!(benches, cluster_tree);
criterion_main!(benches);
