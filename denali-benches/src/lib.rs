//! Benchmark support crate for denali.
//!
//! Provides seeded synthetic point clouds and linkage matrices for the
//! Criterion benchmarks of the neighbour complex and cluster-tree builders.

pub mod error;
pub mod source;
