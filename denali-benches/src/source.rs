//! Seeded synthetic inputs for benchmarking.
//!
//! Point clouds are drawn uniformly from the unit hypercube; linkage
//! matrices merge randomly chosen live clusters at increasing heights, so
//! every generated clustering is valid.

use denali_core::{ArgumentError, ClusterMerge, PointCloud};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors that may occur during synthetic data generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested point count was zero.
    #[error("point count must be greater than zero")]
    ZeroPoints,
    /// The requested dimension count was zero.
    #[error("dimension count must be greater than zero")]
    ZeroDimensions,
}

/// Configuration for synthetic point generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Coordinates per point.
    pub dimensions: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Uniform random rows in `[0, 1)^dimensions`.
///
/// # Examples
///
/// ```
/// use denali_benches::source::{SyntheticCloud, SyntheticConfig};
///
/// let config = SyntheticConfig { point_count: 10, dimensions: 3, seed: 42 };
/// let cloud = SyntheticCloud::generate(&config).expect("valid config");
/// assert_eq!(cloud.rows().len(), 10);
/// assert_eq!(cloud.points().expect("finite rows").dimension(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticCloud {
    rows: Vec<Vec<f64>>,
}

impl SyntheticCloud {
    /// Generates rows eagerly from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntheticError::ZeroPoints`] if `point_count` is zero and
    /// [`SyntheticError::ZeroDimensions`] if `dimensions` is zero.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        if config.point_count == 0 {
            return Err(SyntheticError::ZeroPoints);
        }
        if config.dimensions == 0 {
            return Err(SyntheticError::ZeroDimensions);
        }

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let rows = (0..config.point_count)
            .map(|_| (0..config.dimensions).map(|_| rng.r#gen::<f64>()).collect())
            .collect();
        Ok(Self { rows })
    }

    /// Borrows the generated rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Validates the rows as a [`PointCloud`].
    ///
    /// # Errors
    ///
    /// Propagates [`ArgumentError`] from [`PointCloud::from_rows`].
    pub fn points(&self) -> Result<PointCloud, ArgumentError> {
        PointCloud::from_rows(&self.rows)
    }
}

/// Generates a single-linkage clustering of `leaves` points.
///
/// # Errors
///
/// Returns [`SyntheticError::ZeroPoints`] if `leaves` is zero.
///
/// # Examples
///
/// ```
/// use denali_benches::source::random_linkage;
///
/// let merges = random_linkage(8, 7).expect("leaves are non-zero");
/// assert_eq!(merges.len(), 7);
/// assert!(merges.windows(2).all(|pair| pair[0].height <= pair[1].height));
/// ```
pub fn random_linkage(leaves: usize, seed: u64) -> Result<Vec<ClusterMerge>, SyntheticError> {
    if leaves == 0 {
        return Err(SyntheticError::ZeroPoints);
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut live: Vec<usize> = (0..leaves).collect();
    let mut merges = Vec::with_capacity(leaves - 1);
    let mut height = 0.0;
    for next in leaves..2 * leaves - 1 {
        let left = live.swap_remove(rng.gen_range(0..live.len()));
        let right = live.swap_remove(rng.gen_range(0..live.len()));
        height += rng.r#gen::<f64>();
        merges.push(ClusterMerge::new(left, right, height));
        live.push(next);
    }
    Ok(merges)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::no_points(0, 2, SyntheticError::ZeroPoints)]
    #[case::no_dimensions(3, 0, SyntheticError::ZeroDimensions)]
    fn generate_rejects_empty_configs(
        #[case] point_count: usize,
        #[case] dimensions: usize,
        #[case] expected: SyntheticError,
    ) {
        let config = SyntheticConfig {
            point_count,
            dimensions,
            seed: 1,
        };
        let err = SyntheticCloud::generate(&config).expect_err("config is empty");
        assert_eq!(err, expected);
    }

    #[test]
    fn generation_is_reproducible() {
        let config = SyntheticConfig {
            point_count: 16,
            dimensions: 4,
            seed: 9,
        };
        let first = SyntheticCloud::generate(&config).expect("valid config");
        let second = SyntheticCloud::generate(&config).expect("valid config");
        assert_eq!(first.rows(), second.rows());
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(50)]
    fn random_linkage_builds_valid_cluster_trees(#[case] leaves: usize) {
        let merges = random_linkage(leaves, 3).expect("leaves are non-zero");
        let tree = denali_core::build_cluster_tree(&merges, |merge| merge.height)
            .expect("generated merges are valid");
        assert_eq!(tree.tree().node_count(), 2 * leaves - 1);
    }
}
