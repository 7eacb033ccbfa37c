//! Benchmark setup error type.

use crate::source::SyntheticError;
use denali_core::{ArgumentError, DenaliError};

/// Errors that may occur while preparing benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic data generation failed.
    #[error("synthetic data generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Generated inputs or benchmark parameters were rejected.
    #[error("invalid benchmark input: {0}")]
    Argument(#[from] ArgumentError),
    /// A core operation failed.
    #[error("core operation failed: {0}")]
    Core(#[from] DenaliError),
}
