//! Support library for the `denali` binary.
//!
//! Exposes the command pipeline and logging setup so tests can drive the
//! commands without spawning a subprocess.

pub mod cli;
pub mod logging;
