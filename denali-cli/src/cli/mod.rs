//! Command-line interface for preparing and inspecting denali files.
//!
//! `complex` and `cluster-tree` produce inputs for the viewer; `selection`
//! and `tree` report on files the viewer hands back.

mod commands;

pub use commands::{
    Cli, CliError, ClusterTreeArgs, Command, ComplexArgs, ExecutionSummary, OutputFormat,
    SelectionArgs, StrategyArg, TreeArgs, render_summary, run_cli,
};
