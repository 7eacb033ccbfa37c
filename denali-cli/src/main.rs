//! Entry point of the `denali` binary.
//!
//! Parses arguments with clap, runs the command, renders its summary to
//! stdout and maps failures to a non-zero exit status. Logging is installed
//! first so every later step emits structured diagnostics.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use denali_core::{CAPABILITIES, Capability};
use tracing::{debug, error, field};

use denali_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    debug!(
        graph = CAPABILITIES.has(Capability::Graph),
        "resolved capabilities"
    );
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let core = err.downcast_ref::<CliError>().and_then(CliError::core);
        let code_field = core.map(|core| field::display(core.code().as_str()));
        let parse_code_field = core
            .and_then(|core| core.parse_code())
            .map(|code| field::display(code.as_str()));
        let argument_code_field = core
            .and_then(|core| core.argument_code())
            .map(|code| field::display(code.as_str()));

        let message = format!("{err:#}");
        error!(
            error = message.as_str(),
            code = code_field,
            parse_code = parse_code_field,
            argument_code = argument_code_field,
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[allow(
    clippy::print_stderr,
    reason = "tracing is not available until logging is initialised"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
