//! Entry point for the `kaiso` binary.
//!
//! Parses flags with clap, clusters the payload read from stdin and prints the
//! result as a single JSON line. Logging is initialised first so every later
//! step reports through `tracing` on stderr. Nothing reaches stdout on failure.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use kaiso_cli::{
    cli::{Cli, CliError, render_output, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse flags, cluster stdin, then write and flush the result line.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let output = run_cli(&cli, io::stdin().lock()).context("failed to cluster embeddings")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_output(&output, &mut writer).context("failed to render result")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let (code, data_source_code) = err
            .downcast_ref::<CliError>()
            .map_or((None, None), |cli_error| {
                (Some(cli_error.code()), cli_error.data_source_code())
            });

        let data_source_code_field = data_source_code.map(|code| field::display(code.as_str()));
        let chain = format!("{err:#}");

        error!(
            error = %chain,
            code,
            data_source_code = data_source_code_field,
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
