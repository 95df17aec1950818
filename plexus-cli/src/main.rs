//! `plexus` binary.
//!
//! Installs logging, runs the parsed command and prints its summary on
//! stdout. Any failure is logged with its stable error code, when one exists,
//! and turns into a failing exit status.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, field};

use plexus_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{LoggingError, init_logging},
};

fn execute(cli: Cli) -> anyhow::Result<()> {
    let summary = run_cli(cli).context("command failed")?;
    let mut out = BufWriter::new(io::stdout().lock());
    render_summary(&summary, &mut out).context("could not print the summary")?;
    out.flush().context("could not flush stdout")
}

fn main() -> ExitCode {
    if let Err(err) = init_logging() {
        announce_logging_failure(&err);
        return ExitCode::FAILURE;
    }
    let Err(err) = execute(Cli::parse()) else {
        return ExitCode::SUCCESS;
    };
    let code = err.downcast_ref::<CliError>().and_then(CliError::code);
    error!(error = %err, code = code.map(field::display), "plexus failed");
    ExitCode::FAILURE
}

#[expect(
    clippy::print_stderr,
    reason = "no subscriber exists when logging setup itself fails"
)]
fn announce_logging_failure(err: &LoggingError) {
    eprintln!("plexus: cannot set up logging: {err}");
}
