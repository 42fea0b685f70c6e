//! `specnut`: token-reduced digests of specification documents.
//!
//! Exit codes: 0 success, 1 general failure, 2 unsupported or malformed
//! input and invalid config, 3 reduction below `--min-reduction`, 4 I/O
//! failure. Nothing is written on error.

mod cli;
mod commands;
mod exit;
mod logging;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use cli::Cli;
use exit::ExitStatus;

fn main() -> ExitCode {
    let start = Instant::now();
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {e}");
    }

    let result = commands::run(&cli);
    tracing::debug!(elapsed = ?start.elapsed(), "run");

    match result {
        Ok(()) => ExitCode::from(ExitStatus::Success.code()),
        Err(e) => {
            let status = ExitStatus::for_error(&e);
            if cli.log_json {
                eprintln!("{}", exit::error_json(&e));
            } else {
                eprintln!("error: {e:#}");
            }
            ExitCode::from(status.code())
        }
    }
}
