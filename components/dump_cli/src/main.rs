//! bcdump
//!
//! Entry point for the bytecode dump tool. Parses CLI arguments, installs
//! the log subscriber and delegates to the bootstrap.

use std::process::ExitCode;

use clap::Parser as ClapParser;
use dump_cli::cli::normalize_args;
use dump_cli::{bootstrap, Cli};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    match bootstrap::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
