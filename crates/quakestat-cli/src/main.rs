//! quakestat CLI - Command-line interface
//!
//! Thin adapter over the quakestat core and geo crates.

mod cli;
mod commands;
mod config_loader;
mod inputs;
mod output;
mod output_types;

use clap::Parser;
use cli::Cli;
use output::OutputWriter;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays clean for tables and JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    match commands::execute(cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
