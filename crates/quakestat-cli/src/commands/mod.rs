//! Command implementations

mod bin;
mod buffer;
mod calendar;
mod config;
mod consolidate;
mod count;
mod grid;
mod locate;
mod max_magnitude;
mod points;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use crate::output_types::WriteOutput;
use anyhow::{Context, Result};
use quakestat_core::formats::{write_csv, write_geojson};
use quakestat_core::models::{GeoTable, Table};
use std::path::Path;

/// Execute a CLI command
pub fn execute(cli: Cli, output: &OutputWriter) -> Result<()> {
    let config_file = cli.config.as_deref();
    tracing::debug!("Executing {:?}", cli.command);

    match cli.command {
        Commands::Grid(args) => grid::execute(args, output),
        Commands::Bin(args) => bin::execute(args, config_file, output),
        Commands::Points(args) => points::execute(args, config_file, output),
        Commands::Buffer(args) => buffer::execute(args, config_file, output),
        Commands::Count(args) => count::execute(args, config_file, output),
        Commands::MaxMagnitude(args) => max_magnitude::execute(args, config_file, output),
        Commands::Consolidate(args) => consolidate::execute(args, config_file, output),
        Commands::Calendar(args) => calendar::execute(args, output),
        Commands::Locate(args) => locate::execute(args, config_file, output),
        Commands::Config => config::execute(config_file, output),
    }
}

/// Write a table to CSV when a path is given, print it otherwise
fn emit_table(table: &Table, path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let Some(path) = path else {
        output.records(table);
        return Ok(());
    };

    write_csv(table, path).with_context(|| format!("Failed to write {}", path.display()))?;
    report_written(path, table.len(), output)
}

/// Write features to GeoJSON when a path is given, print them otherwise
fn emit_features(table: &GeoTable, path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let Some(path) = path else {
        return output.features(table);
    };

    write_geojson(table, path).with_context(|| format!("Failed to write {}", path.display()))?;
    report_written(path, table.len(), output)
}

fn report_written(path: &Path, rows: usize, output: &OutputWriter) -> Result<()> {
    if output.is_json() {
        output.result(WriteOutput { path: path.display().to_string(), rows })
    } else {
        output.success(format!("Wrote {} rows to {}", rows, path.display()));
        Ok(())
    }
}
