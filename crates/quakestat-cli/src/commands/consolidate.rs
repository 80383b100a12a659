//! Consolidate command implementation

use super::emit_table;
use crate::cli::ConsolidateArgs;
use crate::config_loader::load_config_with_overrides;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use quakestat_core::config::CliConfigOverrides;
use quakestat_core::consolidate::{consolidate_with, ColumnPolicy};
use std::path::Path;

pub fn execute(
    args: ConsolidateArgs,
    config_file: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    let config = load_config_with_overrides(
        config_file,
        CliConfigOverrides {
            min_filename_length: args.min_name_length,
            column_policy: args.union.then_some(ColumnPolicy::Union),
            ..Default::default()
        },
    )?;

    let table = consolidate_with(
        &args.directory,
        config.min_filename_length.value,
        config.column_policy.value,
    )
    .with_context(|| format!("Failed to consolidate {}", args.directory.display()))?;

    emit_table(&table, args.output.as_deref(), output)
}
