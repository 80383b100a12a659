//! Grid command implementation

use super::emit_features;
use crate::cli::GridArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use quakestat_core::models::{Table, Value};
use quakestat_geo::{build_world_grid, grid_geo_table};

pub fn execute(args: GridArgs, output: &OutputWriter) -> Result<()> {
    if let Some(path) = args.output.as_deref() {
        return emit_features(&grid_geo_table()?, Some(path), output);
    }

    let mut table = Table::new(["bin_id", "bin_lat", "bin_lon"])?;
    for bin in build_world_grid() {
        table.push_row(vec![Value::Text(bin.id), Value::Float(bin.bin_lat), Value::Float(bin.bin_lon)])?;
    }

    output.records(&table);
    Ok(())
}
