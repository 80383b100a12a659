//! Bin command implementation

use super::emit_table;
use crate::cli::BinArgs;
use crate::config_loader::load_config_with_overrides;
use crate::inputs::load_points;
use crate::output::OutputWriter;
use anyhow::Result;
use quakestat_core::config::CliConfigOverrides;
use quakestat_geo::count_per_bin;
use std::path::Path;

pub fn execute(args: BinArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(
        config_file,
        CliConfigOverrides {
            lon_column: args.coordinates.lon,
            lat_column: args.coordinates.lat,
            ..Default::default()
        },
    )?;

    let earthquakes = load_points(&args.earthquakes, &config)?;
    let counts = count_per_bin(&earthquakes)?;

    emit_table(&counts, args.output.as_deref(), output)
}
