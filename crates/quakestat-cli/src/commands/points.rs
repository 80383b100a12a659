//! Points command implementation

use super::emit_features;
use crate::cli::PointsArgs;
use crate::config_loader::load_config_with_overrides;
use crate::inputs::load_table;
use crate::output::OutputWriter;
use anyhow::Result;
use quakestat_core::config::CliConfigOverrides;
use quakestat_core::models::Crs;
use quakestat_geo::to_point_geometry;
use std::path::Path;

pub fn execute(args: PointsArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(
        config_file,
        CliConfigOverrides {
            crs: args.crs,
            lon_column: args.coordinates.lon,
            lat_column: args.coordinates.lat,
            ..Default::default()
        },
    )?;

    let table = load_table(&args.input)?;
    let points = to_point_geometry(
        table,
        &config.lon_column.value,
        &config.lat_column.value,
        Crs::from_epsg(config.crs.value),
    )?;

    emit_features(&points, args.output.as_deref(), output)
}
