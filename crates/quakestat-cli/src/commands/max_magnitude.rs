//! Max-magnitude command implementation

use super::emit_table;
use crate::cli::MaxMagnitudeArgs;
use crate::config_loader::load_config_with_overrides;
use crate::inputs::{load_points, load_polygons};
use crate::output::OutputWriter;
use anyhow::Result;
use quakestat_core::config::CliConfigOverrides;
use quakestat_geo::{buffer_polygons, max_magnitude_per_country_with, AggregateOptions};
use std::path::Path;

pub fn execute(
    args: MaxMagnitudeArgs,
    config_file: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    let config = load_config_with_overrides(
        config_file,
        CliConfigOverrides {
            buffer_degrees: args.radius,
            lon_column: args.coordinates.lon,
            lat_column: args.coordinates.lat,
            ..Default::default()
        },
    )?;

    let countries = load_polygons(&args.countries)?;
    let extended = buffer_polygons(&countries, config.buffer_degrees.value)?;
    let earthquakes = load_points(&args.earthquakes, &config)?;

    let options = AggregateOptions {
        name_column: args.name_column,
        magnitude_column: args.magnitude_column,
        ..Default::default()
    };

    let maxima = max_magnitude_per_country_with(&countries, &extended, &earthquakes, &options)?;

    emit_table(&maxima, args.output.as_deref(), output)
}
