//! Count command implementation

use super::emit_table;
use crate::cli::CountArgs;
use crate::config_loader::load_config_with_overrides;
use crate::inputs::{load_points, load_polygons};
use crate::output::OutputWriter;
use anyhow::Result;
use quakestat_core::config::CliConfigOverrides;
use quakestat_geo::{
    buffer_polygons, count_in_country_year_with, AggregateOptions, JoinPolicy, BORDER_LABEL_DEGREES,
};
use std::path::Path;

pub fn execute(args: CountArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(
        config_file,
        CliConfigOverrides {
            buffer_degrees: args.radius,
            lon_column: args.coordinates.lon,
            lat_column: args.coordinates.lat,
            ..Default::default()
        },
    )?;

    let mut countries = load_polygons(&args.countries)?;
    if args.buffered {
        let radius = config.buffer_degrees.value;
        if radius != BORDER_LABEL_DEGREES {
            tracing::warn!(
                "Buffering by {}°, but the count column is labelled with a {}° border",
                radius,
                BORDER_LABEL_DEGREES
            );
        }
        countries = buffer_polygons(&countries, radius)?;
    }
    let earthquakes = load_points(&args.earthquakes, &config)?;

    let options = AggregateOptions {
        name_column: args.name_column,
        year_column: args.year_column,
        join: if args.left { JoinPolicy::Left } else { JoinPolicy::Inner },
        ..Default::default()
    };

    let counts =
        count_in_country_year_with(&countries, &earthquakes, args.year, args.buffered, &options)?;

    emit_table(&counts, args.output.as_deref(), output)
}
