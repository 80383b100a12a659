//! Buffer command implementation

use super::emit_features;
use crate::cli::BufferArgs;
use crate::config_loader::load_config_with_overrides;
use crate::inputs::load_polygons;
use crate::output::OutputWriter;
use anyhow::Result;
use quakestat_core::config::CliConfigOverrides;
use quakestat_geo::buffer_polygons;
use std::path::Path;

pub fn execute(args: BufferArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(
        config_file,
        CliConfigOverrides { buffer_degrees: args.radius, ..Default::default() },
    )?;

    let polygons = load_polygons(&args.input)?;
    let buffered = buffer_polygons(&polygons, config.buffer_degrees.value)?;

    emit_features(&buffered, args.output.as_deref(), output)
}
