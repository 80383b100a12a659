//! Locate command implementation

use crate::cli::LocateArgs;
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::LocateOutput;
use anyhow::{bail, Result};
use quakestat_core::geocode::NominatimGeocoder;
use quakestat_core::ports::Geocoder;
use std::path::Path;

pub fn execute(args: LocateArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    if !(-90.0..=90.0).contains(&args.lat) || !(-180.0..=180.0).contains(&args.lon) {
        bail!("Coordinate ({}, {}) is outside the valid range", args.lat, args.lon);
    }

    let config = load_config(config_file)?;
    let geocoder = NominatimGeocoder::new(&config.geocoder_url.value, &config.user_agent.value)?;
    let info = geocoder.location_info(args.lat, args.lon);

    if output.is_json() {
        return output.result(LocateOutput {
            lat: args.lat,
            lon: args.lon,
            country: info.country,
            water_body: info.water_body,
            location_type: info.location_type,
        });
    }

    output.section("Location");
    output.kv("Coordinate", format!("{}, {}", args.lat, args.lon));
    match info.country {
        Some(country) => output.kv("Country", country),
        None => output.info("The geocoder could not be reached; see the log for details"),
    }
    if let Some(water_body) = info.water_body {
        output.kv("Water body", water_body);
    }
    if let Some(location_type) = info.location_type {
        output.kv("Type", location_type);
    }

    Ok(())
}
