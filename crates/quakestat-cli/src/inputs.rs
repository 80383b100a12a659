//! Loading command inputs

use anyhow::{Context, Result};
use quakestat_core::config::LayeredConfig;
use quakestat_core::formats::{read_csv, read_vector};
use quakestat_core::models::{Crs, GeoTable, Table};
use quakestat_geo::to_point_geometry;
use std::path::Path;

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Read a plain table from CSV
pub fn load_table(path: &Path) -> Result<Table> {
    read_csv(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read polygon features
pub fn load_polygons(path: &Path) -> Result<GeoTable> {
    read_vector(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read earthquake points. CSV inputs are converted with the configured coordinate columns.
pub fn load_points(path: &Path, config: &LayeredConfig) -> Result<GeoTable> {
    if !is_csv(path) {
        return load_polygons(path);
    }

    let table = load_table(path)?;
    to_point_geometry(
        table,
        &config.lon_column.value,
        &config.lat_column.value,
        Crs::from_epsg(config.crs.value),
    )
    .with_context(|| format!("Failed to build points from {}", path.display()))
}
