//! The fixed 10° world grid and per-bin counting.

use geo::Geometry;
use quakestat_core::models::bin::{BIN_SIZE_DEGREES, LAT_MAX, LAT_MIN, LON_MAX, LON_MIN};
use quakestat_core::models::{Bin, Crs, GeoTable, Table, Value};
use quakestat_core::{QuakestatError, Result};

/// Number of latitude bands (18)
pub const LAT_BANDS: usize = ((LAT_MAX - LAT_MIN) / BIN_SIZE_DEGREES) as usize;

/// Number of longitude bands (36)
pub const LON_BANDS: usize = ((LON_MAX - LON_MIN) / BIN_SIZE_DEGREES) as usize;

/// Name of the count column produced by [`count_per_bin`]
pub const BIN_COUNT_COLUMN: &str = "Earthquake count";

/// Build every bin of the world grid, ordered by latitude band then longitude band
pub fn build_world_grid() -> Vec<Bin> {
    (0..LAT_BANDS)
        .flat_map(|i| (0..LON_BANDS).map(move |j| Bin::new(i, j)))
        .collect()
}

/// Band indices `(lat_index, lon_index)` of the bin containing a coordinate
///
/// The north pole and the antimeridian at +180 fall into the last band.
pub fn bin_index_for(lon: f64, lat: f64) -> Option<(usize, usize)> {
    if !lon.is_finite() || !lat.is_finite() {
        return None;
    }
    if !(LAT_MIN..=LAT_MAX).contains(&lat) || !(LON_MIN..=LON_MAX).contains(&lon) {
        return None;
    }

    let i = (((lat - LAT_MIN) / BIN_SIZE_DEGREES).floor() as usize).min(LAT_BANDS - 1);
    let j = (((lon - LON_MIN) / BIN_SIZE_DEGREES).floor() as usize).min(LON_BANDS - 1);
    Some((i, j))
}

/// Id of the bin containing a coordinate
pub fn bin_id_for(lon: f64, lat: f64) -> Option<String> {
    bin_index_for(lon, lat).map(|(i, j)| Bin::make_id(i, j))
}

/// The grid as polygon features with `bin_id`, `bin_lat` and `bin_lon` columns
pub fn grid_geo_table() -> Result<GeoTable> {
    let bins = build_world_grid();

    let mut attributes = Table::new(["bin_id", "bin_lat", "bin_lon"])?;
    let mut geometries = Vec::with_capacity(bins.len());

    for bin in &bins {
        attributes.push_row(vec![
            Value::from(bin.id.as_str()),
            Value::Float(bin.bin_lat),
            Value::Float(bin.bin_lon),
        ])?;
        geometries.push(Geometry::Polygon(bin.to_polygon()));
    }

    GeoTable::new(attributes, geometries, Crs::wgs84())
}

/// Count point features per grid bin
///
/// Only bins holding at least one point are listed, in grid order. Points
/// outside the valid coordinate range are skipped with a warning.
pub fn count_per_bin(points: &GeoTable) -> Result<Table> {
    Crs::wgs84().ensure_matches(points.crs())?;

    let mut counts = vec![0i64; LAT_BANDS * LON_BANDS];
    let mut skipped = 0usize;

    for (row, geometry) in points.geometries().iter().enumerate() {
        let Geometry::Point(point) = geometry else {
            return Err(QuakestatError::InvalidGeometry {
                row,
                reason: "expected a point".to_string(),
            });
        };

        match bin_index_for(point.x(), point.y()) {
            Some((i, j)) => counts[i * LON_BANDS + j] += 1,
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} points outside the grid", skipped);
    }

    let mut table = Table::new(["bin_id", "bin_lat", "bin_lon", BIN_COUNT_COLUMN])?;
    for bin in build_world_grid() {
        let count = counts[bin.lat_index * LON_BANDS + bin.lon_index];
        if count > 0 {
            table.push_row(vec![
                Value::Text(bin.id),
                Value::Float(bin.bin_lat),
                Value::Float(bin.bin_lon),
                Value::Int(count),
            ])?;
        }
    }

    tracing::info!("Counted {} points into {} bins", points.len() - skipped, table.len());
    Ok(table)
}
