//! Converting between plain tables and feature tables.

use geo::{Buffer, Geometry, Point};
use quakestat_core::models::{Crs, GeoTable, Table};
use quakestat_core::{QuakestatError, Result};

/// Turn a table with coordinate columns into point features
///
/// Each row becomes `Point(x = lon, y = lat)`. Every column (including the
/// coordinate columns) is kept, in the same order and with the same rows.
pub fn to_point_geometry(
    table: Table,
    lon_column: &str,
    lat_column: &str,
    crs: Crs,
) -> Result<GeoTable> {
    let lon_index = table.column_index(lon_column)?;
    let lat_index = table.column_index(lat_column)?;

    let geometries = table
        .rows()
        .iter()
        .enumerate()
        .map(|(row, values)| {
            let lon = values[lon_index].as_coordinate(row, lon_column)?;
            let lat = values[lat_index].as_coordinate(row, lat_column)?;
            Ok(Geometry::Point(Point::new(lon, lat)))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("Built {} points from ({}, {})", geometries.len(), lon_column, lat_column);
    GeoTable::new(table, geometries, crs)
}

/// Dilate every geometry by `radius_degrees`
///
/// The radius is in coordinate units, so for EPSG:4326 it is a number of
/// degrees and the buffered area stretches towards the poles. Attribute
/// columns are shared with the input, not copied.
pub fn buffer_polygons(table: &GeoTable, radius_degrees: f64) -> Result<GeoTable> {
    if !radius_degrees.is_finite() || radius_degrees < 0.0 {
        return Err(QuakestatError::invalid_parameter(
            "radius_degrees",
            format!("must be a finite, non-negative number (got {})", radius_degrees),
        ));
    }

    if radius_degrees == 0.0 {
        return table.with_geometries(table.geometries().to_vec());
    }

    if !table.crs().is_geographic() {
        tracing::warn!("Buffering in {} units, not degrees", table.crs());
    }

    let geometries = table.geometries().iter().map(|g| buffer_geometry(g, radius_degrees)).collect();

    tracing::debug!("Buffered {} geometries by {}°", table.len(), radius_degrees);
    table.with_geometries(geometries)
}

fn buffer_geometry(geometry: &Geometry<f64>, radius: f64) -> Geometry<f64> {
    let mut buffered = geometry.buffer(radius);
    if buffered.0.len() == 1 {
        Geometry::Polygon(buffered.0.remove(0))
    } else {
        Geometry::MultiPolygon(buffered)
    }
}
