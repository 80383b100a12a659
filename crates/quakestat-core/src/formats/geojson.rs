//! GeoJSON reader and writer

use std::fs;
use std::path::Path;
use std::str::FromStr;

use geo::{Geometry, GeometryCollection};

use crate::error::{QuakestatError, Result};
use crate::formats::VectorReader;
use crate::models::{Crs, GeoTable, Table, Value};

/// GeoJSON format reader
pub struct GeoJsonReader;

impl VectorReader for GeoJsonReader {
    fn read(&self, path: &Path) -> Result<GeoTable> {
        let content = fs::read_to_string(path)?;
        let table = parse_geojson(&content)?;
        tracing::info!("Read {} features from {}", table.len(), path.display());
        Ok(table)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["geojson", "json"]
    }

    fn format_name(&self) -> &str {
        "GeoJSON"
    }
}

/// Read a GeoJSON file into a feature table
pub fn read_geojson(path: &Path) -> Result<GeoTable> {
    GeoJsonReader.read(path)
}

/// Parse GeoJSON text into a feature table
///
/// Properties become columns in order of first appearance; features missing
/// a property get `Null`. A feature without geometry gets an empty geometry
/// collection so row alignment is kept.
pub fn parse_geojson(content: &str) -> Result<GeoTable> {
    let geojson: ::geojson::GeoJson = content.parse().map_err(|e| QuakestatError::FormatError {
        format: "GeoJSON".to_string(),
        message: format!("Failed to parse GeoJSON: {}", e),
    })?;

    let (features, crs) = match geojson {
        ::geojson::GeoJson::FeatureCollection(fc) => {
            let crs = fc
                .foreign_members
                .as_ref()
                .and_then(|fm| fm.get("crs"))
                .and_then(extract_crs)
                .unwrap_or_default();
            (fc.features, crs)
        }
        ::geojson::GeoJson::Feature(feature) => (vec![feature], Crs::wgs84()),
        ::geojson::GeoJson::Geometry(geometry) => (
            vec![::geojson::Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: None,
                foreign_members: None,
            }],
            Crs::wgs84(),
        ),
    };

    let mut columns: Vec<String> = Vec::new();
    for feature in &features {
        if let Some(properties) = &feature.properties {
            for key in properties.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let mut table = Table::new(columns.clone())?;
    let mut geometries = Vec::with_capacity(features.len());

    for (row, feature) in features.into_iter().enumerate() {
        let values = columns
            .iter()
            .map(|c| {
                feature
                    .properties
                    .as_ref()
                    .and_then(|p| p.get(c))
                    .map(Value::from_json)
                    .unwrap_or(Value::Null)
            })
            .collect();
        table.push_row(values)?;

        let geometry = match feature.geometry {
            Some(geometry) => Geometry::<f64>::try_from(geometry).map_err(|e| {
                QuakestatError::InvalidGeometry { row, reason: e.to_string() }
            })?,
            None => {
                tracing::warn!("Feature {} has no geometry", row);
                Geometry::GeometryCollection(GeometryCollection::default())
            }
        };
        geometries.push(geometry);
    }

    GeoTable::new(table, geometries, crs)
}

/// Extract the CRS from a legacy GeoJSON `crs` member
fn extract_crs(crs_obj: &serde_json::Value) -> Option<Crs> {
    let name = crs_obj.get("properties")?.get("name")?.as_str()?;
    match Crs::from_str(name) {
        Ok(crs) => Some(crs),
        Err(_) => {
            tracing::warn!("Unrecognised CRS '{}', assuming EPSG:4326", name);
            None
        }
    }
}

/// Serialize a feature table as a GeoJSON FeatureCollection
pub fn to_geojson_string(table: &GeoTable) -> String {
    let features = table
        .features()
        .map(|(_, row, geometry)| {
            let properties: serde_json::Map<String, serde_json::Value> = table
                .attributes()
                .columns()
                .iter()
                .zip(row)
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect();

            ::geojson::Feature {
                bbox: None,
                geometry: Some(::geojson::Geometry::new(::geojson::Value::from(geometry))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let mut foreign_members = serde_json::Map::new();
    if !table.crs().is_geographic() {
        foreign_members.insert(
            "crs".to_string(),
            serde_json::json!({
                "type": "name",
                "properties": { "name": format!("EPSG:{}", table.crs().epsg) }
            }),
        );
    }

    let collection = ::geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: if foreign_members.is_empty() { None } else { Some(foreign_members) },
    };

    ::geojson::GeoJson::FeatureCollection(collection).to_string()
}

/// Write a feature table to a GeoJSON file
pub fn write_geojson(table: &GeoTable, path: &Path) -> Result<()> {
    fs::write(path, to_geojson_string(table))?;
    tracing::info!("Wrote {} features to {}", table.len(), path.display());
    Ok(())
}
