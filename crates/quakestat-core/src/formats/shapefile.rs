//! Shapefile format reader
//!
//! Shapefiles consist of multiple component files (.shp, .shx, .dbf, .prj).
//! The first three are required; the CRS comes from the optional .prj.

use geo::{coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, Point};
use ::shapefile::dbase::FieldValue as DbaseFieldValue;
use ::shapefile::{PolygonRing, Shape};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{QuakestatError, Result};
use crate::formats::VectorReader;
use crate::models::{Crs, GeoTable, Table, Value};

/// Shapefile format reader
pub struct ShapefileReader;

impl VectorReader for ShapefileReader {
    fn read(&self, path: &Path) -> Result<GeoTable> {
        verify_components(path)?;

        let base = shapefile_base(path)?;
        let shapes = ::shapefile::ShapeReader::from_path(path)
            .map_err(|e| format_error(format!("Failed to open Shapefile: {}", e)))?;
        let dbf = ::shapefile::dbase::Reader::from_path(base.with_extension("dbf"))
            .map_err(|e| format_error(format!("Failed to open .dbf file: {}", e)))?;

        // Columns follow the .dbf field declarations, even with zero records
        let columns: Vec<String> = dbf.fields().iter().map(|f| f.name().to_string()).collect();
        let mut table = Table::new(columns.clone())?;

        let crs = extract_crs(path)?;
        let mut reader = ::shapefile::Reader::new(shapes, dbf);
        let mut geometries = Vec::new();

        for (row, result) in reader.iter_shapes_and_records().enumerate() {
            let (shape, record) =
                result.map_err(|e| format_error(format!("Failed to read feature {}: {}", row, e)))?;

            geometries.push(convert_shape(&shape, row)?);

            let mut values: HashMap<String, Value> = record
                .into_iter()
                .map(|(name, value)| (name, convert_dbase_value(&value)))
                .collect();
            table.push_row(
                columns.iter().map(|c| values.remove(c).unwrap_or(Value::Null)).collect(),
            )?;
        }

        tracing::info!("Read {} features from {}", table.len(), path.display());
        GeoTable::new(table, geometries, crs)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["shp"]
    }

    fn format_name(&self) -> &str {
        "Shapefile"
    }
}

/// Read a Shapefile (and its sidecar files) into a feature table
pub fn read_shapefile(path: &Path) -> Result<GeoTable> {
    ShapefileReader.read(path)
}

fn format_error(message: String) -> QuakestatError {
    QuakestatError::FormatError { format: "Shapefile".to_string(), message }
}

/// Base path of a Shapefile (without extension)
fn shapefile_base(path: &Path) -> Result<PathBuf> {
    let is_shp = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("shp"))
        .unwrap_or(false);

    if !is_shp {
        return Err(format_error(format!("{} is not a .shp file", path.display())));
    }

    Ok(path.with_extension(""))
}

/// Verify that all required Shapefile component files exist
fn verify_components(path: &Path) -> Result<()> {
    let base = shapefile_base(path)?;
    let missing: Vec<String> = ["shp", "shx", "dbf"]
        .iter()
        .filter(|ext| !base.with_extension(ext).exists())
        .map(|ext| format!(".{}", ext))
        .collect();

    if !missing.is_empty() {
        return Err(format_error(format!(
            "Missing required component files: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// CRS from the .prj file, EPSG:4326 when absent or unrecognised
fn extract_crs(path: &Path) -> Result<Crs> {
    let prj_path = shapefile_base(path)?.with_extension("prj");

    if !prj_path.exists() {
        return Ok(Crs::wgs84());
    }

    let prj_content = fs::read_to_string(&prj_path)
        .map_err(|e| format_error(format!("Failed to read .prj file: {}", e)))?;

    Ok(parse_epsg_from_wkt(&prj_content).map(Crs::from_epsg).unwrap_or_default())
}

/// Find the last `AUTHORITY["EPSG","<code>"]` in a WKT string
///
/// The outermost CRS authority is written last in WKT1.
fn parse_epsg_from_wkt(wkt: &str) -> Option<u32> {
    const MARKER: &str = "AUTHORITY[\"EPSG\",\"";

    if let Some(start) = wkt.rfind(MARKER) {
        let code_start = start + MARKER.len();
        let end = wkt[code_start..].find('"')?;
        return wkt[code_start..code_start + end].parse().ok();
    }

    // Some writers emit a bare "EPSG:4326"
    let start = wkt.find("EPSG:")? + "EPSG:".len();
    let digits: String = wkt[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Group polygon rings into polygons: each outer ring starts a polygon and
/// the inner rings that follow are its holes.
fn rings_to_geometry(rings: Vec<(bool, LineString<f64>)>) -> Geometry<f64> {
    let mut polygons: Vec<geo::Polygon<f64>> = Vec::new();

    for (is_outer, ring) in rings {
        match polygons.last_mut() {
            Some(polygon) if !is_outer => polygon.interiors_push(ring),
            _ => polygons.push(geo::Polygon::new(ring, vec![])),
        }
    }

    if polygons.len() == 1 {
        Geometry::Polygon(polygons.remove(0))
    } else {
        Geometry::MultiPolygon(geo::MultiPolygon::new(polygons))
    }
}

fn lines_to_geometry(mut lines: Vec<LineString<f64>>) -> Geometry<f64> {
    if lines.len() == 1 {
        Geometry::LineString(lines.remove(0))
    } else {
        Geometry::MultiLineString(MultiLineString::new(lines))
    }
}

macro_rules! ring_list {
    ($polygon:expr) => {
        $polygon
            .rings()
            .iter()
            .map(|ring| {
                let is_outer = matches!(ring, PolygonRing::Outer(_));
                let coords: Vec<geo::Coord<f64>> =
                    ring.points().iter().map(|p| coord! { x: p.x, y: p.y }).collect();
                (is_outer, LineString::new(coords))
            })
            .collect::<Vec<_>>()
    };
}

macro_rules! line_list {
    ($polyline:expr) => {
        $polyline
            .parts()
            .iter()
            .map(|part| LineString::new(part.iter().map(|p| coord! { x: p.x, y: p.y }).collect()))
            .collect::<Vec<_>>()
    };
}

macro_rules! point_list {
    ($multipoint:expr) => {
        MultiPoint::new($multipoint.points().iter().map(|p| Point::new(p.x, p.y)).collect())
    };
}

/// Convert a shape to a 2-D geometry (Z and M values are dropped)
fn convert_shape(shape: &Shape, row: usize) -> Result<Geometry<f64>> {
    let geometry = match shape {
        Shape::Point(p) => Geometry::Point(Point::new(p.x, p.y)),
        Shape::PointM(p) => Geometry::Point(Point::new(p.x, p.y)),
        Shape::PointZ(p) => Geometry::Point(Point::new(p.x, p.y)),
        Shape::Polyline(line) => lines_to_geometry(line_list!(line)),
        Shape::PolylineM(line) => lines_to_geometry(line_list!(line)),
        Shape::PolylineZ(line) => lines_to_geometry(line_list!(line)),
        Shape::Polygon(polygon) => rings_to_geometry(ring_list!(polygon)),
        Shape::PolygonM(polygon) => rings_to_geometry(ring_list!(polygon)),
        Shape::PolygonZ(polygon) => rings_to_geometry(ring_list!(polygon)),
        Shape::Multipoint(points) => Geometry::MultiPoint(point_list!(points)),
        Shape::MultipointM(points) => Geometry::MultiPoint(point_list!(points)),
        Shape::MultipointZ(points) => Geometry::MultiPoint(point_list!(points)),
        Shape::Multipatch(_) => {
            return Err(QuakestatError::InvalidGeometry {
                row,
                reason: "Multipatch geometry type is not supported".to_string(),
            })
        }
        Shape::NullShape => Geometry::GeometryCollection(GeometryCollection::default()),
    };

    Ok(geometry)
}

/// Convert a dBase field value to a cell value
fn convert_dbase_value(value: &DbaseFieldValue) -> Value {
    match value {
        DbaseFieldValue::Character(Some(s)) => Value::Text(s.trim_end().to_string()),
        DbaseFieldValue::Character(None) => Value::Null,
        DbaseFieldValue::Numeric(n) => Value::from(*n),
        DbaseFieldValue::Logical(b) => Value::from(*b),
        DbaseFieldValue::Date(Some(date)) => {
            Value::Text(format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day()))
        }
        DbaseFieldValue::Date(None) => Value::Null,
        DbaseFieldValue::Float(f) => Value::from(f.map(f64::from)),
        DbaseFieldValue::Integer(i) => Value::from(*i),
        DbaseFieldValue::Currency(c) => Value::Float(*c),
        DbaseFieldValue::DateTime(dt) => Value::Text(format!(
            "{:04}-{:02}-{:02}",
            dt.date().year(),
            dt.date().month(),
            dt.date().day()
        )),
        DbaseFieldValue::Double(d) => Value::Float(*d),
        DbaseFieldValue::Memo(s) => Value::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_supported_extensions() {
        assert_eq!(ShapefileReader.supported_extensions(), &["shp"]);
        assert_eq!(ShapefileReader.format_name(), "Shapefile");
    }

    #[test]
    fn test_missing_components() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("countries.shp");
        fs::write(&path, b"").unwrap();

        let err = ShapefileReader.read(&path).err().unwrap();
        let message = err.to_string();
        assert!(message.contains(".shx"));
        assert!(message.contains(".dbf"));
    }

    fn write_countries(path: &Path) {
        use ::shapefile::dbase::{FieldName, Record, TableWriterBuilder};

        let fields = TableWriterBuilder::new()
            .add_character_field(FieldName::try_from("NAME").unwrap(), 40)
            .add_numeric_field(FieldName::try_from("POP_EST").unwrap(), 12, 0)
            .add_character_field(FieldName::try_from("CONTINENT").unwrap(), 20);

        let mut writer = ::shapefile::Writer::from_path(path, fields).unwrap();
        for (name, pop, continent, x) in
            [("Chile", 19.0, "South America", -70.0), ("Japan", 125.0, "Asia", 139.0)]
        {
            let mut record = Record::default();
            record.insert("NAME".to_string(), DbaseFieldValue::Character(Some(name.to_string())));
            record.insert("POP_EST".to_string(), DbaseFieldValue::Numeric(Some(pop)));
            record.insert(
                "CONTINENT".to_string(),
                DbaseFieldValue::Character(Some(continent.to_string())),
            );
            writer.write_shape_and_record(&::shapefile::Point::new(x, 0.0), &record).unwrap();
        }
    }

    #[test]
    fn test_columns_keep_field_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("countries.shp");
        write_countries(&path);

        let table = read_shapefile(&path).unwrap();

        assert_eq!(table.attributes().columns(), &["NAME", "POP_EST", "CONTINENT"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(1, "NAME").unwrap(), &Value::from("Japan"));
        assert_eq!(table.value(1, "CONTINENT").unwrap(), &Value::from("Asia"));
        assert_eq!(table.geometries()[0], Geometry::Point(Point::new(-70.0, 0.0)));
        assert_eq!(table.crs(), &Crs::wgs84());
    }

    #[test]
    fn test_parse_epsg_from_wkt() {
        let wkt = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],AUTHORITY["EPSG","4326"]]"#;
        assert_eq!(parse_epsg_from_wkt(wkt), Some(4326));
        assert_eq!(parse_epsg_from_wkt("EPSG:3857"), Some(3857));
        assert_eq!(parse_epsg_from_wkt(r#"GEOGCS["GCS_WGS_1984"]"#), None);
    }

    #[test]
    fn test_rings_grouped_into_polygons() {
        let square = |x: f64| {
            LineString::from(vec![(x, 0.0), (x + 1.0, 0.0), (x + 1.0, 1.0), (x, 1.0), (x, 0.0)])
        };

        let single = rings_to_geometry(vec![(true, square(0.0)), (false, square(0.25))]);
        match single {
            Geometry::Polygon(p) => assert_eq!(p.interiors().len(), 1),
            other => panic!("Expected polygon, got {:?}", other),
        }

        let multi = rings_to_geometry(vec![(true, square(0.0)), (true, square(5.0))]);
        assert!(matches!(multi, Geometry::MultiPolygon(ref mp) if mp.0.len() == 2));
    }
}
