//! File formats for the external data sources
//!
//! Vector datasets (country polygons, earthquake points) are read through the
//! `VectorReader` trait; the `FormatRegistry` picks a reader by file
//! extension. Plain tables go through the CSV helpers.

use std::path::Path;

use crate::error::{QuakestatError, Result};
use crate::models::GeoTable;

pub mod csv;
pub mod geojson;
pub mod shapefile;

pub use self::csv::{read_csv, write_csv};
pub use self::geojson::{read_geojson, write_geojson, GeoJsonReader};
pub use self::shapefile::{read_shapefile, ShapefileReader};

/// Reader for a vector dataset format
pub trait VectorReader {
    /// Read the whole dataset into memory
    fn read(&self, path: &Path) -> Result<GeoTable>;

    /// Supported file extensions (e.g. ["shp"])
    fn supported_extensions(&self) -> &[&str];

    /// Human-readable format name
    fn format_name(&self) -> &str;
}

/// Registry of vector readers, dispatching on file extension
pub struct FormatRegistry {
    readers: Vec<Box<dyn VectorReader>>,
}

impl FormatRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { readers: Vec::new() }
    }

    /// Registry with the GeoJSON and Shapefile readers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(GeoJsonReader));
        registry.register(Box::new(ShapefileReader));
        registry
    }

    pub fn register(&mut self, reader: Box<dyn VectorReader>) {
        self.readers.push(reader);
    }

    /// Find the reader for a path by its extension
    pub fn detect_format(&self, path: &Path) -> Result<&dyn VectorReader> {
        let extension = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            QuakestatError::UnsupportedFormat {
                extension: "none".to_string(),
                supported: self.supported_formats(),
            }
        })?;

        self.readers
            .iter()
            .find(|r| r.supported_extensions().iter().any(|e| e.eq_ignore_ascii_case(extension)))
            .map(|r| r.as_ref())
            .ok_or_else(|| QuakestatError::UnsupportedFormat {
                extension: extension.to_string(),
                supported: self.supported_formats(),
            })
    }

    /// All extensions handled by registered readers
    pub fn supported_formats(&self) -> Vec<String> {
        self.readers
            .iter()
            .flat_map(|r| r.supported_extensions())
            .map(|s| s.to_string())
            .collect()
    }

    /// Read a vector dataset with the matching reader
    pub fn read(&self, path: &Path) -> Result<GeoTable> {
        let reader = self.detect_format(path)?;
        tracing::debug!("Reading {} as {}", path.display(), reader.format_name());
        reader.read(path)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Read a GeoJSON or Shapefile dataset
pub fn read_vector(path: &Path) -> Result<GeoTable> {
    FormatRegistry::with_defaults().read(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_formats() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.supported_formats(), vec!["geojson", "json", "shp"]);
    }

    #[test]
    fn test_format_detection() {
        let registry = FormatRegistry::with_defaults();

        let reader = registry.detect_format(Path::new("countries.shp")).unwrap();
        assert_eq!(reader.format_name(), "Shapefile");

        let reader = registry.detect_format(Path::new("quakes.GeoJSON")).unwrap();
        assert_eq!(reader.format_name(), "GeoJSON");
    }

    #[test]
    fn test_unsupported_format() {
        let registry = FormatRegistry::with_defaults();
        let err = registry.detect_format(Path::new("quakes.kml")).err().unwrap();
        assert!(matches!(err, QuakestatError::UnsupportedFormat { .. }));
        assert!(registry.detect_format(Path::new("no_extension")).is_err());
    }
}
