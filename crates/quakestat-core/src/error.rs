//! Error types for quakestat

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuakestatError {
    // Input-shape errors
    #[error("Column not found: {column} (available: {available})")]
    ColumnNotFound { column: String, available: String },

    #[error("Invalid coordinate at row {row}, column {column}: {value:?}")]
    InvalidCoordinate {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Invalid geometry at row {row}: {reason}")]
    InvalidGeometry { row: usize, reason: String },

    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("No input files matched in {path}")]
    NoInputFiles { path: PathBuf },

    #[error("CRS mismatch: left has {left}, right has {right}")]
    CrsMismatch { left: String, right: String },

    // Format errors
    #[error("Unsupported format '{extension}'. Supported: {}", supported.join(", "))]
    UnsupportedFormat {
        extension: String,
        supported: Vec<String>,
    },

    #[error("{format} error: {message}")]
    FormatError { format: String, message: String },

    // Geocoder errors (never leave the geocoder adapter)
    #[error("Geocoder unavailable: {reason}")]
    GeocoderUnavailable { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QuakestatError {
    /// Shorthand for a missing column, listing the columns that do exist
    pub fn column_not_found(column: &str, available: &[String]) -> Self {
        QuakestatError::ColumnNotFound {
            column: column.to_string(),
            available: available.join(", "),
        }
    }

    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        QuakestatError::InvalidParameter { name: name.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, QuakestatError>;
