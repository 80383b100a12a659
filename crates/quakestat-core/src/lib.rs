//! quakestat core - Tabular models, file formats, consolidation, and configuration
//!
//! This crate holds the data model shared by the geospatial operations and
//! the CLI, plus the port definition for the geocoding capability.

pub mod calendar;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod formats;
pub mod geocode;
pub mod models;
pub mod ports;

pub use error::{QuakestatError, Result};
