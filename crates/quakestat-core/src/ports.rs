//! Port trait definitions
//!
//! These traits define the capabilities that adapters must implement.

pub mod geocoder;

pub use geocoder::{Geocoder, LocationInfo};
