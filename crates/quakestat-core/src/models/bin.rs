//! World grid bins.

use geo::{coord, Rect};
use serde::{Deserialize, Serialize};

/// Edge length of a grid bin in degrees
pub const BIN_SIZE_DEGREES: f64 = 10.0;

/// Southern edge of the grid
pub const LAT_MIN: f64 = -90.0;

/// Northern edge of the grid (exclusive)
pub const LAT_MAX: f64 = 90.0;

/// Western edge of the grid
pub const LON_MIN: f64 = -180.0;

/// Eastern edge of the grid (exclusive)
pub const LON_MAX: f64 = 180.0;

/// A rectangular cell of the fixed global grid
///
/// `lat_index` counts latitude bands northwards from -90, `lon_index` counts
/// longitude bands eastwards from -180. The centre lies half a bin from the
/// band minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub id: String,
    pub lat_index: usize,
    pub lon_index: usize,
    pub bin_lat: f64,
    pub bin_lon: f64,
}

impl Bin {
    pub fn new(lat_index: usize, lon_index: usize) -> Self {
        let half = BIN_SIZE_DEGREES / 2.0;
        Self {
            id: Self::make_id(lat_index, lon_index),
            lat_index,
            lon_index,
            bin_lat: LAT_MIN + lat_index as f64 * BIN_SIZE_DEGREES + half,
            bin_lon: LON_MIN + lon_index as f64 * BIN_SIZE_DEGREES + half,
        }
    }

    /// Composite key `"{lat_index}_{lon_index}"`
    pub fn make_id(lat_index: usize, lon_index: usize) -> String {
        format!("{}_{}", lat_index, lon_index)
    }

    /// Band extent as a rectangle, x = longitude and y = latitude.
    /// The extent is half-open: the max edges belong to the neighbouring bin.
    pub fn bounds(&self) -> Rect<f64> {
        let min_lat = LAT_MIN + self.lat_index as f64 * BIN_SIZE_DEGREES;
        let min_lon = LON_MIN + self.lon_index as f64 * BIN_SIZE_DEGREES;
        Rect::new(
            coord! { x: min_lon, y: min_lat },
            coord! { x: min_lon + BIN_SIZE_DEGREES, y: min_lat + BIN_SIZE_DEGREES },
        )
    }

    pub fn to_polygon(&self) -> geo::Polygon<f64> {
        self.bounds().to_polygon()
    }
}
