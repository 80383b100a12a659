use geo::Geometry;
use serde::{Deserialize, Serialize};

/// Country reported for a land point the geocoder could not name
pub const COUNTRY_NOT_FOUND: &str = "Country not found";

/// Country reported for points that are not on land
pub const UNKNOWN_COUNTRY: &str = "unknown";

/// Water body reported for a non-land point the geocoder could not name
pub const WATER_BODY_NOT_FOUND: &str = "Body of water not found";

/// What a reverse lookup knows about a coordinate
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocationInfo {
    pub country: Option<String>,
    pub water_body: Option<String>,
    pub location_type: Option<String>,
}

impl LocationInfo {
    pub fn land(country: Option<String>, location_type: impl Into<String>) -> Self {
        Self {
            country: Some(country.unwrap_or_else(|| COUNTRY_NOT_FOUND.to_string())),
            water_body: None,
            location_type: Some(location_type.into()),
        }
    }

    pub fn water(water_body: Option<String>, location_type: impl Into<String>) -> Self {
        Self {
            country: Some(UNKNOWN_COUNTRY.to_string()),
            water_body: Some(water_body.unwrap_or_else(|| WATER_BODY_NOT_FOUND.to_string())),
            location_type: Some(location_type.into()),
        }
    }

    /// Result of a lookup that failed outright
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_land(&self) -> bool {
        self.water_body.is_none() && self.country.as_deref() != Some(UNKNOWN_COUNTRY)
    }
}

/// Port for reverse and forward geocoding
///
/// Implementations never fail: lookup problems surface as the sentinel
/// values above, so callers can annotate whole tables without aborting.
pub trait Geocoder {
    /// Country name at a coordinate, or [`COUNTRY_NOT_FOUND`]
    fn country_at(&self, lat: f64, lon: f64) -> String;

    /// Country, water body and place type at a coordinate
    fn location_info(&self, lat: f64, lon: f64) -> LocationInfo;

    /// Boundary geometry for a place name
    fn geometry_for(&self, name: &str) -> Option<Geometry<f64>>;
}
