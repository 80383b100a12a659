//! Nominatim / OpenStreetMap geocoder.
//!
//! Reverse lookups use `/reverse`, name lookups use `/search` with polygon
//! output. Results are always requested in English. The public instance
//! allows one request per second; callers annotating many rows should point
//! `base_url` at their own instance.

use crate::error::{QuakestatError, Result};
use crate::ports::geocoder::{Geocoder, LocationInfo, COUNTRY_NOT_FOUND};
use geo::Geometry;

/// Geocoder backed by a Nominatim HTTP endpoint
pub struct NominatimGeocoder {
    /// Base URL (e.g., "https://nominatim.openstreetmap.org")
    base_url: String,

    /// HTTP client carrying the user agent Nominatim requires
    client: reqwest::Client,

    /// Runtime driving the client; pooled connections stay bound to it
    runtime: tokio::runtime::Runtime,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to configure HTTP client ({}), using defaults", e);
                reqwest::Client::new()
            });

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| QuakestatError::GeocoderUnavailable {
                reason: format!("Failed to create async runtime: {}", e),
            })?;

        Ok(Self { base_url: base_url.into().trim_end_matches('/').to_string(), client, runtime })
    }

    /// The public OpenStreetMap instance
    pub fn public(user_agent: &str) -> Result<Self> {
        Self::new("https://nominatim.openstreetmap.org", user_agent)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json(&self, endpoint: &str, query: &[(&str, String)]) -> Result<serde_json::Value> {
        self.runtime.block_on(async {
            let response = self
                .client
                .get(format!("{}/{}", self.base_url, endpoint))
                .query(query)
                .send()
                .await
                .map_err(|e| QuakestatError::GeocoderUnavailable {
                    reason: format!("Failed to connect to {}: {}", self.base_url, e),
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                return Err(QuakestatError::GeocoderUnavailable {
                    reason: format!("Nominatim API error ({}): {}", status, error_text),
                });
            }

            response.json().await.map_err(|e| QuakestatError::GeocoderUnavailable {
                reason: format!("Failed to parse Nominatim response: {}", e),
            })
        })
    }

    fn reverse(&self, lat: f64, lon: f64) -> Result<serde_json::Value> {
        self.get_json(
            "reverse",
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "jsonv2".to_string()),
                ("accept-language", "en".to_string()),
            ],
        )
    }
}

impl Geocoder for NominatimGeocoder {
    fn country_at(&self, lat: f64, lon: f64) -> String {
        match self.reverse(lat, lon) {
            Ok(body) => parse_country(&body),
            Err(e) => {
                tracing::warn!("Reverse lookup of ({}, {}) failed: {}", lat, lon, e);
                COUNTRY_NOT_FOUND.to_string()
            }
        }
    }

    fn location_info(&self, lat: f64, lon: f64) -> LocationInfo {
        match self.reverse(lat, lon).and_then(|body| parse_location(&body)) {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!("Location lookup of ({}, {}) failed: {}", lat, lon, e);
                LocationInfo::unavailable()
            }
        }
    }

    fn geometry_for(&self, name: &str) -> Option<Geometry<f64>> {
        let query = [
            ("q", name.to_string()),
            ("format", "jsonv2".to_string()),
            ("polygon_geojson", "1".to_string()),
            ("limit", "1".to_string()),
            ("accept-language", "en".to_string()),
        ];

        match self.get_json("search", &query).and_then(|body| parse_search_geometry(&body)) {
            Ok(geometry) => geometry,
            Err(e) => {
                tracing::warn!("Lookup of '{}' failed: {}", name, e);
                None
            }
        }
    }
}

/// Country from a reverse response; a response without an address names no country
fn parse_country(body: &serde_json::Value) -> String {
    body.get("address")
        .and_then(|address| address.get("country"))
        .and_then(|country| country.as_str())
        .map(String::from)
        .unwrap_or_else(|| COUNTRY_NOT_FOUND.to_string())
}

/// Location details from a reverse response
fn parse_location(body: &serde_json::Value) -> Result<LocationInfo> {
    if let Some(error) = body.get("error").and_then(|e| e.as_str()) {
        return Err(QuakestatError::GeocoderUnavailable { reason: error.to_string() });
    }

    let address = body.get("address").ok_or_else(|| QuakestatError::GeocoderUnavailable {
        reason: "Missing address in Nominatim response".to_string(),
    })?;

    let location_type = body.get("type").and_then(|t| t.as_str()).unwrap_or_default();
    let field = |key: &str| address.get(key).and_then(|v| v.as_str()).map(String::from);

    if location_type == "land" {
        Ok(LocationInfo::land(field("country"), location_type))
    } else {
        Ok(LocationInfo::water(field("ocean"), location_type))
    }
}

/// Boundary geometry of the first search hit
fn parse_search_geometry(body: &serde_json::Value) -> Result<Option<Geometry<f64>>> {
    let results = body.as_array().ok_or_else(|| QuakestatError::GeocoderUnavailable {
        reason: "Nominatim search response is not an array".to_string(),
    })?;

    let Some(shape) = results.first().and_then(|first| first.get("geojson")) else {
        return Ok(None);
    };

    let geometry = geojson::Geometry::from_json_value(shape.clone()).map_err(|e| {
        QuakestatError::GeocoderUnavailable { reason: format!("Invalid geometry: {}", e) }
    })?;

    Geometry::<f64>::try_from(geometry).map(Some).map_err(|e| {
        QuakestatError::GeocoderUnavailable { reason: format!("Invalid geometry: {}", e) }
    })
}
