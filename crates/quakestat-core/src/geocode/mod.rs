//! Geocoder adapters and table annotation.

pub mod nominatim;

pub use nominatim::NominatimGeocoder;

use crate::error::Result;
use crate::models::{Table, Value};
use crate::ports::geocoder::{Geocoder, LocationInfo, COUNTRY_NOT_FOUND};
use geo::{Contains, Geometry, Point};

/// Name of the column appended by [`annotate_countries`]
pub const COUNTRY_COLUMN: &str = "country";

/// In-memory geocoder over named regions
///
/// Points inside a land region resolve to its name; points inside a water
/// region resolve to a water body. Anything else is land without a country.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    land: Vec<(String, Geometry<f64>)>,
    water: Vec<(String, Geometry<f64>)>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_country(mut self, name: impl Into<String>, geometry: impl Into<Geometry<f64>>) -> Self {
        self.land.push((name.into(), geometry.into()));
        self
    }

    pub fn with_water_body(
        mut self,
        name: impl Into<String>,
        geometry: impl Into<Geometry<f64>>,
    ) -> Self {
        self.water.push((name.into(), geometry.into()));
        self
    }

    fn lookup<'a>(regions: &'a [(String, Geometry<f64>)], lat: f64, lon: f64) -> Option<&'a str> {
        let point = Point::new(lon, lat);
        regions
            .iter()
            .find(|(_, geometry)| geometry.contains(&point))
            .map(|(name, _)| name.as_str())
    }
}

impl Geocoder for StaticGeocoder {
    fn country_at(&self, lat: f64, lon: f64) -> String {
        Self::lookup(&self.land, lat, lon).unwrap_or(COUNTRY_NOT_FOUND).to_string()
    }

    fn location_info(&self, lat: f64, lon: f64) -> LocationInfo {
        match Self::lookup(&self.water, lat, lon) {
            Some(water_body) => LocationInfo::water(Some(water_body.to_string()), "water"),
            None => LocationInfo::land(Self::lookup(&self.land, lat, lon).map(String::from), "land"),
        }
    }

    fn geometry_for(&self, name: &str) -> Option<Geometry<f64>> {
        self.land
            .iter()
            .chain(&self.water)
            .find(|(region, _)| region.eq_ignore_ascii_case(name))
            .map(|(_, geometry)| geometry.clone())
    }
}

/// Append a `country` column naming the country at each row's coordinate
///
/// Coordinates must be numeric; lookup failures become the geocoder's
/// sentinel values rather than errors.
pub fn annotate_countries(
    table: Table,
    lat_column: &str,
    lon_column: &str,
    geocoder: &dyn Geocoder,
) -> Result<Table> {
    let lat_index = table.column_index(lat_column)?;
    let lon_index = table.column_index(lon_column)?;

    let countries = table
        .rows()
        .iter()
        .enumerate()
        .map(|(row, values)| {
            let lat = values[lat_index].as_coordinate(row, lat_column)?;
            let lon = values[lon_index].as_coordinate(row, lon_column)?;
            Ok(Value::Text(geocoder.country_at(lat, lon)))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!("Annotated {} rows with countries", countries.len());
    table.with_column(COUNTRY_COLUMN, countries)
}
