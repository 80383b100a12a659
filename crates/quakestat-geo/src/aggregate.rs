//! Joining earthquake points onto country polygons and summarising per country.
//!
//! Both aggregations use the strict "within" predicate: a point on a border
//! belongs to neither side, and a point inside two overlapping polygons (as
//! happens with buffered borders) belongs to both.

use crate::index::PolygonIndex;
use crate::spatial::as_point;
use geo::Point;
use quakestat_core::models::{GeoTable, Table, Value};
use quakestat_core::{QuakestatError, Result};
use std::collections::{BTreeMap, HashMap};

/// Column holding the per-country maximum in [`max_magnitude_per_country`]
pub const MAX_MAGNITUDE_COLUMN: &str = "maximum magnitude of earthquake";

/// Name given to the country-name column in [`max_magnitude_per_country`]
pub const COUNTRY_COLUMN: &str = "country";

/// Border width named in the buffered count header
///
/// The header text is fixed; buffering by any other radius still produces it.
pub const BORDER_LABEL_DEGREES: f64 = 2.0;

/// Which countries appear in an aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinPolicy {
    /// Only countries with at least one matching point
    #[default]
    Inner,
    /// Every country; countries without matches get a null aggregate
    Left,
}

/// Column names and join policy for the aggregations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Country name column in the polygon tables
    pub name_column: String,
    /// Integer year column in the earthquake table
    pub year_column: String,
    /// Numeric magnitude column in the earthquake table
    pub magnitude_column: String,
    /// Policy for the per-year count. The maximum magnitude always keeps every country.
    pub join: JoinPolicy,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            name_column: "NAME".to_string(),
            year_column: "year".to_string(),
            magnitude_column: "magnitude".to_string(),
            join: JoinPolicy::Inner,
        }
    }
}

impl AggregateOptions {
    pub fn join(mut self, join: JoinPolicy) -> Self {
        self.join = join;
        self
    }
}

/// Header of the count column, e.g. `Earthquake count within 2deg border 2020`
pub fn count_column_name(year: i64, buffered: bool) -> String {
    if buffered {
        format!("Earthquake count within 2deg border {}", year)
    } else {
        format!("Earthquake count {}", year)
    }
}

/// Count the earthquakes of one year inside each country
///
/// Countries without any earthquake that year are left out. `buffered`
/// only changes the header of the count column.
pub fn count_in_country_year(
    countries: &GeoTable,
    earthquakes: &GeoTable,
    year: i64,
    buffered: bool,
) -> Result<Table> {
    count_in_country_year_with(countries, earthquakes, year, buffered, &AggregateOptions::default())
}

/// [`count_in_country_year`] with explicit column names and join policy
///
/// Rows are grouped by country name and ordered by name ascending. Years
/// match by exact integer equality; null or fractional years never match.
pub fn count_in_country_year_with(
    countries: &GeoTable,
    earthquakes: &GeoTable,
    year: i64,
    buffered: bool,
    options: &AggregateOptions,
) -> Result<Table> {
    countries.crs().ensure_matches(earthquakes.crs())?;

    let name_index = countries.attributes().column_index(&options.name_column)?;
    let year_index = earthquakes.attributes().column_index(&options.year_column)?;

    let index = PolygonIndex::build(countries);
    let mut groups: BTreeMap<String, (Value, Option<i64>)> = BTreeMap::new();

    if options.join == JoinPolicy::Left {
        for row in countries.attributes().rows() {
            if let Some(key) = row[name_index].group_key() {
                groups.entry(key).or_insert_with(|| (row[name_index].clone(), None));
            }
        }
    }

    let mut selected = 0usize;
    for (row, values, geometry) in earthquakes.features() {
        if values[year_index].as_i64() != Some(year) {
            continue;
        }
        selected += 1;

        let point = point_at(row, geometry)?;
        for country_row in index.containing(&point) {
            let name = &countries.attributes().rows()[country_row][name_index];
            if let Some(key) = name.group_key() {
                let entry = groups.entry(key).or_insert_with(|| (name.clone(), None));
                entry.1 = Some(entry.1.unwrap_or(0) + 1);
            }
        }
    }

    tracing::debug!("{} earthquakes in {}, joined against {} polygons", selected, year, index.len());

    let mut table = Table::new([options.name_column.clone(), count_column_name(year, buffered)])?;
    for (name, count) in groups.into_values() {
        table.push_row(vec![name, Value::from(count)])?;
    }

    tracing::info!("Counted earthquakes in {} for {} countries", year, table.len());
    Ok(table)
}

/// Largest earthquake magnitude per country
///
/// Earthquakes are joined against `countries_extended` (typically the
/// buffered countries); the result is merged by name onto the attributes of
/// `countries`. Every country row is kept in its original order, the name
/// column is renamed to `country`, and countries without earthquakes get a
/// null maximum.
pub fn max_magnitude_per_country(
    countries: &GeoTable,
    countries_extended: &GeoTable,
    earthquakes: &GeoTable,
) -> Result<Table> {
    max_magnitude_per_country_with(
        countries,
        countries_extended,
        earthquakes,
        &AggregateOptions::default(),
    )
}

/// [`max_magnitude_per_country`] with explicit column names
pub fn max_magnitude_per_country_with(
    countries: &GeoTable,
    countries_extended: &GeoTable,
    earthquakes: &GeoTable,
    options: &AggregateOptions,
) -> Result<Table> {
    countries_extended.crs().ensure_matches(earthquakes.crs())?;

    let base_name_index = countries.attributes().column_index(&options.name_column)?;
    let extended_name_index = countries_extended.attributes().column_index(&options.name_column)?;
    let magnitude_index = earthquakes.attributes().column_index(&options.magnitude_column)?;

    let index = PolygonIndex::build(countries_extended);
    let mut maxima: HashMap<String, f64> = HashMap::new();
    let mut unmatched = 0usize;

    for (row, values, geometry) in earthquakes.features() {
        let point = point_at(row, geometry)?;
        let matches = index.containing(&point);
        if matches.is_empty() {
            unmatched += 1;
            continue;
        }

        let Some(magnitude) = values[magnitude_index].as_f64() else {
            continue;
        };

        for country_row in matches {
            let name = &countries_extended.attributes().rows()[country_row][extended_name_index];
            if let Some(key) = name.group_key() {
                maxima
                    .entry(key)
                    .and_modify(|current| *current = current.max(magnitude))
                    .or_insert(magnitude);
            }
        }
    }

    tracing::debug!("{} earthquakes outside every extended country", unmatched);

    let base = countries.attributes();
    let mut columns = base.columns().to_vec();
    columns[base_name_index] = COUNTRY_COLUMN.to_string();
    columns.push(MAX_MAGNITUDE_COLUMN.to_string());

    let mut table = Table::new(columns)?;
    for row in base.rows() {
        let maximum = row[base_name_index]
            .group_key()
            .and_then(|key| maxima.get(&key).copied());

        let mut values = row.clone();
        values.push(Value::from(maximum));
        table.push_row(values)?;
    }

    tracing::info!("Maximum magnitude found for {} of {} countries", maxima.len(), table.len());
    Ok(table)
}

fn point_at(row: usize, geometry: &geo::Geometry<f64>) -> Result<Point<f64>> {
    as_point(geometry).ok_or_else(|| QuakestatError::InvalidGeometry {
        row,
        reason: "earthquake geometry must be a point".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_column_name() {
        assert_eq!(count_column_name(2020, false), "Earthquake count 2020");
        assert_eq!(count_column_name(2020, true), "Earthquake count within 2deg border 2020");
        assert_eq!(format!("{}deg", BORDER_LABEL_DEGREES), "2deg");
    }

    #[test]
    fn test_options_default() {
        let options = AggregateOptions::default();
        assert_eq!(options.name_column, "NAME");
        assert_eq!(options.year_column, "year");
        assert_eq!(options.magnitude_column, "magnitude");
        assert_eq!(options.join, JoinPolicy::Inner);
        assert_eq!(options.join(JoinPolicy::Left).join, JoinPolicy::Left);
    }
}
