//! Attribute table paired with one geometry per row.

use super::crs::Crs;
use super::table::Table;
use super::value::Value;
use crate::error::{QuakestatError, Result};
use geo::Geometry;
use std::sync::Arc;

/// A table of features: attributes, geometries and the CRS they are expressed in
///
/// The attribute table is reference counted. Replacing the geometry column
/// (see [`GeoTable::with_geometries`]) produces a new table that shares the
/// attributes with its source instead of copying them.
#[derive(Debug, Clone)]
pub struct GeoTable {
    attributes: Arc<Table>,
    geometries: Vec<Geometry<f64>>,
    crs: Crs,
}

impl GeoTable {
    /// Pair attributes with geometries. Both must have the same number of rows.
    pub fn new(attributes: Table, geometries: Vec<Geometry<f64>>, crs: Crs) -> Result<Self> {
        Self::from_shared(Arc::new(attributes), geometries, crs)
    }

    pub fn from_shared(
        attributes: Arc<Table>,
        geometries: Vec<Geometry<f64>>,
        crs: Crs,
    ) -> Result<Self> {
        if attributes.len() != geometries.len() {
            return Err(QuakestatError::invalid_parameter(
                "geometries",
                format!(
                    "{} geometries for {} attribute rows",
                    geometries.len(),
                    attributes.len()
                ),
            ));
        }
        Ok(Self { attributes, geometries, crs })
    }

    pub fn attributes(&self) -> &Table {
        &self.attributes
    }

    pub fn shared_attributes(&self) -> &Arc<Table> {
        &self.attributes
    }

    pub fn geometries(&self) -> &[Geometry<f64>] {
        &self.geometries
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Attribute value of a row
    pub fn value(&self, row: usize, column: &str) -> Result<&Value> {
        self.attributes.value(row, column)
    }

    /// Copy of this table with the geometry column replaced
    pub fn with_geometries(&self, geometries: Vec<Geometry<f64>>) -> Result<Self> {
        Self::from_shared(Arc::clone(&self.attributes), geometries, self.crs.clone())
    }

    /// Iterate over `(row index, attribute row, geometry)`
    pub fn features(&self) -> impl Iterator<Item = (usize, &[Value], &Geometry<f64>)> + '_ {
        self.attributes
            .rows()
            .iter()
            .zip(&self.geometries)
            .enumerate()
            .map(|(i, (row, geom))| (i, row.as_slice(), geom))
    }
}
