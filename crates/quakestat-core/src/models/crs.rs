//! Coordinate reference system tags.

use crate::error::{QuakestatError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coordinate Reference System identified by EPSG code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
    pub name: String,
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Crs {
    pub fn new(epsg: u32, name: impl Into<String>) -> Self {
        Self { epsg, name: name.into() }
    }

    /// WGS 84 (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::new(4326, "WGS 84")
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::new(3857, "Web Mercator")
    }

    /// Known name for an EPSG code, falling back to the code itself
    pub fn from_epsg(epsg: u32) -> Self {
        match epsg {
            4326 => Self::wgs84(),
            3857 => Self::web_mercator(),
            other => Self::new(other, format!("EPSG:{}", other)),
        }
    }

    /// Whether coordinates are (longitude, latitude) in degrees
    pub fn is_geographic(&self) -> bool {
        self.epsg == 4326
    }

    /// Error unless both tags refer to the same EPSG code
    pub fn ensure_matches(&self, other: &Crs) -> Result<()> {
        if self.epsg != other.epsg {
            return Err(QuakestatError::CrsMismatch {
                left: self.to_string(),
                right: other.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{} ({})", self.epsg, self.name)
    }
}

impl FromStr for Crs {
    type Err = QuakestatError;

    /// Accepts `EPSG:4326`, `epsg:4326`, `urn:ogc:def:crs:EPSG::4326` or a bare `4326`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let code = trimmed
            .rsplit(':')
            .next()
            .filter(|_| trimmed.to_ascii_uppercase().contains("EPSG") || !trimmed.contains(':'))
            .unwrap_or("");

        code.parse::<u32>().map(Crs::from_epsg).map_err(|_| QuakestatError::ConfigInvalid {
            key: "crs".to_string(),
            reason: format!("Invalid CRS '{}'. Use an EPSG code such as EPSG:4326", s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!("EPSG:4326".parse::<Crs>().unwrap(), Crs::wgs84());
        assert_eq!("epsg:3857".parse::<Crs>().unwrap(), Crs::web_mercator());
        assert_eq!("urn:ogc:def:crs:EPSG::4326".parse::<Crs>().unwrap().epsg, 4326);
        assert_eq!("32748".parse::<Crs>().unwrap().epsg, 32748);
        assert!("WGS84".parse::<Crs>().is_err());
        assert!("OGC:CRS84".parse::<Crs>().is_err());
    }

    #[test]
    fn test_mismatch() {
        assert!(Crs::wgs84().ensure_matches(&Crs::wgs84()).is_ok());
        assert!(Crs::wgs84().ensure_matches(&Crs::web_mercator()).is_err());
    }
}
