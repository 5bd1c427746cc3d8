//! Coordinate Reference System handling

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System identifier.
///
/// Gridstat does not reproject; the CRS is carried as metadata and compared
/// when two rasters must share a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    /// EPSG code if known
    epsg: Option<u32>,
    /// WKT representation if known
    wkt: Option<String>,
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            epsg: Some(code),
            wkt: None,
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            epsg: None,
            wkt: Some(wkt.into()),
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get WKT representation
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Check if two CRS are equivalent.
    ///
    /// EPSG codes compare exactly; WKT comparison is textual and therefore
    /// conservative (different spellings of the same CRS compare unequal).
    pub fn is_equivalent(&self, other: &Crs) -> bool {
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.wkt, &other.wkt) {
            return a == b;
        }
        false
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.epsg {
            write!(f, "EPSG:{}", code)
        } else if let Some(wkt) = &self.wkt {
            // WKT strings are long; show the leading name only
            let head = wkt.split(',').next().unwrap_or(wkt);
            write!(f, "{}", head)
        } else {
            write!(f, "unknown CRS")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsg_equivalence() {
        assert!(Crs::from_epsg(32630).is_equivalent(&Crs::from_epsg(32630)));
        assert!(!Crs::from_epsg(32630).is_equivalent(&Crs::wgs84()));
    }

    #[test]
    fn test_wkt_equivalence() {
        let a = Crs::from_wkt("PROJCS[\"WGS 84 / UTM zone 30N\"]");
        let b = Crs::from_wkt("PROJCS[\"WGS 84 / UTM zone 30N\"]");
        assert!(a.is_equivalent(&b));
    }

    #[test]
    fn test_mixed_representation_not_equivalent() {
        let a = Crs::from_epsg(4326);
        let b = Crs::from_wkt("GEOGCS[\"WGS 84\"]");
        assert!(!a.is_equivalent(&b));
    }

    #[test]
    fn test_accessors() {
        let crs = Crs::from_epsg(4326);
        assert_eq!(crs.epsg(), Some(4326));
        assert_eq!(crs.wkt(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Crs::from_epsg(4326).to_string(), "EPSG:4326");
        assert_eq!(
            Crs::from_wkt("PROJCS[\"WGS 84 / UTM zone 30N\"").to_string(),
            "PROJCS[\"WGS 84 / UTM zone 30N\""
        );
    }
}
