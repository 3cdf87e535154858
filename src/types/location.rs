//! Geographic types: coordinates, the town a chart is requested for, and the map
//! bounding box used for station lookups.

use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// ```
/// use climate_archive::LatLon;
///
/// let bordeaux = LatLon(44.8378, -0.5792);
/// assert_eq!(bordeaux.0, 44.8378);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

/// A town picked by the user, as returned by the geocoding collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Town {
    pub name: String,
    /// Second-level administrative area (département), used to tell homonyms apart.
    pub admin2: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Town {
    pub fn new(name: impl Into<String>, admin2: impl Into<String>, location: LatLon) -> Self {
        Self {
            name: name.into(),
            admin2: admin2.into(),
            latitude: location.0,
            longitude: location.1,
        }
    }

    /// Key under which this town's series are cached, e.g. `"Bordeaux - Gironde"`.
    pub fn key(&self) -> String {
        format!("{} - {}", self.name, self.admin2)
    }

    pub fn location(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }
}

/// A rectangular map viewport in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Query value in `west,south,east,north` order.
    pub fn to_query(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }

    pub fn contains(&self, point: LatLon) -> bool {
        (self.south..=self.north).contains(&point.0) && (self.west..=self.east).contains(&point.1)
    }
}
