//! Geographic value types shared by every stage of route computation.

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

/// A validated (latitude, longitude) pair in degrees.
///
/// Latitude lies in [-90, 90] and longitude in [-180, 180]. The type is
/// `Copy` and has no setters; a different position is a different value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting values outside the valid ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, RouteError> {
        let lat_ok = (-90.0..=90.0).contains(&lat);
        let lon_ok = (-180.0..=180.0).contains(&lon);
        if lat_ok && lon_ok {
            Ok(Self { lat, lon })
        } else {
            Err(RouteError::InvalidCoordinate { lat, lon })
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// The `[lat, lng]` pair used by map front-ends.
    pub fn to_pair(self) -> [f64; 2] {
        [self.lat, self.lon]
    }

    /// OSRM path segment format: `lon,lat` with 6 decimals.
    pub(crate) fn to_lon_lat(self) -> String {
        format!("{:.6},{:.6}", self.lon, self.lat)
    }
}

impl TryFrom<(f64, f64)> for Coordinate {
    type Error = RouteError;

    fn try_from((lat, lon): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(lat, lon)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coord: Coordinate) -> Self {
        (coord.lat, coord.lon)
    }
}

/// A road-network node returned by the map-data service, used for snapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadNode {
    pub id: u64,
    pub position: Coordinate,
}

impl RoadNode {
    pub fn new(id: u64, position: Coordinate) -> Self {
        Self { id, position }
    }
}

/// Rectangular service area. Waypoints outside it are still routed but
/// logged, since they usually mean a bad geocode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Continental Chile plus its Pacific islands.
    pub const CHILE: Bounds = Bounds {
        min_lat: -56.0,
        max_lat: -17.0,
        min_lon: -109.0,
        max_lon: -66.0,
    };

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }
}
