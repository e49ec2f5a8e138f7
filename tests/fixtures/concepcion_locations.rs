//! Real Concepción / Talcahuano locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap via Nominatim.

#![allow(dead_code)]

use route_planner::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng).expect("fixture coordinates are valid")
    }
}

/// Dispatch point used as the origin of every delivery.
pub const DEPOT: Location = Location::new("Universidad de Concepción", -36.8302049, -73.0372293);

pub const DELIVERIES: &[Location] = &[
    Location::new("Edmundo Larenas", -36.8296, -73.0415),
    Location::new("Plaza de la Independencia", -36.8270, -73.0503),
    Location::new("Mall del Centro", -36.8275, -73.0530),
    Location::new("Estación Concepción", -36.8333, -73.0611),
    Location::new("Parque Ecuador", -36.8320, -73.0470),
    Location::new("Hospital Regional", -36.8173, -73.0422),
    Location::new("Costanera Biobío", -36.8380, -73.0650),
    Location::new("Talcahuano Puerto", -36.7167, -73.1167),
];

/// Pair used by the round-trip aggregation check.
pub const SHORT_TRIP: (Location, Location) = (
    Location::new("Origin", -36.83, -73.03),
    Location::new("Destination", -36.84, -73.05),
);
