//! Test fixtures for route-planner.
//!
//! Provides:
//! - Real Concepción (Biobío, Chile) locations from OpenStreetMap
//! - In-memory stand-ins for the map-data and routing services

pub mod concepcion_locations;
pub mod stubs;

pub use concepcion_locations::*;
pub use stubs::*;
