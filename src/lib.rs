//! route-planner: delivery route computation
//!
//! Geocodes addresses, snaps waypoints to the road network, requests driving
//! routes and assembles outbound/return legs for package deliveries.

pub mod coordinate;
pub mod error;
pub mod traits;
pub mod haversine;
pub mod polyline;
pub mod route;
pub mod router;
pub mod round_trip;
pub mod nominatim;
pub mod overpass;
pub mod osrm;
pub mod osrm_data;

pub use coordinate::{Bounds, Coordinate, RoadNode};
pub use error::RouteError;
pub use route::{LegKind, RoundTripRoute, RouteResult, RouteStep};
pub use router::{RouteComputer, RouteOptions};
