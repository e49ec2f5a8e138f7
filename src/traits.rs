//! Seams to the external services a route computation depends on.
//!
//! The HTTP adapters in [`crate::nominatim`], [`crate::overpass`] and
//! [`crate::osrm`] implement these; tests and callers may substitute their own.

use crate::coordinate::{Coordinate, RoadNode};
use crate::error::RouteError;
use crate::route::DrivingRoute;

/// Resolves free-text addresses to coordinates.
pub trait Geocoder {
    /// Returns `Ok(None)` when the service has no match for `address`.
    ///
    /// Exactly one external call per invocation; timeouts surface as
    /// [`RouteError::GeocodingTimeout`].
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, RouteError>;
}

/// Supplies road-network nodes near a point.
pub trait RoadNodeSource {
    /// An empty vector means no roads within `radius_m`; it is not an error.
    fn nodes_near(&self, point: Coordinate, radius_m: f64) -> Result<Vec<RoadNode>, RouteError>;
}

/// Computes a driving route through an ordered list of coordinates.
pub trait RoutingService {
    /// Fails with [`RouteError::RouteComputationFailed`] on transport errors
    /// or when the service returns no routes.
    fn driving_route(&self, coordinates: &[Coordinate]) -> Result<DrivingRoute, RouteError>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, RouteError> {
        (**self).geocode(address)
    }
}

impl<T: RoadNodeSource + ?Sized> RoadNodeSource for &T {
    fn nodes_near(&self, point: Coordinate, radius_m: f64) -> Result<Vec<RoadNode>, RouteError> {
        (**self).nodes_near(point, radius_m)
    }
}

impl<T: RoutingService + ?Sized> RoutingService for &T {
    fn driving_route(&self, coordinates: &[Coordinate]) -> Result<DrivingRoute, RouteError> {
        (**self).driving_route(coordinates)
    }
}

/// Geocodes `address`, substituting `fallback` when there is no match.
///
/// Timeouts and transport failures are still returned as errors; only the
/// not-found outcome is replaced.
pub fn geocode_or<G: Geocoder + ?Sized>(
    geocoder: &G,
    address: &str,
    fallback: Coordinate,
) -> Result<Coordinate, RouteError> {
    Ok(geocoder.geocode(address)?.unwrap_or(fallback))
}

/// Geocodes `address`, turning a missing match into
/// [`RouteError::GeocodingNotFound`].
pub fn geocode_required<G: Geocoder + ?Sized>(geocoder: &G, address: &str) -> Result<Coordinate, RouteError> {
    geocoder
        .geocode(address)?
        .ok_or_else(|| RouteError::GeocodingNotFound {
            address: address.to_string(),
        })
}
