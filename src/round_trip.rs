//! Round-trip assembly: an outbound and a return leg computed independently.

use rayon::prelude::*;
use tracing::warn;

use crate::coordinate::Coordinate;
use crate::route::RoundTripRoute;
use crate::router::RouteComputer;
use crate::traits::{RoadNodeSource, RoutingService};

impl<N, R> RouteComputer<N, R>
where
    N: RoadNodeSource,
    R: RoutingService,
{
    /// Computes `origin -> destination` and `destination -> origin`.
    ///
    /// Always returns a route; a leg that fails is left out and its error
    /// recorded in [`RoundTripRoute::failures`]. Whether a partial trip is
    /// acceptable is the caller's decision.
    pub fn compute_round_trip(&self, origin: Coordinate, destination: Coordinate) -> RoundTripRoute {
        let outbound = self.compute_route(&[origin, destination], false);
        let inbound = self.compute_route(&[destination, origin], false);

        let trip = RoundTripRoute::new(outbound, inbound);
        for failure in trip.failures() {
            warn!(leg = ?failure.leg, error = %failure.error, "round-trip leg failed");
        }
        trip
    }
}

impl<N, R> RouteComputer<N, R>
where
    N: RoadNodeSource + Sync,
    R: RoutingService + Sync,
{
    /// Round trips from `origin` to each destination, computed in parallel.
    ///
    /// Output order matches `destinations`. Each trip is still computed as
    /// its own sequential chain of calls.
    pub fn compute_round_trips(&self, origin: Coordinate, destinations: &[Coordinate]) -> Vec<RoundTripRoute> {
        destinations
            .par_iter()
            .map(|destination| self.compute_round_trip(origin, *destination))
            .collect()
    }
}
