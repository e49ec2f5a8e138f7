//! Route computer: snap waypoints to the road network, then route them.

use tracing::{debug, info, instrument, warn};

use crate::coordinate::{Bounds, Coordinate};
use crate::error::RouteError;
use crate::haversine;
use crate::route::RouteResult;
use crate::traits::{RoadNodeSource, RoutingService};

#[derive(Debug, Clone)]
pub struct RouteOptions {
    /// Search radius for road nodes around each waypoint, in meters.
    pub snap_radius_m: f64,
    /// Decimals kept for leg distances in kilometers.
    pub distance_decimals: u32,
    /// Decimals kept for leg durations in minutes.
    pub duration_decimals: u32,
    /// Waypoints outside this area are logged but still routed.
    pub service_area: Option<Bounds>,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            snap_radius_m: 50.0,
            distance_decimals: 2,
            duration_decimals: 1,
            service_area: None,
        }
    }
}

/// Computes driving routes through ordered waypoints.
///
/// Each computation is a fixed sequence of blocking calls: one map-data
/// query per waypoint, then one routing request. Nothing is cached or
/// retried, and no state is shared between calls.
#[derive(Debug, Clone)]
pub struct RouteComputer<N, R> {
    nodes: N,
    router: R,
    options: RouteOptions,
}

impl<N, R> RouteComputer<N, R>
where
    N: RoadNodeSource,
    R: RoutingService,
{
    pub fn new(nodes: N, router: R) -> Self {
        Self::with_options(nodes, router, RouteOptions::default())
    }

    pub fn with_options(nodes: N, router: R, options: RouteOptions) -> Self {
        Self {
            nodes,
            router,
            options,
        }
    }

    pub fn options(&self) -> &RouteOptions {
        &self.options
    }

    /// Routes through `waypoints` in order. With `round_trip`, the first
    /// waypoint is appended again to close the loop.
    #[instrument(skip(self, waypoints), fields(waypoints = waypoints.len()))]
    pub fn compute_route(&self, waypoints: &[Coordinate], round_trip: bool) -> Result<RouteResult, RouteError> {
        let mut points = waypoints.to_vec();
        if round_trip {
            if let Some(first) = waypoints.first() {
                points.push(*first);
            }
        }
        if points.len() < 2 {
            return Err(RouteError::InsufficientWaypoints { count: points.len() });
        }

        let snapped: Vec<Coordinate> = points.iter().map(|point| self.snap(*point)).collect();
        let route = self.router.driving_route(&snapped)?;

        let distance_km = round_to(route.distance_m / 1000.0, self.options.distance_decimals);
        let duration_min = round_to(route.duration_s / 60.0, self.options.duration_decimals);
        info!(distance_km, duration_min, steps = route.steps.len(), "route computed");

        Ok(RouteResult::new(
            distance_km,
            duration_min,
            route.steps,
            route.geometry,
            snapped,
        ))
    }

    /// Nearest road node to `point`, or `point` itself when none is found
    /// or the map-data query fails.
    fn snap(&self, point: Coordinate) -> Coordinate {
        if let Some(area) = &self.options.service_area {
            if !area.contains(point) {
                warn!(lat = point.lat(), lon = point.lon(), "waypoint outside service area");
            }
        }

        let candidates = match self.nodes.nodes_near(point, self.options.snap_radius_m) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(error = %err, "map-data query failed, using raw waypoint");
                return point;
            }
        };

        match haversine::nearest(point, &candidates) {
            Some(node) => {
                debug!(
                    node = node.id,
                    offset_m = haversine::distance(point, node.position),
                    "snapped waypoint"
                );
                node.position
            }
            None => {
                debug!(lat = point.lat(), lon = point.lon(), "no road nodes nearby, using raw waypoint");
                point
            }
        }
    }
}

/// Rounds half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
