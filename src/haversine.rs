//! Great-circle distance, nearest-node snapping and straight-line estimates.
//!
//! The straight-line estimator ignores roads. It exists for callers that
//! choose to show something when the routing service is unavailable.

use crate::coordinate::{Coordinate, RoadNode};
use crate::error::RouteError;
use crate::polyline;
use crate::route::{RouteResult, RouteStep};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points in meters.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.lat().to_radians();
    let lat2_rad = b.lat().to_radians();
    let delta_lat = (b.lat() - a.lat()).to_radians();
    let delta_lon = (b.lon() - a.lon()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for antipodal points.
    let h = h.min(1.0);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Returns the candidate closest to `point`, or `None` for no candidates.
///
/// Linear scan; on equal distances the earliest candidate wins.
pub fn nearest(point: Coordinate, candidates: &[RoadNode]) -> Option<RoadNode> {
    candidates
        .iter()
        .map(|node| (node, distance(point, node.position)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(node, _)| *node)
}

/// Straight-line route estimator.
///
/// Produces a [`RouteResult`] whose steps are the straight segments between
/// consecutive waypoints, timed at an assumed average speed.
#[derive(Debug, Clone)]
pub struct StraightLineEstimator {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for StraightLineEstimator {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl StraightLineEstimator {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Convert a distance in meters to travel time in seconds.
    fn meters_to_seconds(&self, meters: f64) -> f64 {
        let hours = meters / 1000.0 / self.speed_kmh;
        hours * 3600.0
    }

    pub fn estimate(&self, waypoints: &[Coordinate]) -> Result<RouteResult, RouteError> {
        if waypoints.len() < 2 {
            return Err(RouteError::InsufficientWaypoints {
                count: waypoints.len(),
            });
        }

        let steps: Vec<RouteStep> = waypoints
            .windows(2)
            .map(|pair| {
                let meters = distance(pair[0], pair[1]);
                RouteStep {
                    name: String::new(),
                    instruction: "Continue straight".to_string(),
                    distance_m: meters,
                    duration_s: self.meters_to_seconds(meters),
                    geometry: polyline::encode(pair),
                }
            })
            .collect();

        let total_m: f64 = steps.iter().map(|step| step.distance_m).sum();
        let total_s: f64 = steps.iter().map(|step| step.duration_s).sum();

        Ok(RouteResult::new(
            total_m / 1000.0,
            total_s / 60.0,
            steps,
            polyline::encode(waypoints),
            waypoints.to_vec(),
        ))
    }
}
