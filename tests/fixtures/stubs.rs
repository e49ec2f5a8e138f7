//! In-memory collaborators with recorded calls.

#![allow(dead_code)]

use std::sync::Mutex;

use route_planner::coordinate::{Coordinate, RoadNode};
use route_planner::haversine;
use route_planner::polyline;
use route_planner::route::{DrivingRoute, RouteStep};
use route_planner::traits::{RoadNodeSource, RoutingService};
use route_planner::RouteError;

/// Degrees added to a waypoint's latitude to place fake road nodes.
pub const NEAR_OFFSET: f64 = 0.0001;
pub const FAR_OFFSET: f64 = 0.0004;

pub enum NodeMode {
    /// Two nodes north of the point; the nearer one comes second.
    Nearby,
    Empty,
    Fail,
}

pub struct StubNodes {
    mode: NodeMode,
    pub radii: Mutex<Vec<f64>>,
}

impl StubNodes {
    pub fn new(mode: NodeMode) -> Self {
        Self {
            mode,
            radii: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.radii.lock().unwrap().len()
    }
}

pub fn shifted(point: Coordinate, dlat: f64) -> Coordinate {
    Coordinate::new(point.lat() + dlat, point.lon()).unwrap()
}

impl RoadNodeSource for StubNodes {
    fn nodes_near(&self, point: Coordinate, radius_m: f64) -> Result<Vec<RoadNode>, RouteError> {
        self.radii.lock().unwrap().push(radius_m);
        match self.mode {
            NodeMode::Nearby => Ok(vec![
                RoadNode::new(1, shifted(point, FAR_OFFSET)),
                RoadNode::new(2, shifted(point, NEAR_OFFSET)),
            ]),
            NodeMode::Empty => Ok(Vec::new()),
            NodeMode::Fail => Err(RouteError::MapDataQueryFailed("503 Service Unavailable".to_string())),
        }
    }
}

/// Routes along straight lines: 1.3x the great-circle length at 10 m/s.
pub struct StubRouter {
    /// Fail any request whose first coordinate has this latitude.
    fail_from_lat: Option<f64>,
    no_routes: bool,
    pub requests: Mutex<Vec<Vec<Coordinate>>>,
}

impl StubRouter {
    pub fn new() -> Self {
        Self {
            fail_from_lat: None,
            no_routes: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_from(lat: f64) -> Self {
        Self {
            fail_from_lat: Some(lat),
            ..Self::new()
        }
    }

    pub fn without_routes() -> Self {
        Self {
            no_routes: true,
            ..Self::new()
        }
    }

    pub fn requests(&self) -> Vec<Vec<Coordinate>> {
        self.requests.lock().unwrap().clone()
    }
}

impl RoutingService for StubRouter {
    fn driving_route(&self, coordinates: &[Coordinate]) -> Result<DrivingRoute, RouteError> {
        self.requests.lock().unwrap().push(coordinates.to_vec());

        if self.no_routes {
            return Err(RouteError::RouteComputationFailed("no routes returned".to_string()));
        }
        if let (Some(lat), Some(first)) = (self.fail_from_lat, coordinates.first()) {
            if (first.lat() - lat).abs() < 1e-3 {
                return Err(RouteError::RouteComputationFailed("connection refused".to_string()));
            }
        }

        let steps: Vec<RouteStep> = coordinates
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let meters = haversine::distance(pair[0], pair[1]) * 1.3;
                RouteStep {
                    name: format!("Calle {}", i + 1),
                    instruction: "Continue".to_string(),
                    distance_m: meters,
                    duration_s: meters / 10.0,
                    geometry: polyline::encode(pair),
                }
            })
            .collect();

        Ok(DrivingRoute {
            distance_m: steps.iter().map(|step| step.distance_m).sum(),
            duration_s: steps.iter().map(|step| step.duration_s).sum(),
            steps,
            geometry: polyline::encode(coordinates),
        })
    }
}
