//! Route computation results.
//!
//! [`DrivingRoute`] is the raw answer of a routing service in meters and
//! seconds. [`RouteResult`] is what the route computer hands to callers,
//! in kilometers and minutes. [`RoundTripRoute`] pairs two results and
//! derives its totals from them.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::coordinate::Coordinate;
use crate::error::RouteError;
use crate::haversine::StraightLineEstimator;
use crate::polyline::Polyline;

/// One maneuver within a route, in traversal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Street name; empty when the road is unnamed.
    pub name: String,
    pub instruction: String,
    pub distance_m: f64,
    pub duration_s: f64,
    /// Encoded polyline of this step.
    pub geometry: String,
}

impl RouteStep {
    /// Decodes the step geometry.
    pub fn path(&self) -> Result<Polyline, RouteError> {
        Polyline::decode(&self.geometry)
    }
}

/// A route as returned by the routing service, before unit conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivingRoute {
    pub distance_m: f64,
    pub duration_s: f64,
    pub steps: Vec<RouteStep>,
    /// Encoded polyline of the whole route.
    pub geometry: String,
}

/// One directional route computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    distance_km: f64,
    duration_min: f64,
    steps: Vec<RouteStep>,
    geometry: String,
    waypoints: Vec<Coordinate>,
}

impl RouteResult {
    pub fn new(
        distance_km: f64,
        duration_min: f64,
        steps: Vec<RouteStep>,
        geometry: String,
        waypoints: Vec<Coordinate>,
    ) -> Self {
        Self {
            distance_km,
            duration_min,
            steps,
            geometry,
            waypoints,
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    /// Encoded polyline of the full route.
    pub fn geometry(&self) -> &str {
        &self.geometry
    }

    /// Snapped waypoints actually submitted to the routing service.
    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    /// Decodes the full-route geometry.
    pub fn path(&self) -> Result<Polyline, RouteError> {
        Polyline::decode(&self.geometry)
    }

    /// Route geometry as `[lat, lng]` pairs for map rendering.
    pub fn to_coordinates(&self) -> Result<Vec<[f64; 2]>, RouteError> {
        Ok(self.path()?.to_pairs())
    }
}

/// Direction of a leg within a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegKind {
    Outbound,
    Return,
}

/// A leg that could not be computed, kept so callers can see why.
#[derive(Debug, Clone, PartialEq)]
pub struct LegFailure {
    pub leg: LegKind,
    pub error: RouteError,
}

/// Outbound and return legs of a delivery.
///
/// Either leg may be missing when its computation failed. Totals are
/// always derived from the legs present; there is no way to set them.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTripRoute {
    outbound: Option<RouteResult>,
    inbound: Option<RouteResult>,
    failures: Vec<LegFailure>,
}

/// Serialized as both legs plus their derived totals. Failures stay local.
impl Serialize for RoundTripRoute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RoundTripRoute", 4)?;
        state.serialize_field("outbound", &self.outbound)?;
        state.serialize_field("return", &self.inbound)?;
        state.serialize_field("total_distance_km", &self.total_distance_km())?;
        state.serialize_field("total_duration_min", &self.total_duration_min())?;
        state.end()
    }
}

impl RoundTripRoute {
    pub fn new(outbound: Result<RouteResult, RouteError>, inbound: Result<RouteResult, RouteError>) -> Self {
        let mut failures = Vec::new();
        let outbound = keep_leg(LegKind::Outbound, outbound, &mut failures);
        let inbound = keep_leg(LegKind::Return, inbound, &mut failures);
        Self {
            outbound,
            inbound,
            failures,
        }
    }

    pub fn outbound(&self) -> Option<&RouteResult> {
        self.outbound.as_ref()
    }

    pub fn inbound(&self) -> Option<&RouteResult> {
        self.inbound.as_ref()
    }

    pub fn leg(&self, kind: LegKind) -> Option<&RouteResult> {
        match kind {
            LegKind::Outbound => self.outbound(),
            LegKind::Return => self.inbound(),
        }
    }

    /// Present legs, outbound first.
    pub fn legs(&self) -> impl Iterator<Item = (LegKind, &RouteResult)> {
        [LegKind::Outbound, LegKind::Return]
            .into_iter()
            .filter_map(move |kind| self.leg(kind).map(|leg| (kind, leg)))
    }

    /// Errors of the legs that are missing.
    pub fn failures(&self) -> &[LegFailure] {
        &self.failures
    }

    pub fn is_complete(&self) -> bool {
        self.outbound.is_some() && self.inbound.is_some()
    }

    pub fn total_distance_km(&self) -> f64 {
        self.legs().map(|(_, leg)| leg.distance_km()).sum()
    }

    pub fn total_duration_min(&self) -> f64 {
        self.legs().map(|(_, leg)| leg.duration_min()).sum()
    }

    /// Replaces missing legs with straight-line estimates between `origin`
    /// and `destination`. Failures for replaced legs are cleared.
    pub fn fill_missing_with(
        mut self,
        estimator: &StraightLineEstimator,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Self, RouteError> {
        if self.outbound.is_none() {
            self.outbound = Some(estimator.estimate(&[origin, destination])?);
        }
        if self.inbound.is_none() {
            self.inbound = Some(estimator.estimate(&[destination, origin])?);
        }
        self.failures.clear();
        Ok(self)
    }
}

fn keep_leg(
    kind: LegKind,
    leg: Result<RouteResult, RouteError>,
    failures: &mut Vec<LegFailure>,
) -> Option<RouteResult> {
    match leg {
        Ok(route) => Some(route),
        Err(error) => {
            failures.push(LegFailure { leg: kind, error });
            None
        }
    }
}
