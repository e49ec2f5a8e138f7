//! OSRM HTTP adapter for driving routes.

use serde::Deserialize;
use tracing::debug;

use crate::coordinate::Coordinate;
use crate::error::{describe_transport, RouteError};
use crate::route::{DrivingRoute, RouteStep};
use crate::traits::RoutingService;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, coordinates: &[Coordinate]) -> String {
        let coords = coordinates
            .iter()
            .map(|coord| coord.to_lon_lat())
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&steps=true&geometries=polyline",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl RoutingService for OsrmClient {
    fn driving_route(&self, coordinates: &[Coordinate]) -> Result<DrivingRoute, RouteError> {
        if coordinates.len() < 2 {
            return Err(RouteError::InsufficientWaypoints {
                count: coordinates.len(),
            });
        }

        let url = self.route_url(coordinates);
        debug!(%url, "requesting driving route");

        // OSRM answers 400 with a JSON body for unroutable input, so the
        // status is not checked before parsing.
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.json::<RouteResponse>())
            .map_err(|err| RouteError::RouteComputationFailed(describe_transport(&err)))?;

        body.into_driving_route()
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: String,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    #[serde(default)]
    name: String,
    distance: f64,
    duration: f64,
    geometry: String,
    maneuver: Maneuver,
}

#[derive(Debug, Deserialize)]
struct Maneuver {
    #[serde(rename = "type")]
    kind: String,
    modifier: Option<String>,
}

impl RouteResponse {
    fn into_driving_route(self) -> Result<DrivingRoute, RouteError> {
        if self.code != "Ok" {
            let detail = self.message.unwrap_or_default();
            return Err(RouteError::RouteComputationFailed(format!("{}: {}", self.code, detail)));
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RouteError::RouteComputationFailed("no routes returned".to_string()))?;

        let steps = route
            .legs
            .into_iter()
            .flat_map(|leg| leg.steps)
            .map(|step| RouteStep {
                instruction: step.maneuver.instruction(&step.name),
                name: step.name,
                distance_m: step.distance,
                duration_s: step.duration,
                geometry: step.geometry,
            })
            .collect();

        Ok(DrivingRoute {
            distance_m: route.distance,
            duration_s: route.duration,
            steps,
            geometry: route.geometry,
        })
    }
}

impl Maneuver {
    /// Short English instruction for a maneuver, e.g. "Turn left onto Freire".
    fn instruction(&self, street: &str) -> String {
        let modifier = self.modifier.as_deref().unwrap_or("straight");
        let base = match self.kind.as_str() {
            "depart" => "Depart".to_string(),
            "arrive" => return "Arrive at destination".to_string(),
            "turn" | "end of road" | "fork" => format!("Turn {}", modifier),
            "merge" => format!("Merge {}", modifier),
            "on ramp" => "Take the ramp".to_string(),
            "off ramp" => "Take the exit".to_string(),
            "roundabout" | "rotary" => "Enter the roundabout".to_string(),
            "exit roundabout" | "exit rotary" => "Exit the roundabout".to_string(),
            "new name" | "continue" | "notification" => "Continue".to_string(),
            _ if modifier == "straight" => "Continue".to_string(),
            _ => format!("Keep {}", modifier),
        };

        if street.is_empty() {
            base
        } else {
            format!("{} onto {}", base, street)
        }
    }
}
