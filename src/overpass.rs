//! Overpass HTTP adapter for road-network nodes near a point.
//!
//! One query per lookup: highway ways within the radius, recursed down to
//! their member nodes. The response lists ways first, then nodes.

use serde::Deserialize;
use tracing::debug;

use crate::coordinate::{Coordinate, RoadNode};
use crate::error::{describe_transport, RouteError};
use crate::traits::RoadNodeSource;

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Full interpreter endpoint, e.g. `https://overpass-api.de/api/interpreter`.
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: "https://overpass-api.de/api/interpreter".to_string(),
            user_agent: "route-planner/0.1".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverpassClient {
    config: OverpassConfig,
    client: reqwest::blocking::Client,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn query(&self, query: &str) -> Result<OverpassResponse, RouteError> {
        debug!(url = %self.config.base_url, query, "querying map data");
        self.client
            .get(self.config.base_url.as_str())
            .query(&[("data", query)])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OverpassResponse>())
            .map_err(|err| RouteError::MapDataQueryFailed(describe_transport(&err)))
    }

    /// Name of the first named highway within `radius_m` of `point`.
    pub fn street_name_near(&self, point: Coordinate, radius_m: f64) -> Result<Option<String>, RouteError> {
        let response = self.query(&ways_query(point, radius_m, self.config.timeout_secs))?;
        Ok(response.street_name())
    }
}

impl RoadNodeSource for OverpassClient {
    fn nodes_near(&self, point: Coordinate, radius_m: f64) -> Result<Vec<RoadNode>, RouteError> {
        let response = self.query(&nodes_query(point, radius_m, self.config.timeout_secs))?;
        Ok(response.road_nodes())
    }
}

fn ways_query(point: Coordinate, radius_m: f64, timeout_secs: u64) -> String {
    format!(
        "[out:json][timeout:{}];way[\"highway\"](around:{},{},{});out body;",
        timeout_secs,
        radius_m,
        point.lat(),
        point.lon()
    )
}

fn nodes_query(point: Coordinate, radius_m: f64, timeout_secs: u64) -> String {
    format!(
        "[out:json][timeout:{}];way[\"highway\"](around:{},{},{});(._;>;);out body;",
        timeout_secs,
        radius_m,
        point.lat(),
        point.lon()
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Element {
    Node {
        id: u64,
        lat: f64,
        lon: f64,
    },
    Way {
        #[serde(default)]
        tags: Option<WayTags>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct WayTags {
    name: Option<String>,
}

impl OverpassResponse {
    /// Nodes in response order; out-of-range positions are dropped.
    fn road_nodes(&self) -> Vec<RoadNode> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                Element::Node { id, lat, lon } => Coordinate::new(*lat, *lon)
                    .ok()
                    .map(|position| RoadNode::new(*id, position)),
                _ => None,
            })
            .collect()
    }

    fn street_name(&self) -> Option<String> {
        self.elements.iter().find_map(|element| match element {
            Element::Way { tags: Some(tags) } => tags.name.clone(),
            _ => None,
        })
    }
}
