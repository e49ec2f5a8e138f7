//! Nominatim HTTP adapter for address geocoding.

use serde::Deserialize;
use tracing::debug;

use crate::coordinate::Coordinate;
use crate::error::{describe_transport, RouteError};
use crate::traits::Geocoder;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying user agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "route-planner/0.1".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.config.base_url.trim_end_matches('/'))
    }
}

impl Geocoder for NominatimClient {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, RouteError> {
        let url = self.search_url();
        debug!(%url, address, "geocoding address");

        let response = self
            .client
            .get(url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<SearchHit>>());

        match response {
            Ok(hits) => first_match(address, &hits),
            Err(err) if err.is_timeout() => Err(RouteError::GeocodingTimeout {
                address: address.to_string(),
            }),
            Err(err) => Err(RouteError::GeocodingFailed {
                address: address.to_string(),
                reason: describe_transport(&err),
            }),
        }
    }
}

/// Nominatim returns coordinates as decimal strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

fn first_match(address: &str, hits: &[SearchHit]) -> Result<Option<Coordinate>, RouteError> {
    let Some(hit) = hits.first() else {
        debug!(address, "no geocoding match");
        return Ok(None);
    };

    let parse = |value: &str| {
        value.trim().parse::<f64>().map_err(|err| RouteError::GeocodingFailed {
            address: address.to_string(),
            reason: format!("unparseable coordinate {:?}: {}", value, err),
        })
    };
    let coordinate = Coordinate::new(parse(&hit.lat)?, parse(&hit.lon)?)?;
    debug!(
        address,
        matched = hit.display_name.as_deref().unwrap_or(""),
        lat = coordinate.lat(),
        lon = coordinate.lon(),
        "geocoded address"
    );
    Ok(Some(coordinate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<SearchHit> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_first_match_parses_string_coordinates() {
        let hits = parse(
            r#"[{
                "place_id": 1,
                "lat": "-36.8302049",
                "lon": "-73.0372293",
                "display_name": "Universidad de Concepción, Concepción, Biobío, Chile"
            }]"#,
        );
        let found = first_match("Universidad de Concepcion", &hits).unwrap().unwrap();
        assert_eq!(found.lat(), -36.8302049);
        assert_eq!(found.lon(), -73.0372293);
    }

    #[test]
    fn test_first_match_empty_is_not_found() {
        let hits = parse("[]");
        assert_eq!(first_match("nowhere", &hits), Ok(None));
    }

    #[test]
    fn test_first_match_rejects_garbage() {
        let hits = parse(r#"[{"lat": "north", "lon": "-73.0"}]"#);
        let err = first_match("x", &hits).unwrap_err();
        assert!(matches!(err, RouteError::GeocodingFailed { .. }));
    }

    #[test]
    fn test_first_match_rejects_out_of_range() {
        let hits = parse(r#"[{"lat": "123.0", "lon": "-73.0"}]"#);
        assert_eq!(
            first_match("x", &hits),
            Err(RouteError::InvalidCoordinate { lat: 123.0, lon: -73.0 })
        );
    }

    #[test]
    fn test_search_url_trims_trailing_slash() {
        let client = NominatimClient::new(NominatimConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..NominatimConfig::default()
        })
        .unwrap();
        assert_eq!(client.search_url(), "http://localhost:8080/search");
    }

    #[test]
    fn test_unreachable_service_is_failure() {
        let client = NominatimClient::new(NominatimConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..NominatimConfig::default()
        })
        .unwrap();
        let err = client.geocode("Concepcion").unwrap_err();
        assert!(matches!(
            err,
            RouteError::GeocodingFailed { .. } | RouteError::GeocodingTimeout { .. }
        ));
    }

    #[test]
    fn test_silent_service_is_geocoding_timeout() {
        let client = NominatimClient::new(NominatimConfig {
            base_url: crate::error::silent_endpoint(),
            timeout_secs: 1,
            ..NominatimConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.geocode("Concepcion"),
            Err(RouteError::GeocodingTimeout {
                address: "Concepcion".to_string()
            })
        );
    }
}
