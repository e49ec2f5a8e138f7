//! Failure taxonomy for geocoding, snapping, routing and polyline decoding.
//!
//! Every failure is returned to the caller as a value. Nothing in this crate
//! retries or silently substitutes defaults, with one exception: a failed
//! map-data lookup degrades to the raw waypoint inside the route computer.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("geocoding timed out for address {address:?}")]
    GeocodingTimeout { address: String },

    #[error("no geocoding match for address {address:?}")]
    GeocodingNotFound { address: String },

    #[error("geocoding failed for address {address:?}: {reason}")]
    GeocodingFailed { address: String, reason: String },

    #[error("map-data query failed: {0}")]
    MapDataQueryFailed(String),

    #[error("route computation failed: {0}")]
    RouteComputationFailed(String),

    #[error("at least 2 waypoints are required, got {count}")]
    InsufficientWaypoints { count: usize },

    #[error("malformed polyline at byte {position}")]
    MalformedPolyline { position: usize },

    #[error("coordinate out of range: lat {lat}, lon {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

impl RouteError {
    /// True for failures caused by a service not answering in time.
    pub fn is_timeout(&self) -> bool {
        match self {
            RouteError::GeocodingTimeout { .. } => true,
            RouteError::MapDataQueryFailed(reason) | RouteError::RouteComputationFailed(reason) => {
                reason.contains("timed out")
            }
            _ => false,
        }
    }
}

/// Flattens a transport error into a message, tagging timeouts so
/// [`RouteError::is_timeout`] can recognize them.
pub(crate) fn describe_transport(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else {
        err.to_string()
    }
}

/// A local HTTP endpoint that accepts connections and never answers.
#[cfg(test)]
pub(crate) fn silent_endpoint() -> String {
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
            if held.len() >= 4 {
                break;
            }
        }
        thread::sleep(Duration::from_secs(10));
    });
    format!("http://{}", addr)
}
