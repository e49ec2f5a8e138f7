//! Live routing against a self-hosted OSRM container.
//!
//! Needs Docker and downloads the Chile extract on first run (several
//! hundred MB), so it only runs with `cargo test -- --ignored`.

mod fixtures;

use std::env;
use std::time::{Duration, Instant};

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

use route_planner::osrm::{OsrmClient, OsrmConfig};
use route_planner::osrm_data::{GeofabrikRegion, OsrmDataset, OsrmDatasetConfig};
use route_planner::overpass::{OverpassClient, OverpassConfig};
use route_planner::route::DrivingRoute;
use route_planner::traits::RoutingService;
use route_planner::{Coordinate, RouteComputer, RouteError};

use fixtures::{DELIVERIES, DEPOT};

fn osrm_container() -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let data_root = env::var("OSRM_DATA_DIR").unwrap_or_else(|_| "osrm-data".to_string());
    let config = OsrmDatasetConfig::new(GeofabrikRegion::default(), data_root);
    let dataset = OsrmDataset::ensure(&config)
        .map_err(|err| TestcontainersError::other(format!("OSRM prep failed: {}", err)))?;
    let mtime = std::fs::metadata(dataset.osrm_base.with_extension("osrm.partition"))
        .ok()
        .and_then(|meta| meta.modified().ok())
        .and_then(|time| time.duration_since(std::time::SystemTime::UNIX_EPOCH).ok())
        .map(|duration| duration.as_secs())
        .unwrap_or(0);

    let image = GenericImage::new("osrm/osrm-backend", "latest")
        .with_exposed_port(5000.tcp())
        .with_mount(Mount::bind_mount(
            dataset.data_dir.to_string_lossy().to_string(),
            "/data",
        ))
        .with_cmd(vec![
            "osrm-routed".to_string(),
            "--algorithm".to_string(),
            "mld".to_string(),
            dataset.container_path(),
        ])
        .with_container_name(format!("osrm-chile-mld-{}", mtime))
        .with_startup_timeout(Duration::from_secs(60))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(5000.tcp())?;
    Ok((container, format!("http://127.0.0.1:{}", port)))
}

/// osrm-routed accepts connections before its data is mapped; poll briefly.
fn route_when_ready(client: &OsrmClient, coords: &[Coordinate]) -> Result<DrivingRoute, RouteError> {
    let start = Instant::now();
    loop {
        let result = client.driving_route(coords);
        if result.is_ok() || start.elapsed() > Duration::from_secs(30) {
            return result;
        }
        std::thread::sleep(Duration::from_millis(500));
    }
}

#[test]
#[ignore = "requires Docker and a prepared OSRM dataset"]
fn osrm_route_between_concepcion_points() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let (container, base_url) = osrm_container().expect("start OSRM container");

    let client = OsrmClient::new(OsrmConfig {
        base_url,
        ..OsrmConfig::default()
    })
    .expect("build OSRM client");

    let coords = [DEPOT.coordinate(), DELIVERIES[3].coordinate()];
    let route = route_when_ready(&client, &coords).expect("driving route");

    assert!(route.distance_m > 0.0);
    assert!(route.duration_s > 0.0);
    assert!(!route.steps.is_empty());
    assert!(route_planner::polyline::decode(&route.geometry).is_ok());

    drop(container);
}

#[test]
#[ignore = "requires Docker, a prepared OSRM dataset and access to overpass-api.de"]
fn round_trip_with_live_services() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let (container, base_url) = osrm_container().expect("start OSRM container");

    let router = OsrmClient::new(OsrmConfig {
        base_url,
        ..OsrmConfig::default()
    })
    .expect("build OSRM client");
    let nodes = OverpassClient::new(OverpassConfig::default()).expect("build Overpass client");
    let _ = route_when_ready(&router, &[DEPOT.coordinate(), DELIVERIES[0].coordinate()]);

    let computer = RouteComputer::new(nodes, router);
    let trip = computer.compute_round_trip(DEPOT.coordinate(), DELIVERIES[0].coordinate());

    assert!(trip.is_complete(), "failures: {:?}", trip.failures());
    assert!(trip.total_distance_km() > 0.0);

    drop(container);
}
