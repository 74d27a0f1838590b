//! Full-pipeline test against a real OSRM backend.
//!
//! Requires docker; downloads and preprocesses the Lithuania extract on
//! first run (set `OSRM_DATA_DIR` to cache it somewhere persistent).

mod fixtures;

use std::env;

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

use tour_planner::connect::connect_paths;
use tour_planner::osrm::{OsrmClient, OsrmConfig};
use tour_planner::osrm_data::{Dataset, Region};
use tour_planner::planner::plan_route;
use tour_planner::traits::RouteOracle;

fn osrm_container() -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let data_root = env::var("OSRM_DATA_DIR").unwrap_or_else(|_| "osrm-data".to_string());
    let region = Region::new("europe/lithuania");
    let dataset = Dataset::ensure(&region, data_root)
        .map_err(|err| TestcontainersError::other(format!("OSRM prep failed: {err:?}")))?;

    let mtime = std::fs::metadata(dataset.graph_base.with_extension("osrm.partition"))
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
            "osrm-routed",
            "--algorithm",
            "mld",
            "/data/lithuania-latest.osrm",
        ])
        .with_container_name(format!("osrm-lithuania-mld-{mtime}"))
        .with_startup_timeout(std::time::Duration::from_secs(30))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(5000.tcp())?;
    let base_url = format!("http://127.0.0.1:{port}");

    Ok((container, base_url))
}

fn client(base_url: String) -> OsrmClient {
    OsrmClient::new(OsrmConfig {
        base_url,
        profile: "car".to_string(),
        timeout_secs: 10,
    })
    .expect("build OSRM client")
}

#[test]
#[ignore = "requires docker and the Lithuania OSRM dataset"]
fn osrm_oracle_answers_distance_and_batch() {
    let (_container, base_url) = osrm_container().expect("start OSRM container");
    let oracle = client(base_url);

    let stops = fixtures::vilnius::stops();
    let distance = oracle.travel_distance(stops[0], stops[1]).expect("route query");
    assert!(distance > 0.0);

    let batch = oracle
        .batch_travel_distance(stops[0], &stops[1..4])
        .expect("table query");
    assert_eq!(batch.len(), 3);
    assert!(batch.iter().all(|d| *d > 0.0));
}

#[test]
#[ignore = "requires docker and the Lithuania OSRM dataset"]
fn osrm_plan_and_connect_round_trip() {
    let (_container, base_url) = osrm_container().expect("start OSRM container");
    let oracle = client(base_url);

    let stops = fixtures::vilnius::stops();
    let planned = plan_route(&stops, &oracle).expect("plan over real roads");
    assert!(!planned.is_empty());
    for route in &planned {
        fixtures::assert_route_invariants(route);
    }

    let connected = connect_paths(planned, &oracle).expect("connect over real roads");
    assert!(!connected.is_empty());
}
