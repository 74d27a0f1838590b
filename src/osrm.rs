//! OSRM HTTP adapter implementing the route oracle.
//!
//! Uses the `/route` service for real distances and step geometry
//! (GeoJSON, so no polyline decoding in the core) and the `/table`
//! service for the one-to-many warm-up batch. The cheap estimate is
//! plain haversine and never touches the network.

use serde::Deserialize;

use crate::geometry::{Point, Polyline, RouteGeometry};
use crate::haversine::haversine_m;
use crate::traits::{OracleError, RouteOracle};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
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

    /// OSRM coordinate order is lng,lat.
    fn coord(point: Point) -> String {
        format!("{:.6},{:.6}", point.lng, point.lat)
    }

    fn fetch_route(&self, a: Point, b: Point, with_steps: bool) -> Result<OsrmRoute, OracleError> {
        let options = if with_steps {
            "overview=false&steps=true&geometries=geojson"
        } else {
            "overview=false"
        };
        let url = format!(
            "{}/route/v1/{}/{};{}?{}",
            self.config.base_url,
            self.config.profile,
            Self::coord(a),
            Self::coord(b),
            options
        );

        let response: OsrmRouteResponse = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .json()?;

        response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| OracleError::new("route response contained no routes"))
    }
}

impl RouteOracle for OsrmClient {
    fn estimate_distance(&self, a: Point, b: Point) -> f64 {
        haversine_m(a, b)
    }

    fn travel_distance(&self, a: Point, b: Point) -> Result<f64, OracleError> {
        Ok(self.fetch_route(a, b, false)?.distance)
    }

    fn travel_route(&self, a: Point, b: Point) -> Result<RouteGeometry, OracleError> {
        let route = self.fetch_route(a, b, true)?;
        let steps = route
            .legs
            .into_iter()
            .flat_map(|leg| leg.steps)
            .map(|step| {
                Polyline::new(
                    step.geometry
                        .coordinates
                        .into_iter()
                        .map(|[lng, lat]| Point::new(lat, lng))
                        .collect(),
                )
            })
            .collect();

        Ok(RouteGeometry {
            steps,
            distance: route.distance,
        })
    }

    fn batch_travel_distance(
        &self,
        origin: Point,
        destinations: &[Point],
    ) -> Result<Vec<f64>, OracleError> {
        if destinations.is_empty() {
            return Ok(Vec::new());
        }

        let coords = std::iter::once(origin)
            .chain(destinations.iter().copied())
            .map(Self::coord)
            .collect::<Vec<_>>()
            .join(";");
        let url = format!(
            "{}/table/v1/{}/{}?sources=0&annotations=distance",
            self.config.base_url, self.config.profile, coords
        );

        let response: OsrmTableResponse = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .json()?;

        let row = response
            .distances
            .and_then(|rows| rows.into_iter().next())
            .ok_or_else(|| OracleError::new("table response contained no distances"))?;

        // First column is origin→origin.
        let distances: Vec<f64> = row.into_iter().skip(1).collect();
        if distances.len() != destinations.len() {
            return Err(OracleError::new(format!(
                "table response had {} distances for {} destinations",
                distances.len(),
                destinations.len()
            )));
        }
        Ok(distances)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
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
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    distances: Option<Vec<Vec<f64>>>,
}
