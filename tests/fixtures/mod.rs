//! Test fixtures for tour-planner.
//!
//! Provides a deterministic stub oracle (planar metric, optional
//! per-pair overrides, call counting, scripted failure) and real
//! Vilnius stop coordinates for realistic inputs.

pub mod vilnius;

use std::cell::Cell;

use tour_planner::geometry::{Point, Polyline, RouteGeometry};
use tour_planner::traits::{OracleError, RouteOracle};

/// Geometry points interpolated per leg by the stub.
const STEP_POINTS: usize = 5;

/// Deterministic oracle over a flat-plane metric.
///
/// Distances are Euclidean in degrees scaled by `meters_per_degree`,
/// with optional exact-pair overrides. Every fallible call is counted;
/// `fail_on_call` makes the n-th (1-based) fallible call error.
pub struct StubOracle {
    meters_per_degree: f64,
    overrides: Vec<(Point, Point, f64)>,
    fail_on_call: Option<usize>,
    calls: Cell<usize>,
}

impl StubOracle {
    pub fn new(meters_per_degree: f64) -> Self {
        Self {
            meters_per_degree,
            overrides: Vec::new(),
            fail_on_call: None,
            calls: Cell::new(0),
        }
    }

    /// Overrides the travel distance for a pair, both directions.
    pub fn with_override(mut self, a: Point, b: Point, distance: f64) -> Self {
        self.overrides.push((a, b, distance));
        self.overrides.push((b, a, distance));
        self
    }

    /// Makes the n-th (1-based) fallible call fail.
    pub fn fail_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    /// Fallible calls issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    fn euclid(&self, a: Point, b: Point) -> f64 {
        ((a.lat - b.lat).powi(2) + (a.lng - b.lng).powi(2)).sqrt() * self.meters_per_degree
    }

    fn lookup(&self, a: Point, b: Point) -> f64 {
        self.overrides
            .iter()
            .find(|(from, to, _)| *from == a && *to == b)
            .map(|(_, _, d)| *d)
            .unwrap_or_else(|| self.euclid(a, b))
    }

    fn tick(&self) -> Result<(), OracleError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail_on_call == Some(self.calls.get()) {
            return Err(OracleError::new("scripted failure"));
        }
        Ok(())
    }
}

impl RouteOracle for StubOracle {
    fn estimate_distance(&self, a: Point, b: Point) -> f64 {
        self.euclid(a, b)
    }

    fn travel_distance(&self, a: Point, b: Point) -> Result<f64, OracleError> {
        self.tick()?;
        Ok(self.lookup(a, b))
    }

    fn travel_route(&self, a: Point, b: Point) -> Result<RouteGeometry, OracleError> {
        self.tick()?;
        let path = (0..STEP_POINTS)
            .map(|i| {
                let t = i as f64 / (STEP_POINTS - 1) as f64;
                Point::new(a.lat + (b.lat - a.lat) * t, a.lng + (b.lng - a.lng) * t)
            })
            .collect();
        Ok(RouteGeometry {
            steps: vec![Polyline::new(path)],
            distance: self.lookup(a, b),
        })
    }

    fn batch_travel_distance(
        &self,
        origin: Point,
        destinations: &[Point],
    ) -> Result<Vec<f64>, OracleError> {
        self.tick()?;
        Ok(destinations.iter().map(|d| self.lookup(origin, *d)).collect())
    }
}

/// Sum of a route's segment distances.
pub fn segment_sum(route: &tour_planner::geometry::Route) -> f64 {
    route.segments.iter().map(|segment| segment.distance).sum()
}

/// Asserts the structural route invariants: segment count and the
/// total-distance sum, within tolerance.
pub fn assert_route_invariants(route: &tour_planner::geometry::Route) {
    assert!(!route.stops.is_empty(), "route must have at least one stop");
    assert_eq!(
        route.segments.len(),
        route.stops.len() - 1,
        "segments must connect consecutive stops"
    );
    assert!(
        (route.total_distance - segment_sum(route)).abs() < 1e-6,
        "total {} must equal segment sum {}",
        route.total_distance,
        segment_sum(route)
    );
}
