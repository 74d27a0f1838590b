//! Per-invocation memoization of oracle results.
//!
//! One cache is created per top-level call and passed by reference
//! through the recursion — never a process-global, so unrelated calls
//! cannot interfere. Entries are write-once per key; there is no
//! eviction.

use std::collections::HashMap;

use crate::geometry::{Point, RouteGeometry};
use crate::traits::{OracleError, RouteOracle};

/// Ordered (origin, destination) key. Bit-exact equality: A→B and B→A
/// are independent entries since real travel distance need not be
/// symmetric.
type PairKey = (u64, u64, u64, u64);

fn pair_key(origin: Point, destination: Point) -> PairKey {
    (
        origin.lat.to_bits(),
        origin.lng.to_bits(),
        destination.lat.to_bits(),
        destination.lng.to_bits(),
    )
}

#[derive(Debug, Default, Clone)]
struct CacheEntry {
    distance: Option<f64>,
    route: Option<RouteGeometry>,
}

/// Memoizes travel distances and route geometries per ordered pair.
#[derive(Debug, Default)]
pub struct DistanceCache {
    entries: HashMap<PairKey, CacheEntry>,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Travel distance from `a` to `b`, fetching through the oracle on
    /// the first request for the pair.
    pub fn travel_distance<O: RouteOracle>(
        &mut self,
        oracle: &O,
        a: Point,
        b: Point,
    ) -> Result<f64, OracleError> {
        if let Some(entry) = self.entries.get(&pair_key(a, b)) {
            if let Some(distance) = entry.distance {
                return Ok(distance);
            }
        }
        let distance = oracle.travel_distance(a, b)?;
        self.entries
            .entry(pair_key(a, b))
            .or_default()
            .distance
            .get_or_insert(distance);
        Ok(distance)
    }

    /// Route geometry from `a` to `b`. A geometry fetch also records the
    /// pair's scalar distance.
    pub fn travel_route<O: RouteOracle>(
        &mut self,
        oracle: &O,
        a: Point,
        b: Point,
    ) -> Result<RouteGeometry, OracleError> {
        if let Some(entry) = self.entries.get(&pair_key(a, b)) {
            if let Some(route) = &entry.route {
                return Ok(route.clone());
            }
        }
        let route = oracle.travel_route(a, b)?;
        let entry = self.entries.entry(pair_key(a, b)).or_default();
        entry.distance.get_or_insert(route.distance);
        entry.route = Some(route.clone());
        Ok(route)
    }

    /// Seeds a distance obtained out-of-band (batch warm-up). Keeps the
    /// existing value when the key is already present.
    pub fn seed_distance(&mut self, a: Point, b: Point, distance: f64) {
        self.entries
            .entry(pair_key(a, b))
            .or_default()
            .distance
            .get_or_insert(distance);
    }

    /// Number of cached pairs (diagnostics and tests).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
