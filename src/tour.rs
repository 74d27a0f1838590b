//! Multi-start greedy tour construction.
//!
//! Builds one best-ordered route over a point subset: rank starting
//! candidates by distance from an approximate spherical centroid
//! (near-hull starts empirically shorten greedy tours), walk greedily
//! from each, keep the shortest tour, then realize its geometry.

use std::collections::HashSet;

use tracing::trace;

use crate::cache::DistanceCache;
use crate::candidates::CandidateIndex;
use crate::geometry::{Point, Route};
use crate::traits::{PlanError, RouteOracle};

/// Starting points tried per tour.
const START_CANDIDATES: usize = 4;

/// Real-distance fetches allowed per greedy step.
const REAL_FETCH_LIMIT: usize = 10;

/// Builds the shortest greedy tour over `subset` (indices into
/// `points`). Rejects subsets smaller than 2 before any oracle call;
/// any oracle failure propagates with no partial tour.
pub fn build_tour<O: RouteOracle>(
    subset: &[usize],
    points: &[Point],
    index: &CandidateIndex,
    cache: &mut DistanceCache,
    oracle: &O,
) -> Result<Route, PlanError> {
    if subset.len() < 2 {
        return Err(PlanError::InvalidInput("tour builder needs at least 2 points"));
    }

    let centroid = spherical_centroid(subset, points);

    let mut ranked: Vec<(usize, f64)> = subset
        .iter()
        .map(|&i| (i, oracle.estimate_distance(centroid, points[i])))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let starts: Vec<usize> = ranked
        .into_iter()
        .take(START_CANDIDATES)
        .map(|(i, _)| i)
        .collect();

    let mut best_order: Vec<usize> = Vec::new();
    let mut best_dist = f64::INFINITY;
    for &start in &starts {
        let (order, dist) = greedy_tour(start, subset, points, index, cache, oracle)?;
        trace!(start, dist, "candidate tour built");
        if dist < best_dist {
            best_order = order;
            best_dist = dist;
        }
    }

    let stops: Vec<Point> = best_order.iter().map(|&i| points[i]).collect();
    let mut segments = Vec::with_capacity(stops.len() - 1);
    for pair in stops.windows(2) {
        segments.push(cache.travel_route(oracle, pair[0], pair[1])?);
    }

    Ok(Route {
        stops,
        segments,
        total_distance: best_dist,
    })
}

/// One greedy walk: at each step fetch real distances for at most
/// [`REAL_FETCH_LIMIT`] of the nearest unvisited candidates and move to
/// the closest (ties: candidate-list order).
fn greedy_tour<O: RouteOracle>(
    start: usize,
    subset: &[usize],
    points: &[Point],
    index: &CandidateIndex,
    cache: &mut DistanceCache,
    oracle: &O,
) -> Result<(Vec<usize>, f64), PlanError> {
    let mut available: HashSet<usize> = subset.iter().copied().collect();
    let mut order = Vec::with_capacity(subset.len());
    let mut total = 0.0;
    let mut current = start;

    available.remove(&current);
    order.push(current);

    while !available.is_empty() {
        let mut next: Option<(usize, f64)> = None;
        let mut fetched = 0;
        for candidate in index.neighbors_of(current) {
            if !available.contains(&candidate.idx) {
                continue;
            }
            let dist = cache.travel_distance(oracle, points[current], points[candidate.idx])?;
            match next {
                Some((_, best)) if dist >= best => {}
                _ => next = Some((candidate.idx, dist)),
            }
            fetched += 1;
            if fetched == REAL_FETCH_LIMIT {
                break;
            }
        }

        // The index covers every point of the slice, so an unvisited
        // subset member is always reachable.
        let Some((idx, dist)) = next else {
            return Err(PlanError::InvalidInput("candidate index does not cover the subset"));
        };

        available.remove(&idx);
        order.push(idx);
        total += dist;
        current = idx;
    }

    Ok((order, total))
}

/// Approximate spherical centroid: average of unit 3-vectors, mapped
/// back via atan2. Not the true spherical centroid; good enough for
/// ranking starting candidates.
pub(crate) fn spherical_centroid(subset: &[usize], points: &[Point]) -> Point {
    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for &i in subset {
        let lat = points[i].lat.to_radians();
        let lng = points[i].lng.to_radians();
        x += lat.cos() * lng.cos();
        y += lat.cos() * lng.sin();
        z += lat.sin();
    }
    let n = subset.len() as f64;
    x /= n;
    y /= n;
    z /= n;

    Point::new(
        z.atan2((x * x + y * y).sqrt()).to_degrees(),
        y.atan2(x).to_degrees(),
    )
}
