//! Route generation: point set → list of disjoint routes.
//!
//! Composes the candidate index, batch warm-up, tour builder, and
//! splitter into the recursive `plan_route` entry point. The cache and
//! index are created fresh here and shared by reference through the
//! whole recursion tree.

use tracing::debug;

use crate::cache::DistanceCache;
use crate::candidates::CandidateIndex;
use crate::geometry::{Point, Route};
use crate::split;
use crate::tour;
use crate::traits::{PlanError, RouteOracle};

/// Neighbors pre-fetched per point with one batch query.
const WARM_UP_NEIGHBORS: usize = 10;

/// Subsets below this size are never subdivided.
const SPLIT_MIN_POINTS: usize = 5;

/// Plans one or more routes over `points`, splitting recursively where
/// the tour overlaps itself or detours badly.
///
/// Rejects fewer than 2 points before any oracle call. Any oracle
/// failure aborts the whole invocation; no partial result is returned.
pub fn plan_route<O: RouteOracle>(points: &[Point], oracle: &O) -> Result<Vec<Route>, PlanError> {
    if points.len() < 2 {
        return Err(PlanError::InvalidInput("route planning needs at least 2 points"));
    }
    debug!(points = points.len(), "planning route");

    let index = CandidateIndex::build(points, oracle);
    let mut cache = DistanceCache::new();
    warm_up(points, &index, &mut cache, oracle)?;

    let subset: Vec<usize> = (0..points.len()).collect();
    generate(&subset, points, &index, &mut cache, oracle)
}

/// Seeds the cache with one batch one-to-many query per point, covering
/// the neighbors the greedy walk is most likely to probe.
fn warm_up<O: RouteOracle>(
    points: &[Point],
    index: &CandidateIndex,
    cache: &mut DistanceCache,
    oracle: &O,
) -> Result<(), PlanError> {
    for (i, origin) in points.iter().enumerate() {
        let destinations: Vec<Point> = index
            .neighbors_of(i)
            .iter()
            .take(WARM_UP_NEIGHBORS)
            .map(|candidate| points[candidate.idx])
            .collect();
        if destinations.is_empty() {
            continue;
        }
        let distances = oracle.batch_travel_distance(*origin, &destinations)?;
        for (destination, distance) in destinations.iter().zip(distances) {
            cache.seed_distance(*origin, *destination, distance);
        }
    }
    Ok(())
}

/// Recursive divide step: build a tour, split it spatially when the
/// splitter triggers, concatenate the halves' routes (side A first).
fn generate<O: RouteOracle>(
    subset: &[usize],
    points: &[Point],
    index: &CandidateIndex,
    cache: &mut DistanceCache,
    oracle: &O,
) -> Result<Vec<Route>, PlanError> {
    let route = tour::build_tour(subset, points, index, cache, oracle)?;

    if subset.len() >= SPLIT_MIN_POINTS && split::should_split(&route, cache, oracle)? {
        let (side_a, side_b) = split::partition(subset, points);
        // A half below 2 points cannot be toured; abandon the split and
        // keep the route whole.
        if side_a.len() >= 2 && side_b.len() >= 2 {
            debug!(side_a = side_a.len(), side_b = side_b.len(), "splitting subset");
            let mut routes = generate(&side_a, points, index, cache, oracle)?;
            routes.extend(generate(&side_b, points, index, cache, oracle)?);
            return Ok(routes);
        }
        debug!(
            side_a = side_a.len(),
            side_b = side_b.len(),
            "degenerate partition, keeping route unsplit"
        );
    }

    Ok(vec![route])
}
