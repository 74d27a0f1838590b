//! Greedy stitching of disjoint routes into one connected network.
//!
//! Each round attaches the globally closest (route endpoint, other
//! route's stop) pair and marks the two routes mutually "do not retry".
//! Termination is structural: marking is monotonic and each round
//! shrinks the eligible pair set, and a fully-marked graph is complete
//! and therefore connected.

use std::collections::HashSet;

use tracing::debug;

use crate::cache::DistanceCache;
use crate::geometry::{Point, Route};
use crate::traits::{PlanError, RouteOracle};

/// One eligible attachment found during a candidate pass.
#[derive(Debug, Clone, Copy)]
struct Attachment {
    route: usize,
    other: usize,
    at_start: bool,
    endpoint: Point,
    target: Point,
    dist: f64,
}

/// Merges `routes` until every index is reachable from every other in
/// the do-not-retry graph. Routes are extended in place (a stop and its
/// geometry prepended or appended per round), never spliced into fewer
/// sequences.
///
/// Rejects an empty route set, or any route without stops, before any
/// oracle call.
pub fn connect_paths<O: RouteOracle>(
    mut routes: Vec<Route>,
    oracle: &O,
) -> Result<Vec<Route>, PlanError> {
    if routes.is_empty() {
        return Err(PlanError::InvalidInput("path connector needs at least one route"));
    }
    if routes.iter().any(|route| route.stops.is_empty()) {
        return Err(PlanError::InvalidInput("every route needs at least one stop"));
    }

    let mut cache = DistanceCache::new();
    let mut do_not_retry: Vec<HashSet<usize>> = vec![HashSet::new(); routes.len()];

    while !connected(&do_not_retry) {
        // One pass over every eligible candidate; a strictly smaller
        // distance wins, so ties keep the earliest candidate in
        // collection order (lowest route index, start endpoint before
        // end, lowest other index, lowest stop index).
        let mut best: Option<Attachment> = None;
        for i in 0..routes.len() {
            for j in 0..routes.len() {
                if i == j || do_not_retry[i].contains(&j) {
                    continue;
                }
                let last = routes[i].stops.len() - 1;
                for (at_start, endpoint_idx) in [(true, 0), (false, last)] {
                    let endpoint = routes[i].stops[endpoint_idx];
                    for &target in &routes[j].stops {
                        let dist = cache.travel_distance(oracle, endpoint, target)?;
                        if best.is_none_or(|b| dist < b.dist) {
                            best = Some(Attachment {
                                route: i,
                                other: j,
                                at_start,
                                endpoint,
                                target,
                                dist,
                            });
                        }
                    }
                }
            }
        }

        let Some(best) = best else {
            return Err(PlanError::Disconnected);
        };
        debug!(
            route = best.route,
            other = best.other,
            dist = best.dist,
            at_start = best.at_start,
            "attaching closest fragment"
        );

        // Geometry is fetched in stops order so segments[i] keeps
        // connecting stops[i] to stops[i + 1].
        if best.at_start {
            let geometry = cache.travel_route(oracle, best.target, best.endpoint)?;
            let route = &mut routes[best.route];
            route.stops.insert(0, best.target);
            route.segments.insert(0, geometry);
        } else {
            let geometry = cache.travel_route(oracle, best.endpoint, best.target)?;
            let route = &mut routes[best.route];
            route.stops.push(best.target);
            route.segments.push(geometry);
        }
        routes[best.route].total_distance += best.dist;

        do_not_retry[best.route].insert(best.other);
        do_not_retry[best.other].insert(best.route);
    }

    Ok(routes)
}

/// Whether the graph is one connectivity component: depth-first
/// traversal over the do-not-retry edges from node 0.
fn connected(graph: &[HashSet<usize>]) -> bool {
    let mut seen = HashSet::new();
    let mut stack = vec![0usize];
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        for &neighbor in &graph[current] {
            if !seen.contains(&neighbor) {
                stack.push(neighbor);
            }
        }
    }
    seen.len() == graph.len()
}
