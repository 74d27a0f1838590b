//! Route subdivision: the split decision and the spatial partition.
//!
//! A built route is split when its geometry folds back over itself
//! (overlap ratio) or when the tour is long relative to the direct
//! distance between its ends (detour ratio). The partition fits an
//! ordinary least-squares line over raw (lat, lng) treated as Cartesian
//! coordinates; this degrades near the poles and the antimeridian, with
//! no compensation applied.

use tracing::debug;

use crate::cache::DistanceCache;
use crate::geometry::{Point, Route};
use crate::traits::{PlanError, RouteOracle};

/// Split when at least this share of geometry points falls inside
/// another step's bounding box.
const OVERLAP_THRESHOLD: f64 = 0.25;

/// Split when tour distance exceeds the direct first-to-last distance
/// by this factor.
const DETOUR_THRESHOLD: f64 = 1.75;

/// Decides whether `route` should be subdivided. The detour check is
/// only evaluated when the overlap check does not already trigger,
/// saving its real-distance fetch.
pub fn should_split<O: RouteOracle>(
    route: &Route,
    cache: &mut DistanceCache,
    oracle: &O,
) -> Result<bool, PlanError> {
    let overlap = overlap_ratio(route);
    if overlap >= OVERLAP_THRESHOLD {
        debug!(overlap, "split triggered by geometry overlap");
        return Ok(true);
    }

    let first = route.stops[0];
    let last = route.stops[route.stops.len() - 1];
    let direct = cache.travel_distance(oracle, first, last)?;
    let detour = if direct > 0.0 {
        route.total_distance / direct
    } else {
        f64::INFINITY
    };
    if detour >= DETOUR_THRESHOLD {
        debug!(overlap, detour, "split triggered by detour ratio");
        return Ok(true);
    }

    Ok(false)
}

/// Share of geometry points lying inside some other step's bounding
/// box, over every step pair whose boxes intersect. Steps are the
/// backend's maneuver geometry, finer-grained than stops.
pub fn overlap_ratio(route: &Route) -> f64 {
    let steps: Vec<_> = route
        .segments
        .iter()
        .flat_map(|segment| segment.steps.iter())
        .collect();
    let bboxes: Vec<_> = steps.iter().map(|step| step.bounding_box()).collect();

    let total_points: usize = steps.iter().map(|step| step.points().len()).sum();
    if total_points == 0 {
        return 0.0;
    }

    let mut inside = 0usize;
    for i in 0..steps.len() {
        let Some(bbox) = bboxes[i] else { continue };
        for j in i + 1..steps.len() {
            let Some(other) = bboxes[j] else { continue };
            if bbox.intersects(&other) {
                inside += steps[j]
                    .points()
                    .iter()
                    .filter(|point| bbox.contains(**point))
                    .count();
            }
        }
    }

    inside as f64 / total_points as f64
}

/// Partitions `subset` by the fitted line: side A holds points whose
/// lng lies above it, side B the rest. A degenerate fit (all points at
/// one lat) yields NaN coefficients and puts everything on side B; the
/// caller treats any sub-2-point half as an abandoned split.
pub fn partition(subset: &[usize], points: &[Point]) -> (Vec<usize>, Vec<usize>) {
    let (m, b) = linear_regression(subset.iter().map(|&i| (points[i].lat, points[i].lng)));

    let mut side_a = Vec::new();
    let mut side_b = Vec::new();
    for &i in subset {
        if points[i].lng > m * points[i].lat + b {
            side_a.push(i);
        } else {
            side_b.push(i);
        }
    }
    (side_a, side_b)
}

/// Ordinary least squares over (x, y) pairs; returns (slope, intercept).
fn linear_regression(data: impl Iterator<Item = (f64, f64)>) -> (f64, f64) {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    let mut count = 0.0;

    for (x, y) in data {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
        count += 1.0;
    }

    let m = (count * sum_xy - sum_x * sum_y) / (count * sum_xx - sum_x * sum_x);
    let b = sum_y / count - (m * sum_x) / count;
    (m, b)
}
