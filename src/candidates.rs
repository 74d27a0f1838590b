//! Per-point neighbor ranking by the cheap estimator.
//!
//! Bounds how many real oracle calls the tour builder makes: at each
//! greedy step only the first few candidates get a real distance fetch.
//! Built once per top-level call over the full point slice; recursion
//! operates on index subsets of that slice.

use crate::geometry::Point;
use crate::traits::RouteOracle;

/// A neighbor of a source point, by index into the top-level slice.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub idx: usize,
    pub approx: f64,
}

/// For every point, all other points ordered ascending by cheap
/// distance. Immutable after construction.
#[derive(Debug)]
pub struct CandidateIndex {
    neighbors: Vec<Vec<Candidate>>,
}

impl CandidateIndex {
    /// O(N² log N); no fallible oracle calls. The sort is stable, so
    /// equal-distance neighbors keep input order.
    pub fn build<O: RouteOracle>(points: &[Point], oracle: &O) -> Self {
        let neighbors = points
            .iter()
            .enumerate()
            .map(|(i, origin)| {
                let mut list: Vec<Candidate> = points
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(j, dest)| Candidate {
                        idx: j,
                        approx: oracle.estimate_distance(*origin, *dest),
                    })
                    .collect();
                list.sort_by(|a, b| a.approx.total_cmp(&b.approx));
                list
            })
            .collect();

        Self { neighbors }
    }

    /// Neighbors of `idx`, nearest first.
    pub fn neighbors_of(&self, idx: usize) -> &[Candidate] {
        &self.neighbors[idx]
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}
