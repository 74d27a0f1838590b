//! Oracle capability trait and planner error types.
//!
//! The oracle is consumed, never implemented here beyond adapters:
//! concrete backends (OSRM, test stubs) implement [`RouteOracle`] for
//! their own transport.

use std::error::Error;
use std::fmt;

use crate::geometry::{Point, RouteGeometry};

/// External distance/route service.
///
/// `estimate_distance` is cheap and infallible; the remaining calls hit
/// the backend and may fail. All distances are meters.
pub trait RouteOracle {
    /// Cheap deterministic geometric estimate, used only for ranking.
    fn estimate_distance(&self, a: Point, b: Point) -> f64;

    /// Real travel distance from `a` to `b` (not necessarily symmetric).
    fn travel_distance(&self, a: Point, b: Point) -> Result<f64, OracleError>;

    /// Real route geometry from `a` to `b`, with its total distance.
    fn travel_route(&self, a: Point, b: Point) -> Result<RouteGeometry, OracleError>;

    /// One-to-many travel distances, in destination order.
    fn batch_travel_distance(
        &self,
        origin: Point,
        destinations: &[Point],
    ) -> Result<Vec<f64>, OracleError>;
}

/// Failure of an oracle call (transport error, malformed response, ...).
#[derive(Debug, Clone)]
pub struct OracleError {
    pub message: String,
}

impl OracleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oracle call failed: {}", self.message)
    }
}

impl Error for OracleError {}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Planner failure. No partial results accompany any variant; callers
/// re-invoke from scratch.
#[derive(Debug)]
pub enum PlanError {
    /// An oracle call failed; not retried internally.
    Oracle(OracleError),
    /// Input rejected before any oracle call was made.
    InvalidInput(&'static str),
    /// The connector exhausted eligible pairs while the graph was still
    /// disconnected. Structurally unreachable; raised rather than
    /// silently looping.
    Disconnected,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Oracle(err) => write!(f, "{err}"),
            PlanError::InvalidInput(what) => write!(f, "invalid input: {what}"),
            PlanError::Disconnected => {
                write!(f, "connector exhausted candidate pairs on a disconnected graph")
            }
        }
    }
}

impl Error for PlanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PlanError::Oracle(err) => Some(err),
            _ => None,
        }
    }
}

impl From<OracleError> for PlanError {
    fn from(err: OracleError) -> Self {
        PlanError::Oracle(err)
    }
}
