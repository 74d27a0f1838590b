//! tour-planner core
//!
//! Orders geographic stops into travel sequences and stitches disjoint
//! sequences into one connected service network, while keeping calls to
//! the external distance/route oracle to a minimum.

pub mod cache;
pub mod candidates;
pub mod connect;
pub mod geometry;
pub mod haversine;
pub mod osrm;
pub mod osrm_data;
pub mod planner;
pub mod split;
pub mod tour;
pub mod traits;
