use super::{JoinError, RouteRequest};
use bikespeed_core::model::LinkId;

/// a network routing capability. given an origin/destination pair and a
/// bounding corridor, returns the chosen path as an ordered list of network
/// links, or fails.
///
/// solvers are shared across the per-date workers and must not hold any
/// per-trip state.
pub trait RouteSolver: Sync {
    fn solve(&self, request: &RouteRequest) -> Result<Vec<LinkId>, JoinError>;
}
