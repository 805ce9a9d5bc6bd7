use crate::algorithm::Corridor;
use bikespeed_core::model::TripId;
use geo::Point;

/// the origin, destination and search corridor handed to a [`super::RouteSolver`].
pub struct RouteRequest<'a> {
    pub trip_id: TripId,
    pub origin: Point<f64>,
    pub destination: Point<f64>,
    pub corridor: &'a Corridor,
}
