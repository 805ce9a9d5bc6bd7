use super::{TripId, TripPoint};
use crate::util::geo_utils;
use geo::{LineString, Point};
use serde::{Deserialize, Serialize};

/// the time-ordered GPS samples of one recording session.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Trip {
    pub trip_id: TripId,
    pub points: Vec<TripPoint>,
}

impl Trip {
    /// builds a trip, ordering the points by timestamp.
    pub fn new(trip_id: TripId, mut points: Vec<TripPoint>) -> Trip {
        points.sort_by_key(|p| p.recorded_at);
        Trip { trip_id, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn origin(&self) -> Option<Point<f64>> {
        self.points.first().map(TripPoint::point)
    }

    pub fn destination(&self) -> Option<Point<f64>> {
        self.points.last().map(TripPoint::point)
    }

    pub fn track(&self) -> LineString<f64> {
        self.points.iter().map(|p| p.point().0).collect()
    }

    /// great-circle distance travelled from the first point up to each point, in meters.
    pub fn cumulative_meters(&self) -> Vec<f64> {
        let mut total = 0.0;
        let mut result = Vec::with_capacity(self.points.len());
        for (idx, point) in self.points.iter().enumerate() {
            if idx > 0 {
                total += geo_utils::haversine_distance(&self.points[idx - 1].point(), &point.point());
            }
            result.push(total);
        }
        result
    }
}
