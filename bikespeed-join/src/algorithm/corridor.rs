use bikespeed_core::util::geo_utils;
use geo::{line_measures::Densifiable, LineString, Point};
use rstar::{primitives::GeomWithData, RTree};
use wkt::ToWkt;

/// the area within a fixed radius of any observed GPS point of a trip. route
/// solving is restricted to links lying entirely inside the corridor.
pub struct Corridor {
    rtree: RTree<GeomWithData<[f64; 2], usize>>,
    track: LineString<f64>,
    radius_m: f64,
    radius_deg: f64,
}

impl Corridor {
    /// buffers each observed point by `radius_m` and dissolves the result.
    pub fn buffer(track: &LineString<f64>, radius_m: f64) -> Corridor {
        let max_lat = track.0.iter().map(|c| c.y.abs()).fold(0.0, f64::max);
        let rtree = RTree::bulk_load(
            track
                .0
                .iter()
                .enumerate()
                .map(|(idx, c)| GeomWithData::new([c.x, c.y], idx))
                .collect(),
        );
        Corridor {
            rtree,
            track: track.clone(),
            radius_m,
            radius_deg: geo_utils::meters_to_degrees(radius_m, max_lat),
        }
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn contains_point(&self, point: &Point<f64>) -> bool {
        self.rtree
            .locate_within_distance([point.x(), point.y()], self.radius_deg * self.radius_deg)
            .any(|entry| {
                let observed = Point::new(entry.geom()[0], entry.geom()[1]);
                geo_utils::haversine_distance(point, &observed) <= self.radius_m
            })
    }

    /// true if every part of the line lies inside the corridor. the line is
    /// densified to half the buffer radius before each vertex is tested.
    pub fn contains_line(&self, line: &LineString<f64>) -> bool {
        let step = (self.radius_m / 2.0).max(1.0);
        line.densify(&geo_utils::HAVERSINE, step)
            .points()
            .all(|p| self.contains_point(&p))
    }

    /// WKT description of the corridor: the observed track and the buffer radius.
    pub fn describe(&self) -> String {
        format!("# buffer {} meters\n{}\n", self.radius_m, self.track.to_wkt())
    }
}

#[cfg(test)]
mod tests {
    use super::Corridor;
    use geo::{line_string, point};

    #[test]
    fn contains_points_near_track() {
        let track = line_string![(x: 0.0, y: 0.0), (x: 0.0002, y: 0.0), (x: 0.0004, y: 0.0)];
        let corridor = Corridor::buffer(&track, 50.0);
        assert!(corridor.contains_point(&point!(x: 0.0001, y: 0.0003)));
        assert!(!corridor.contains_point(&point!(x: 0.0001, y: 0.001)));
    }

    #[test]
    fn doubling_radius_admits_more_links() {
        let track = line_string![(x: 0.0, y: 0.0), (x: 0.0004, y: 0.0), (x: 0.0008, y: 0.0)];
        // a parallel street about 70 m away
        let street = line_string![(x: 0.0, y: 0.00063), (x: 0.0008, y: 0.00063)];
        assert!(!Corridor::buffer(&track, 50.0).contains_line(&street));
        assert!(Corridor::buffer(&track, 100.0).contains_line(&street));
    }

    #[test]
    fn long_segment_leaving_corridor_midway_is_rejected() {
        // two observed clusters 1 km apart; the straight link between them
        // has both endpoints inside but its middle is far from any point
        let track = line_string![(x: 0.0, y: 0.0), (x: 0.009, y: 0.0)];
        let corridor = Corridor::buffer(&track, 50.0);
        let link = line_string![(x: 0.0, y: 0.0), (x: 0.009, y: 0.0)];
        assert!(corridor.contains_point(&point!(x: 0.0, y: 0.0)));
        assert!(corridor.contains_point(&point!(x: 0.009, y: 0.0)));
        assert!(!corridor.contains_line(&link));
    }
}
