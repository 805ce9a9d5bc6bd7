use geo::{Closest, ClosestPoint, Distance, HaversineMeasure, Length, LineString, Point};

/// spherical earth radius used for all great-circle distances in this workspace.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// haversine metric space on a sphere of radius [`EARTH_RADIUS_M`].
pub const HAVERSINE: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_M);

/// great-circle distance in meters between two lon/lat points.
///
/// # Arguments
///
/// * `src` - point with x as longitude and y as latitude, in degrees
/// * `dst` - point with x as longitude and y as latitude, in degrees
pub fn haversine_distance(src: &Point<f64>, dst: &Point<f64>) -> f64 {
    HAVERSINE.distance(*src, *dst)
}

/// great-circle length of a linestring, in meters.
pub fn linestring_length_m(line: &LineString<f64>) -> f64 {
    HAVERSINE.length(line)
}

/// distance in meters from a point to the nearest location on a linestring.
/// the nearest location is found in lon/lat space, which is adequate at
/// street scale.
///
/// # Returns
///
/// None if the linestring is empty.
pub fn distance_to_linestring_m(point: &Point<f64>, line: &LineString<f64>) -> Option<f64> {
    match line.closest_point(point) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => Some(haversine_distance(point, &p)),
        Closest::Indeterminate => None,
    }
}

/// converts a distance in meters into a conservative lon/lat degree radius at
/// the given latitude, for use as a coarse spatial index search radius.
pub fn meters_to_degrees(meters: f64, latitude: f64) -> f64 {
    let meters_per_degree = EARTH_RADIUS_M.to_radians();
    let cos_lat = latitude.to_radians().cos().abs().max(0.01);
    meters / (meters_per_degree * cos_lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point};

    #[test]
    fn zero_distance_for_same_point() {
        let p = point!(x: 0.0, y: 0.0);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn quarter_circumference() {
        let src = point!(x: 0.0, y: 0.0);
        let dst = point!(x: 90.0, y: 0.0);
        let result = haversine_distance(&src, &dst);
        let expected = std::f64::consts::FRAC_PI_2 * EARTH_RADIUS_M;
        assert!(
            (result - expected).abs() < 1e-6,
            "value {result} should be within 1e-6 of {expected}"
        );
        assert!((result - 10_007_543.0).abs() < 1.0);
    }

    #[test]
    fn matches_textbook_haversine() {
        let src: Point<f64> = point!(x: -79.3832, y: 43.6532);
        let dst: Point<f64> = point!(x: -79.3470, y: 43.6629);
        let (lat1, lat2) = (src.y().to_radians(), dst.y().to_radians());
        let dlat = lat2 - lat1;
        let dlon = (dst.x() - src.x()).to_radians();
        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let expected = 2.0 * EARTH_RADIUS_M * h.sqrt().asin();
        assert!((haversine_distance(&src, &dst) - expected).abs() < 1e-6);
    }

    #[test]
    fn linestring_length_sums_segments() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 0.0, y: 2.0)];
        let one_degree = EARTH_RADIUS_M.to_radians();
        assert!((linestring_length_m(&line) - 2.0 * one_degree).abs() < 1e-6);
    }

    #[test]
    fn distance_to_linestring_uses_perpendicular() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0)];
        let p = point!(x: 0.001, y: 0.5);
        let result = distance_to_linestring_m(&p, &line).expect("line is not empty");
        let expected = haversine_distance(&p, &point!(x: 0.0, y: 0.5));
        assert!((result - expected).abs() < 1e-6);
    }

    #[test]
    fn degree_radius_covers_meters() {
        let lat = 43.65;
        let deg = meters_to_degrees(100.0, lat);
        let east = haversine_distance(&point!(x: -79.0, y: lat), &point!(x: -79.0 + deg, y: lat));
        assert!(east >= 99.9);
    }
}
