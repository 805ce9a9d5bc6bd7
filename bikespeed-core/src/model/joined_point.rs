use super::{RouteEdge, TripId, TripPoint};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// a GPS sample enriched with the attributes of its nearest route edge.
/// this is the row format written per trip by the route join and read back
/// by the cleaner.
///
/// road attribute columns are empty when no route edge was found within the
/// join radius. `sig_dist` is `-1` when the route passes no signalized
/// intersection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JoinedPoint {
    pub trip_id: TripId,
    pub sort_id: usize,
    pub recorded_at: NaiveDateTime,
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub speed: f64,
    pub h_accuracy: f64,
    pub v_accuracy: f64,
    pub age: u8,
    pub gender: u8,
    pub cycling_level: u8,
    pub cumul_meters: f64,
    pub link_id: Option<i64>,
    pub lf_name: Option<String>,
    pub one_way_dir: Option<i8>,
    pub speed_kmh: Option<f64>,
    pub slope_tf: Option<f64>,
    pub bike_code: Option<i32>,
    pub emme_match: Option<i64>,
    pub emme_contra: Option<i64>,
    pub link_length_m: Option<f64>,
    pub edge_distance_m: Option<f64>,
    pub sig_dist: f64,
    pub link_dir: Option<i8>,
}

impl JoinedPoint {
    /// copies the point attributes, leaving every road attribute empty.
    pub fn unmatched(point: &TripPoint, sort_id: usize, cumul_meters: f64) -> JoinedPoint {
        JoinedPoint {
            trip_id: point.trip_id,
            sort_id,
            recorded_at: point.recorded_at,
            longitude: point.longitude,
            latitude: point.latitude,
            altitude: point.altitude,
            speed: point.speed,
            h_accuracy: point.h_accuracy,
            v_accuracy: point.v_accuracy,
            age: point.survey.age,
            gender: point.survey.gender,
            cycling_level: point.survey.cycling_level,
            cumul_meters,
            link_id: None,
            lf_name: None,
            one_way_dir: None,
            speed_kmh: None,
            slope_tf: None,
            bike_code: None,
            emme_match: None,
            emme_contra: None,
            link_length_m: None,
            edge_distance_m: None,
            sig_dist: -1.0,
            link_dir: None,
        }
    }

    /// attaches the attributes of the nearest route edge.
    pub fn with_edge(mut self, edge: &RouteEdge, distance_m: f64) -> JoinedPoint {
        let attrs = &edge.attributes;
        self.link_id = Some(edge.link_id.0);
        self.lf_name = Some(attrs.name.clone());
        self.one_way_dir = Some(attrs.one_way_dir);
        self.speed_kmh = attrs.speed_kmh;
        self.slope_tf = Some(attrs.slope);
        self.bike_code = Some(attrs.bike_code);
        self.emme_match = attrs.emme_match;
        self.emme_contra = attrs.emme_contra;
        self.link_length_m = Some(edge.length_m);
        self.edge_distance_m = Some(distance_m);
        self.link_dir = edge.link_dir.map(|d| d.sign());
        self
    }
}
