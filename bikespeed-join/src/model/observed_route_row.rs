use bikespeed_core::model::RouteEdge;
use serde::{Deserialize, Serialize};
use wkt::ToWkt;

/// a row of the `<trip_id>_observed_route.csv` file, one per route edge in
/// travel order.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ObservedRouteRow {
    pub sequence: usize,
    pub link_id: i64,
    pub fnode: i64,
    pub tnode: i64,
    pub lf_name: String,
    pub one_way_dir: i8,
    pub speed_kmh: Option<f64>,
    pub slope_tf: f64,
    pub bike_code: i32,
    pub emme_match: Option<i64>,
    pub emme_contra: Option<i64>,
    pub length_m: f64,
    pub link_dir: Option<i8>,
    pub geometry: String,
}

impl From<&RouteEdge> for ObservedRouteRow {
    fn from(edge: &RouteEdge) -> Self {
        ObservedRouteRow {
            sequence: edge.sequence,
            link_id: edge.link_id.0,
            fnode: edge.fnode.0,
            tnode: edge.tnode.0,
            lf_name: edge.attributes.name.clone(),
            one_way_dir: edge.attributes.one_way_dir,
            speed_kmh: edge.attributes.speed_kmh,
            slope_tf: edge.attributes.slope,
            bike_code: edge.attributes.bike_code,
            emme_match: edge.attributes.emme_match,
            emme_contra: edge.attributes.emme_contra,
            length_m: edge.length_m,
            link_dir: edge.link_dir.map(|d| d.sign()),
            geometry: edge.geometry.to_wkt().to_string(),
        }
    }
}
