use serde::{Deserialize, Serialize};

/// roadway attributes carried by a centreline link.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RoadAttributes {
    /// street name
    pub name: String,
    /// 0 for two-way travel, 1 if only FNODE -> TNODE is allowed, -1 if only TNODE -> FNODE
    pub one_way_dir: i8,
    pub speed_kmh: Option<f64>,
    /// grade along the digitized direction
    pub slope: f64,
    /// bike facility code
    pub bike_code: i32,
    /// EMME link matching travel in the digitized direction
    pub emme_match: Option<i64>,
    /// EMME link matching travel against the digitized direction
    pub emme_contra: Option<i64>,
}
