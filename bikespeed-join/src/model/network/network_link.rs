use super::parse_optional;
use crate::model::JoinError;
use bikespeed_core::{
    model::{LinkId, NodeId, RoadAttributes},
    util::geo_utils,
};
use geo::LineString;
use serde::{Deserialize, Serialize};
use wkt::TryFromWkt;

/// a row of the centreline links file.
///
/// CSV rows as currently defined:
/// link_id,fnode,tnode,lf_name,one_way_dir,speed_kmh,slope_tf,bike_code,
/// emme_match,emme_contra,geometry
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct NetworkLinkRow {
    pub link_id: i64,
    pub fnode: i64,
    pub tnode: i64,
    #[serde(default)]
    pub lf_name: String,
    #[serde(default)]
    pub one_way_dir: String,
    #[serde(default)]
    pub speed_kmh: String,
    #[serde(default)]
    pub slope_tf: String,
    #[serde(default)]
    pub bike_code: String,
    #[serde(default)]
    pub emme_match: String,
    #[serde(default)]
    pub emme_contra: String,
    /// WKT LINESTRING in lon/lat, digitized from fnode to tnode
    pub geometry: String,
}

/// a centreline link with its parsed geometry and attributes.
#[derive(Clone, Debug)]
pub struct NetworkLink {
    pub link_id: LinkId,
    pub fnode: NodeId,
    pub tnode: NodeId,
    pub attributes: RoadAttributes,
    pub geometry: LineString<f64>,
    pub length_m: f64,
}

impl NetworkLink {
    pub fn new(
        link_id: LinkId,
        fnode: NodeId,
        tnode: NodeId,
        attributes: RoadAttributes,
        geometry: LineString<f64>,
    ) -> NetworkLink {
        let length_m = geo_utils::linestring_length_m(&geometry);
        NetworkLink {
            link_id,
            fnode,
            tnode,
            attributes,
            geometry,
            length_m,
        }
    }

    /// true if travel from fnode to tnode is allowed.
    pub fn allows_forward(&self) -> bool {
        self.attributes.one_way_dir >= 0
    }

    /// true if travel from tnode to fnode is allowed.
    pub fn allows_reverse(&self) -> bool {
        self.attributes.one_way_dir <= 0
    }
}

impl TryFrom<NetworkLinkRow> for NetworkLink {
    type Error = JoinError;

    fn try_from(row: NetworkLinkRow) -> Result<Self, Self::Error> {
        let geometry = LineString::<f64>::try_from_wkt_str(&row.geometry)
            .map_err(|e| JoinError::InvalidWkt(row.link_id.to_string(), e.to_string()))?;
        if geometry.0.len() < 2 {
            return Err(JoinError::InvalidWkt(
                row.link_id.to_string(),
                String::from("linestring needs at least 2 coordinates"),
            ));
        }
        let attributes = RoadAttributes {
            name: row.lf_name.trim().to_string(),
            one_way_dir: parse_optional::<i8>(&row.one_way_dir)
                .unwrap_or_default()
                .signum(),
            speed_kmh: parse_optional(&row.speed_kmh),
            slope: parse_optional(&row.slope_tf).unwrap_or_default(),
            bike_code: parse_optional(&row.bike_code).unwrap_or_default(),
            emme_match: parse_optional(&row.emme_match),
            emme_contra: parse_optional(&row.emme_contra),
        };
        Ok(NetworkLink::new(
            LinkId(row.link_id),
            NodeId(row.fnode),
            NodeId(row.tnode),
            attributes,
            geometry,
        ))
    }
}
