use super::{LinkDirection, LinkId, NodeId, RoadAttributes};
use geo::LineString;
use serde::{Deserialize, Serialize};

/// one network link of a solved route, in travel order.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RouteEdge {
    /// position of this edge along the route
    pub sequence: usize,
    pub link_id: LinkId,
    pub fnode: NodeId,
    pub tnode: NodeId,
    pub attributes: RoadAttributes,
    /// link length in meters
    pub length_m: f64,
    pub geometry: LineString<f64>,
    /// assigned once the route has been resolved
    pub link_dir: Option<LinkDirection>,
}

impl RouteEdge {
    pub fn nodes(&self) -> [NodeId; 2] {
        [self.fnode, self.tnode]
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        self.fnode == *node || self.tnode == *node
    }
}
