use super::{NetworkLink, NetworkLinkRow};
use crate::model::JoinError;
use bikespeed_core::{
    model::{LinkId, NodeId, RouteEdge},
    util::geo_utils,
};
use geo::Point;
use kdam::tqdm;
use rstar::{primitives::GeomWithData, RTree};
use std::{collections::HashMap, path::Path};

pub type NodeEntry = GeomWithData<[f64; 2], NodeId>;

/// the centreline road network: links keyed by id, a directed adjacency list
/// respecting one-way restrictions, and a spatial index over junctions.
pub struct RoadNetwork {
    links: HashMap<LinkId, NetworkLink>,
    adjacency: HashMap<NodeId, Vec<(NodeId, LinkId)>>,
    node_locations: HashMap<NodeId, Point<f64>>,
    node_rtree: RTree<NodeEntry>,
}

impl RoadNetwork {
    pub fn new(links: Vec<NetworkLink>) -> RoadNetwork {
        let mut adjacency: HashMap<NodeId, Vec<(NodeId, LinkId)>> = HashMap::new();
        let mut node_locations: HashMap<NodeId, Point<f64>> = HashMap::new();
        for link in links.iter() {
            if let (Some(first), Some(last)) = (link.geometry.0.first(), link.geometry.0.last()) {
                node_locations.entry(link.fnode).or_insert(Point(*first));
                node_locations.entry(link.tnode).or_insert(Point(*last));
            }
            if link.allows_forward() {
                adjacency
                    .entry(link.fnode)
                    .or_default()
                    .push((link.tnode, link.link_id));
            }
            if link.allows_reverse() {
                adjacency
                    .entry(link.tnode)
                    .or_default()
                    .push((link.fnode, link.link_id));
            }
        }
        let node_rtree = RTree::bulk_load(
            node_locations
                .iter()
                .map(|(id, p)| GeomWithData::new([p.x(), p.y()], *id))
                .collect(),
        );
        let links = links.into_iter().map(|l| (l.link_id, l)).collect();
        RoadNetwork {
            links,
            adjacency,
            node_locations,
            node_rtree,
        }
    }

    /// reads a centreline links CSV. rows with invalid geometry are skipped
    /// with a warning.
    pub fn from_csv(path: &Path) -> Result<RoadNetwork, JoinError> {
        let filename = path.to_string_lossy().to_string();
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| JoinError::CsvReadError(filename.clone(), e))?;
        let mut links = vec![];
        for row in tqdm!(reader.deserialize::<NetworkLinkRow>(), desc = "read network links") {
            let row = row.map_err(|e| JoinError::CsvReadError(filename.clone(), e))?;
            match NetworkLink::try_from(row) {
                Ok(link) => links.push(link),
                Err(e) => log::warn!("{e}"),
            }
        }
        eprintln!();
        if links.is_empty() {
            return Err(JoinError::EmptyNetwork(filename));
        }
        log::info!("loaded {} network links from {filename}", links.len());
        Ok(RoadNetwork::new(links))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn get_link(&self, link_id: &LinkId) -> Result<&NetworkLink, JoinError> {
        self.links
            .get(link_id)
            .ok_or(JoinError::MissingLink(*link_id))
    }

    pub fn node_location(&self, node_id: &NodeId) -> Option<&Point<f64>> {
        self.node_locations.get(node_id)
    }

    /// the (destination node, link) pairs that may be traversed leaving a node.
    pub fn out_links(&self, node_id: &NodeId) -> &[(NodeId, LinkId)] {
        self.adjacency
            .get(node_id)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    /// finds the junction closest to a point, if one lies within the tolerance.
    ///
    /// # Returns
    ///
    /// the junction id and its distance in meters
    pub fn nearest_node(&self, point: &Point<f64>, tolerance_m: f64) -> Option<(NodeId, f64)> {
        let radius_deg = geo_utils::meters_to_degrees(tolerance_m, point.y());
        self.node_rtree
            .locate_within_distance([point.x(), point.y()], radius_deg * radius_deg)
            .filter_map(|entry| {
                let node_point = Point::new(entry.geom()[0], entry.geom()[1]);
                let distance = geo_utils::haversine_distance(point, &node_point);
                (distance <= tolerance_m).then_some((entry.data, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
    }

    /// decomposes a solved path into route edges, joining each link's attributes by id.
    pub fn route_edges(&self, path: &[LinkId]) -> Result<Vec<RouteEdge>, JoinError> {
        path.iter()
            .enumerate()
            .map(|(sequence, link_id)| {
                let link = self.get_link(link_id)?;
                Ok(RouteEdge {
                    sequence,
                    link_id: link.link_id,
                    fnode: link.fnode,
                    tnode: link.tnode,
                    attributes: link.attributes.clone(),
                    length_m: link.length_m,
                    geometry: link.geometry.clone(),
                    link_dir: None,
                })
            })
            .collect()
    }
}
