use bikespeed_core::{model::RouteEdge, util::geo_utils};
use geo::Point;
use rstar::{
    primitives::{GeomWithData, Line},
    RTree,
};

type SegmentEntry = GeomWithData<Line<[f64; 2]>, usize>;

/// spatial index over the segments of a solved route, used to join each GPS
/// point to its closest route edge.
pub struct EdgeIndex<'a> {
    edges: &'a [RouteEdge],
    rtree: RTree<SegmentEntry>,
}

impl<'a> EdgeIndex<'a> {
    pub fn new(edges: &'a [RouteEdge]) -> EdgeIndex<'a> {
        let segments = edges
            .iter()
            .enumerate()
            .flat_map(|(idx, edge)| {
                edge.geometry.lines().map(move |l| {
                    GeomWithData::new(
                        Line::new([l.start.x, l.start.y], [l.end.x, l.end.y]),
                        idx,
                    )
                })
            })
            .collect();
        EdgeIndex {
            edges,
            rtree: RTree::bulk_load(segments),
        }
    }

    /// finds the route edge closest to a point within a search radius.
    ///
    /// # Returns
    ///
    /// the edge and the distance to it in meters, or None if no edge is
    /// within `radius_m`. ties go to the earlier edge of the route.
    pub fn nearest(&self, point: &Point<f64>, radius_m: f64) -> Option<(&'a RouteEdge, f64)> {
        let radius_deg = geo_utils::meters_to_degrees(radius_m, point.y());
        let mut best: Option<(usize, f64)> = None;
        for entry in self
            .rtree
            .locate_within_distance([point.x(), point.y()], radius_deg * radius_deg)
        {
            let edge_idx = entry.data;
            let Some(distance) =
                geo_utils::distance_to_linestring_m(point, &self.edges[edge_idx].geometry)
            else {
                continue;
            };
            if distance > radius_m {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_idx, best_distance)) => {
                    distance < best_distance || (distance == best_distance && edge_idx < best_idx)
                }
            };
            if better {
                best = Some((edge_idx, distance));
            }
        }
        best.map(|(idx, distance)| (&self.edges[idx], distance))
    }
}

#[cfg(test)]
mod tests {
    use super::EdgeIndex;
    use crate::model::network::road_network::tests::link;
    use crate::model::network::RoadNetwork;
    use bikespeed_core::model::LinkId;
    use geo::point;

    #[test]
    fn joins_to_closest_edge_within_radius() {
        let network = RoadNetwork::new(vec![
            link(1, 1, 2, (0.0, 0.0), (0.001, 0.0), 0),
            link(2, 2, 3, (0.001, 0.0), (0.001, 0.001), 0),
        ]);
        let edges = network
            .route_edges(&[LinkId(1), LinkId(2)])
            .expect("links exist");
        let index = EdgeIndex::new(&edges);

        let (edge, distance) = index
            .nearest(&point!(x: 0.0005, y: 0.0001), 100.0)
            .expect("edge within radius");
        assert_eq!(edge.link_id, LinkId(1));
        assert!((distance - 11.1).abs() < 0.2);

        let (edge, _) = index
            .nearest(&point!(x: 0.0011, y: 0.0008), 100.0)
            .expect("edge within radius");
        assert_eq!(edge.link_id, LinkId(2));

        assert!(index.nearest(&point!(x: 0.0005, y: 0.002), 100.0).is_none());
    }
}
