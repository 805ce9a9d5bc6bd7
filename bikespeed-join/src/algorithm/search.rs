use crate::model::{network::RoadNetwork, JoinError, RouteRequest, RouteSolver};
use bikespeed_core::model::{LinkId, NodeId};
use ordered_float::OrderedFloat;
use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
    sync::Arc,
};

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: OrderedFloat<f64>,
    node: NodeId,
}

// Min-heap by cost, ties broken by node id for determinism
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// shortest path by link length between two junctions, only traversing the
/// links accepted by `is_traversable`. one-way restrictions are encoded in
/// the network adjacency.
///
/// # Returns
///
/// the ordered links of the path, or None if the target is unreachable.
pub fn shortest_path<F>(
    network: &RoadNetwork,
    source: NodeId,
    target: NodeId,
    mut is_traversable: F,
) -> Option<Vec<LinkId>>
where
    F: FnMut(&LinkId) -> bool,
{
    let mut distances: HashMap<NodeId, OrderedFloat<f64>> = HashMap::new();
    let mut predecessors: HashMap<NodeId, (NodeId, LinkId)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    distances.insert(source, OrderedFloat(0.0));
    heap.push(State {
        cost: OrderedFloat(0.0),
        node: source,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if node == target {
            break;
        }
        if distances.get(&node).is_some_and(|best| cost > *best) {
            continue;
        }
        for (next, link_id) in network.out_links(&node) {
            if !is_traversable(link_id) {
                continue;
            }
            let Ok(link) = network.get_link(link_id) else {
                continue;
            };
            let next_cost = cost + OrderedFloat(link.length_m);
            let improves = distances.get(next).map_or(true, |best| next_cost < *best);
            if improves {
                distances.insert(*next, next_cost);
                predecessors.insert(*next, (node, *link_id));
                heap.push(State {
                    cost: next_cost,
                    node: *next,
                });
            }
        }
    }

    if !distances.contains_key(&target) {
        return None;
    }
    let mut path = vec![];
    let mut current = target;
    while current != source {
        let (prev, link_id) = predecessors.get(&current)?;
        path.push(*link_id);
        current = *prev;
    }
    path.reverse();
    Some(path)
}

/// in-process route solver over a [`RoadNetwork`].
///
/// origin and destination are located on the nearest junction within the
/// locate tolerance. the path is the shortest one using only links that lie
/// inside the request corridor.
pub struct NetworkRouteSolver {
    network: Arc<RoadNetwork>,
    locate_tolerance_m: f64,
}

impl NetworkRouteSolver {
    pub fn new(network: Arc<RoadNetwork>, locate_tolerance_m: f64) -> NetworkRouteSolver {
        NetworkRouteSolver {
            network,
            locate_tolerance_m,
        }
    }
}

impl RouteSolver for NetworkRouteSolver {
    fn solve(&self, request: &RouteRequest) -> Result<Vec<LinkId>, JoinError> {
        let unsolved = |reason: String| JoinError::RouteUnsolved {
            trip_id: request.trip_id,
            reason,
        };
        let (source, _) = self
            .network
            .nearest_node(&request.origin, self.locate_tolerance_m)
            .ok_or_else(|| unsolved(String::from("origin could not be located on the network")))?;
        let (target, _) = self
            .network
            .nearest_node(&request.destination, self.locate_tolerance_m)
            .ok_or_else(|| {
                unsolved(String::from(
                    "destination could not be located on the network",
                ))
            })?;
        if source == target {
            return Err(unsolved(format!(
                "origin and destination both located at junction {source}"
            )));
        }

        // corridor tests are memoized, a link may be reached from both ends
        let corridor = request.corridor;
        let network = &self.network;
        let mut inside: HashMap<LinkId, bool> = HashMap::new();
        let is_traversable = |link_id: &LinkId| -> bool {
            *inside.entry(*link_id).or_insert_with(|| {
                network
                    .get_link(link_id)
                    .map(|link| corridor.contains_line(&link.geometry))
                    .unwrap_or(false)
            })
        };
        shortest_path(network, source, target, is_traversable).ok_or_else(|| {
            unsolved(format!(
                "no path from junction {source} to {target} within {} meters of the track",
                corridor.radius_m()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Corridor;
    use crate::model::network::RoadNetwork;
    use geo::{line_string, point};

    /// a ladder: a southern street (links 1, 2) and a northern street (links 4, 5)
    /// joined by rungs at each end and in the middle (3, 6, 7).
    fn ladder(north_one_way: i8) -> RoadNetwork {
        use crate::model::network::road_network::tests::link;
        RoadNetwork::new(vec![
            link(1, 1, 2, (0.0, 0.0), (0.001, 0.0), 0),
            link(2, 2, 3, (0.001, 0.0), (0.002, 0.0), 0),
            link(3, 1, 4, (0.0, 0.0), (0.0, 0.0005), 0),
            link(4, 4, 5, (0.0, 0.0005), (0.001, 0.0005), north_one_way),
            link(5, 5, 6, (0.001, 0.0005), (0.002, 0.0005), north_one_way),
            link(6, 3, 6, (0.002, 0.0), (0.002, 0.0005), 0),
            link(7, 2, 5, (0.001, 0.0), (0.001, 0.0005), 0),
        ])
    }

    #[test]
    fn finds_shortest_path() {
        let network = ladder(0);
        let path = shortest_path(&network, NodeId(1), NodeId(3), |_| true);
        assert_eq!(path, Some(vec![LinkId(1), LinkId(2)]));
    }

    #[test]
    fn respects_one_way_links() {
        let network = ladder(-1);
        // northern street only allows westbound travel
        let path = shortest_path(&network, NodeId(4), NodeId(6), |_| true);
        assert_eq!(
            path,
            Some(vec![LinkId(3), LinkId(1), LinkId(2), LinkId(6)])
        );
        let back = shortest_path(&network, NodeId(6), NodeId(4), |_| true);
        assert_eq!(back, Some(vec![LinkId(5), LinkId(4)]));
    }

    #[test]
    fn unreachable_target_is_none() {
        let network = ladder(0);
        let path = shortest_path(&network, NodeId(1), NodeId(3), |l| {
            *l != LinkId(2) && *l != LinkId(7) && *l != LinkId(3)
        });
        assert!(path.is_none());
    }

    #[test]
    fn solver_follows_corridor() {
        let network = Arc::new(ladder(0));
        let solver = NetworkRouteSolver::new(network, 100.0);
        // the cyclist rode along the northern street
        let track = line_string![
            (x: 0.0, y: 0.0001),
            (x: 0.0, y: 0.0005),
            (x: 0.0005, y: 0.0005),
            (x: 0.001, y: 0.0005),
            (x: 0.0015, y: 0.0005),
            (x: 0.002, y: 0.0005),
            (x: 0.002, y: 0.0001)
        ];
        let corridor = Corridor::buffer(&track, 30.0);
        let request = RouteRequest {
            trip_id: 1,
            origin: point!(x: 0.0, y: 0.0),
            destination: point!(x: 0.002, y: 0.0),
            corridor: &corridor,
        };
        let path = solver.solve(&request).expect("route inside corridor");
        assert_eq!(
            path,
            vec![LinkId(3), LinkId(4), LinkId(5), LinkId(6)]
        );
    }
}
