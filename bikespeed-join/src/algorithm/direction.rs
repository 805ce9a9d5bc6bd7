//! assigns a travel direction to each edge of a solved route by looking at
//! the junction each edge shares with its neighbor.
use crate::model::JoinError;
use bikespeed_core::model::{LinkDirection, NodeId, RouteEdge};
use std::collections::HashSet;

/// finds the single junction shared by two consecutive route edges.
///
/// # Arguments
///
/// * `edges` - the route
/// * `upstream` - index of the first edge
/// * `downstream` - index of the second edge
///
/// # Returns
///
/// the shared node, or an AmbiguousAdjacency error if the edges share no
/// node (disconnected) or both nodes (parallel links / self-intersection).
pub fn shared_junction(
    edges: &[RouteEdge],
    upstream: usize,
    downstream: usize,
) -> Result<NodeId, JoinError> {
    let (a, b) = match (edges.get(upstream), edges.get(downstream)) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(JoinError::AmbiguousAdjacency {
                upstream,
                downstream,
                shared: 0,
            })
        }
    };
    let a_nodes: HashSet<NodeId> = a.nodes().into_iter().collect();
    let b_nodes: HashSet<NodeId> = b.nodes().into_iter().collect();
    let shared: Vec<&NodeId> = a_nodes.intersection(&b_nodes).collect();
    match shared.as_slice() {
        [node] => Ok(**node),
        _ => Err(JoinError::AmbiguousAdjacency {
            upstream,
            downstream,
            shared: shared.len(),
        }),
    }
}

/// computes the direction of travel along each route edge.
///
/// an interior edge runs forward when its TNODE is the junction shared with
/// the next edge. the last edge runs forward when its FNODE is the junction
/// shared with the previous edge.
///
/// # Returns
///
/// one direction per edge, or None for routes of zero or one edge where no
/// direction can be determined.
pub fn resolve_directions(edges: &[RouteEdge]) -> Result<Option<Vec<LinkDirection>>, JoinError> {
    if edges.len() <= 1 {
        return Ok(None);
    }
    let mut directions = Vec::with_capacity(edges.len());
    for idx in 0..edges.len() - 1 {
        let junction = shared_junction(edges, idx, idx + 1)?;
        let dir = if edges[idx].tnode == junction {
            LinkDirection::Forward
        } else {
            LinkDirection::Reverse
        };
        directions.push(dir);
    }
    let last = edges.len() - 1;
    let junction = shared_junction(edges, last, last - 1)?;
    let dir = if edges[last].fnode == junction {
        LinkDirection::Forward
    } else {
        LinkDirection::Reverse
    };
    directions.push(dir);
    Ok(Some(directions))
}

/// resolves and stores the `link_dir` of every edge. edges are left
/// untouched when the route is too short to resolve or resolution fails.
pub fn match_route_direction(edges: &mut [RouteEdge]) -> Result<(), JoinError> {
    if let Some(directions) = resolve_directions(edges)? {
        for (edge, dir) in edges.iter_mut().zip(directions) {
            edge.link_dir = Some(dir);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bikespeed_core::model::{LinkId, RoadAttributes};
    use geo::LineString;

    fn edge(sequence: usize, fnode: i64, tnode: i64) -> RouteEdge {
        RouteEdge {
            sequence,
            link_id: LinkId(sequence as i64),
            fnode: NodeId(fnode),
            tnode: NodeId(tnode),
            attributes: RoadAttributes::default(),
            length_m: 0.0,
            geometry: LineString::new(vec![]),
            link_dir: None,
        }
    }

    #[test]
    fn short_routes_get_no_direction() {
        assert!(resolve_directions(&[]).expect("no error").is_none());
        let mut single = vec![edge(0, 1, 2)];
        match_route_direction(&mut single).expect("no error");
        assert_eq!(single[0].link_dir, None);
    }

    #[test]
    fn mixed_digitization() {
        // travel 1 -> 2 -> 3 -> 4 -> 5, where edges 1 and 3 are digitized backwards
        let mut route = vec![edge(0, 1, 2), edge(1, 3, 2), edge(2, 3, 4), edge(3, 5, 4)];
        match_route_direction(&mut route).expect("route is connected");
        let result = route.iter().map(|e| e.link_dir).collect::<Vec<_>>();
        assert_eq!(
            result,
            vec![
                Some(LinkDirection::Forward),
                Some(LinkDirection::Reverse),
                Some(LinkDirection::Forward),
                Some(LinkDirection::Reverse),
            ]
        );
    }

    #[test]
    fn shared_node_is_tnode_iff_forward() {
        let pairs = [
            (edge(0, 1, 2), edge(1, 2, 3)),
            (edge(0, 2, 1), edge(1, 2, 3)),
            (edge(0, 1, 2), edge(1, 3, 2)),
            (edge(0, 2, 1), edge(1, 3, 2)),
        ];
        for (a, b) in pairs {
            let route = vec![a, b];
            let dirs = resolve_directions(&route)
                .expect("connected")
                .expect("two edges");
            let junction = shared_junction(&route, 0, 1).expect("one shared node");
            assert_eq!(route[0].tnode == junction, dirs[0] == LinkDirection::Forward);
            assert_eq!(route[1].fnode == junction, dirs[1] == LinkDirection::Forward);
        }
    }

    #[test]
    fn disconnected_edges_fail() {
        let route = vec![edge(0, 1, 2), edge(1, 3, 4)];
        match resolve_directions(&route) {
            Err(JoinError::AmbiguousAdjacency { shared, .. }) => assert_eq!(shared, 0),
            other => panic!("expected ambiguous adjacency, found {other:?}"),
        }
    }

    #[test]
    fn parallel_edges_fail() {
        let mut route = vec![edge(0, 1, 2), edge(1, 2, 1), edge(2, 1, 5)];
        match match_route_direction(&mut route) {
            Err(JoinError::AmbiguousAdjacency {
                upstream,
                downstream,
                shared,
            }) => {
                assert_eq!((upstream, downstream, shared), (0, 1, 2));
            }
            other => panic!("expected ambiguous adjacency, found {other:?}"),
        }
        assert!(route.iter().all(|e| e.link_dir.is_none()));
    }
}
