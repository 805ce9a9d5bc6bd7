use crate::model::JoinError;
use bikespeed_core::{model::RouteEdge, util::geo_utils};
use geo::{BoundingRect, Point};
use rstar::{primitives::GeomWithData, RTree, AABB};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// a junction equipped with traffic signals.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SignalJunction {
    pub junction_id: i64,
    pub longitude: f64,
    pub latitude: f64,
}

impl SignalJunction {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// all signalized junctions, indexed for lookup along a route.
pub struct SignalLayer {
    rtree: RTree<GeomWithData<[f64; 2], usize>>,
    junctions: Vec<SignalJunction>,
}

impl SignalLayer {
    pub fn new(junctions: Vec<SignalJunction>) -> SignalLayer {
        let rtree = RTree::bulk_load(
            junctions
                .iter()
                .enumerate()
                .map(|(idx, j)| GeomWithData::new([j.longitude, j.latitude], idx))
                .collect(),
        );
        SignalLayer { rtree, junctions }
    }

    pub fn from_csv(path: &Path) -> Result<SignalLayer, JoinError> {
        let filename = path.to_string_lossy().to_string();
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| JoinError::CsvReadError(filename.clone(), e))?;
        let junctions = reader
            .deserialize::<SignalJunction>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| JoinError::CsvReadError(filename.clone(), e))?;
        log::info!("loaded {} signalized junctions from {filename}", junctions.len());
        Ok(SignalLayer::new(junctions))
    }

    pub fn len(&self) -> usize {
        self.junctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty()
    }

    /// selects the signalized junctions lying within `radius_m` of any edge of a route.
    pub fn on_route(&self, edges: &[RouteEdge], radius_m: f64) -> Vec<&SignalJunction> {
        let rects = edges
            .iter()
            .filter_map(|e| e.geometry.bounding_rect())
            .collect::<Vec<_>>();
        let Some(first) = rects.first() else {
            return vec![];
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) =
            (first.min().x, first.min().y, first.max().x, first.max().y);
        for rect in rects.iter() {
            min_x = min_x.min(rect.min().x);
            min_y = min_y.min(rect.min().y);
            max_x = max_x.max(rect.max().x);
            max_y = max_y.max(rect.max().y);
        }
        let pad = geo_utils::meters_to_degrees(radius_m, max_y.abs().max(min_y.abs()));
        let envelope = AABB::from_corners([min_x - pad, min_y - pad], [max_x + pad, max_y + pad]);

        let mut found = self
            .rtree
            .locate_in_envelope(&envelope)
            .map(|entry| &self.junctions[entry.data])
            .filter(|junction| {
                let p = junction.point();
                edges.iter().any(|edge| {
                    geo_utils::distance_to_linestring_m(&p, &edge.geometry)
                        .is_some_and(|d| d <= radius_m)
                })
            })
            .collect::<Vec<_>>();
        found.sort_by_key(|j| j.junction_id);
        found
    }
}

/// distance in meters from a point to the closest of a set of junctions, or
/// `-1` when there are none.
pub fn nearest_signal_distance(point: &Point<f64>, signals: &[&SignalJunction]) -> f64 {
    signals
        .iter()
        .map(|s| geo_utils::haversine_distance(point, &s.point()))
        .min_by(|a, b| a.total_cmp(b))
        .unwrap_or(-1.0)
}
