use bikespeed_core::{
    model::{LinkId, TripId},
    CoreError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JoinError {
    #[error("route edges {upstream} and {downstream} share {shared} nodes, expected exactly one (ambiguous or disconnected adjacency)")]
    AmbiguousAdjacency {
        upstream: usize,
        downstream: usize,
        shared: usize,
    },
    #[error("route for trip {trip_id} could not be solved: {reason}")]
    RouteUnsolved { trip_id: TripId, reason: String },
    #[error("trip {0} has {1} points, at least 2 are required to route")]
    TooFewPoints(TripId, usize),
    #[error("route references link '{0}' not in network")]
    MissingLink(LinkId),
    #[error("network link '{0}' has invalid WKT geometry: {1}")]
    InvalidWkt(String, String),
    #[error("network file {0} contains no links")]
    EmptyNetwork(String),
    #[error("failure reading {0}: {1}")]
    CsvReadError(String, csv::Error),
    #[error("failure writing to file {0}: {1}")]
    CsvWriteError(String, csv::Error),
    #[error("failure reading trip data: {source}")]
    CoreError {
        #[from]
        source: CoreError,
    },
    #[error("file system failure: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
}
