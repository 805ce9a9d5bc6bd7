use crate::{
    config::JoinConfiguration,
    model::{
        network::{RoadNetwork, SignalLayer},
        RouteSolver,
    },
};

/// everything a worker needs to join trips. built once at startup and shared
/// read-only by every worker.
#[derive(Clone, Copy)]
pub struct JoinContext<'a> {
    pub solver: &'a dyn RouteSolver,
    pub network: &'a RoadNetwork,
    pub signals: &'a SignalLayer,
    pub config: &'a JoinConfiguration,
}
