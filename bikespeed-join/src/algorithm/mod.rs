mod corridor;
pub mod direction;
pub mod search;
pub mod spatial_join;

pub use corridor::Corridor;
pub use direction::match_route_direction;
pub use search::NetworkRouteSolver;
pub use spatial_join::EdgeIndex;
