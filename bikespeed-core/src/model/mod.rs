mod joined_point;
mod link_direction;
mod link_id;
mod node_id;
mod road_attributes;
mod route_edge;
mod survey_response;
mod trip;
mod trip_point;

pub use joined_point::JoinedPoint;
pub use link_direction::LinkDirection;
pub use link_id::LinkId;
pub use node_id::NodeId;
pub use road_attributes::RoadAttributes;
pub use route_edge::RouteEdge;
pub use survey_response::SurveyResponse;
pub use trip::Trip;
pub use trip_point::{TripPoint, TripPointRow};

pub type TripId = i64;
