mod join_cli_error;
mod join_error;
pub mod network;
mod observed_route_row;
mod route_request;
mod route_solver;
mod trip_failure;

pub use join_cli_error::JoinCliError;
pub use join_error::JoinError;
pub use observed_route_row::ObservedRouteRow;
pub use route_request::RouteRequest;
pub use route_solver::RouteSolver;
pub use trip_failure::TripFailure;
