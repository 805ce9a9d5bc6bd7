mod batch;
mod failure_log;
mod join_context;
mod process_date;
mod scratch;
mod solve_trip;

pub use batch::{run_batch, BatchSummary};
pub use failure_log::{append_failures, FAILURE_LOG_FILENAME};
pub use join_context::JoinContext;
pub use process_date::{process_date, DateSummary};
pub use scratch::{TripScratch, SCRATCH_DIRECTORY};
pub use solve_trip::{join_points, solve_trip, solve_with_retry};
