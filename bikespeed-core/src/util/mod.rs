pub mod geo_utils;
pub mod trip_reader;

pub use trip_reader::{parse_timestamp, read_trip_points, read_trips};
