mod linear_regression;
mod speed_error;
mod speed_ops;
mod speed_sample;

pub use linear_regression::LinearRegression;
pub use speed_error::SpeedError;
pub use speed_ops::{
    cache_filename, collect_samples, estimate_point_speeds, load_or_collect, paired_series, run,
    TRIP_FILE_PREFIX,
};
pub use speed_sample::SpeedSample;
