use bikespeed_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeedError {
    #[error("speed estimate window must be at least 1")]
    InvalidWindow,
    #[error("regression requires at least 3 paired samples, found {0}")]
    InsufficientData(usize),
    #[error("regression is undefined when every reported speed is identical")]
    ConstantPredictor,
    #[error("paired series have different lengths: {0} and {1}")]
    LengthMismatch(usize, usize),
    #[error("failure building t distribution: {0}")]
    DistributionError(String),
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
