use super::JoinError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JoinCliError {
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("failure joining trips: {source}")]
    JoinError {
        #[from]
        source: JoinError,
    },
    #[error("failure creating worker pool: {source}")]
    ThreadPoolError {
        #[from]
        source: rayon::ThreadPoolBuildError,
    },
    #[error("{0}")]
    InternalError(String),
    #[error("failure reading directory: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
}
