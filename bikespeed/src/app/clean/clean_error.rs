use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("failure reading clean configuration: {0}")]
    ConfigurationError(String),
    #[error("failure reading {0}: {1}")]
    CsvReadError(String, csv::Error),
    #[error("failure writing to file {0}: {1}")]
    CsvWriteError(String, csv::Error),
    #[error("failure building age density: {0}")]
    AgeDensityError(String),
    #[error("file system failure: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
}
