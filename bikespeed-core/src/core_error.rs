use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("failure reading trip file {0}: {1}")]
    CsvReadError(String, csv::Error),
    #[error("failure writing to file {0}: {1}")]
    CsvWriteError(String, csv::Error),
    #[error("field '{field}' has unparseable value '{value}'")]
    FieldParseError { field: &'static str, value: String },
    #[error("timestamp '{0}' matches none of the supported formats")]
    TimestampParseError(String),
    #[error("failure reading trip data: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
}
