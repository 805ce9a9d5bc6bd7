use thiserror::Error;

#[derive(Error, Debug)]
pub enum StopsError {
    #[error("failure parsing xml file {0}: {1}")]
    XmlError(String, roxmltree::Error),
    #[error("internal error building street name pattern: {0}")]
    RegexError(#[from] regex::Error),
    #[error("failure reading {0}: {1}")]
    CsvReadError(String, csv::Error),
    #[error("failure writing to file {0}: {1}")]
    CsvWriteError(String, csv::Error),
    #[error("file system failure: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
}
