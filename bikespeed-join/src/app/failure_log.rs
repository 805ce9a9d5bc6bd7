use crate::model::TripFailure;
use std::{fs::OpenOptions, io::Write, path::Path};

pub const FAILURE_LOG_FILENAME: &str = "trip_errors.txt";

/// appends the id of each failed trip to the failure log, one per line.
pub fn append_failures<'a, I>(path: &Path, failures: I) -> Result<usize, std::io::Error>
where
    I: IntoIterator<Item = &'a TripFailure>,
{
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut count = 0;
    for failure in failures {
        writeln!(file, "{}", failure.trip_id)?;
        count += 1;
    }
    Ok(count)
}
