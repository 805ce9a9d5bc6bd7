use super::{solve_trip, JoinContext, SCRATCH_DIRECTORY};
use crate::model::{JoinError, TripFailure};
use bikespeed_core::util::read_trips;
use itertools::Itertools;
use std::{fs, path::Path};

/// outcome of joining the trips of one date.
#[derive(Debug, Clone, Default)]
pub struct DateSummary {
    pub date: String,
    pub solved: usize,
    pub skipped: usize,
    pub failures: Vec<TripFailure>,
    /// set when the date could not be processed at all
    pub error: Option<String>,
}

impl DateSummary {
    pub fn new(date: &str) -> DateSummary {
        DateSummary {
            date: date.to_string(),
            ..Default::default()
        }
    }
}

/// joins every trip recorded on a date. trips are processed one after the
/// other; a failed trip is recorded in the summary and the rest continue.
///
/// trip files are read from `<input_directory>/<date>/*.csv` and results are
/// written to `<output_directory>/<date>/`. a date without an input folder is
/// skipped.
pub fn process_date(
    date: &str,
    input_directory: &Path,
    output_directory: &Path,
    ctx: &JoinContext,
) -> Result<DateSummary, JoinError> {
    let mut summary = DateSummary::new(date);
    let source_folder = input_directory.join(date);
    if !source_folder.is_dir() {
        log::debug!("no trips recorded for {date}");
        return Ok(summary);
    }
    let date_folder = output_directory.join(date);
    fs::create_dir_all(&date_folder)?;

    let trip_files = fs::read_dir(&source_folder)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"))
        .sorted()
        .collect_vec();

    for trip_file in trip_files {
        let trips = match read_trips(&trip_file) {
            Ok(trips) => trips,
            Err(e) => {
                log::error!("date {date}: {e}");
                continue;
            }
        };
        for trip in trips {
            let output_file = date_folder.join(format!("{}.csv", trip.trip_id));
            if output_file.exists() && !ctx.config.overwrite {
                log::debug!("date {date}, trip {} already joined", trip.trip_id);
                summary.skipped += 1;
                continue;
            }
            log::info!("date {date}, trip {}", trip.trip_id);
            match solve_trip(&trip, &date_folder, ctx) {
                Ok(_) => summary.solved += 1,
                Err(e) => {
                    log::warn!("date {date}, trip {} failed: {e}", trip.trip_id);
                    summary.failures.push(TripFailure {
                        date: date.to_string(),
                        trip_id: trip.trip_id,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    // only removes the scratch root if every trip cleaned up after itself
    let _ = fs::remove_dir(date_folder.join(SCRATCH_DIRECTORY));
    Ok(summary)
}
