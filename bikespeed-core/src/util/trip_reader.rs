use crate::model::{Trip, TripPoint, TripPointRow};
use crate::CoreError;
use chrono::NaiveDateTime;
use itertools::Itertools;
use std::path::Path;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// parses an app timestamp, with or without fractional seconds.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, CoreError> {
    let trimmed = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| CoreError::TimestampParseError(value.to_string()))
}

/// reads every valid GPS sample from a trip file. rows that cannot be
/// interpreted (bad numbers, bad timestamps, wrong column count) are skipped.
pub fn read_trip_points(path: &Path) -> Result<Vec<TripPoint>, CoreError> {
    let filename = path.to_string_lossy().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| CoreError::CsvReadError(filename.clone(), e))?;
    let mut points = vec![];
    let mut skipped = 0;
    for (row_idx, row) in reader.deserialize::<TripPointRow>().enumerate() {
        let parsed = row
            .map_err(|e| CoreError::CsvReadError(filename.clone(), e))
            .and_then(TripPoint::try_from);
        match parsed {
            Ok(point) => points.push(point),
            Err(e) => {
                skipped += 1;
                log::debug!("{filename} row {row_idx} skipped: {e}");
            }
        }
    }
    if skipped > 0 {
        log::info!("{filename}: skipped {skipped} unreadable rows");
    }
    Ok(points)
}

/// reads a trip file and groups its points into time-ordered trips, sorted by trip id.
pub fn read_trips(path: &Path) -> Result<Vec<Trip>, CoreError> {
    let points = read_trip_points(path)?;
    let trips = points
        .into_iter()
        .into_group_map_by(|p| p.trip_id)
        .into_iter()
        .sorted_by_key(|(trip_id, _)| *trip_id)
        .map(|(trip_id, points)| Trip::new(trip_id, points))
        .collect_vec();
    Ok(trips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "trip_id,recorded_at,longitude,latitude,altitude,speed,h_accuracy,v_accuracy,age,gender,cycling_level";

    #[test]
    fn parses_both_timestamp_formats() {
        assert!(parse_timestamp("2015-08-24 07:15:02").is_ok());
        assert!(parse_timestamp("2015-08-24 07:15:02.250").is_ok());
        assert!(parse_timestamp("24/08/2015").is_err());
    }

    #[test]
    fn groups_sorts_and_skips_bad_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("coords-test.csv");
        let mut file = std::fs::File::create(&path).expect("create file");
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "2,2015-08-24 07:00:05,-79.40,43.66,100,3.0,5,5,2,1,2").unwrap();
        writeln!(file, "1,2015-08-24 07:00:02,-79.40,43.66,100,3.0,5,5,,,").unwrap();
        writeln!(file, "1,2015-08-24 07:00:01,-79.40,43.66,100,3.0,5,5,,,").unwrap();
        writeln!(file, "1,not-a-time,-79.40,43.66,100,3.0,5,5,,,").unwrap();
        writeln!(file, "1,2015-08-24 07:00:03,abc,43.66,100,3.0,5,5,,,").unwrap();
        drop(file);

        let trips = read_trips(&path).expect("file should be readable");
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].trip_id, 1);
        assert_eq!(trips[0].len(), 2);
        assert!(trips[0].points[0].recorded_at < trips[0].points[1].recorded_at);
        assert_eq!(trips[0].points[0].survey.age, 0);
        assert_eq!(trips[1].points[0].survey.gender, 1);
    }
}
