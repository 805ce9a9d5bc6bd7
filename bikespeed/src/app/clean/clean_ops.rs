use super::{sample_ages, CleanError, CleanedRow, EmmeTables};
use crate::config::CleanConfiguration;
use bikespeed_core::model::JoinedPoint;
use itertools::Itertools;
use kdam::tqdm;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    fs,
    path::{Path, PathBuf},
};

const OBSERVED_ROUTE_SUFFIX: &str = "_observed_route.csv";

/// reads the joined point files in a directory and in each of its immediate
/// subdirectories, one inner Vec per trip in sort order. observed route
/// files are ignored and unreadable rows are skipped.
pub fn read_joined_trips(directory: &Path) -> Result<Vec<Vec<JoinedPoint>>, CleanError> {
    let mut files = vec![];
    for path in list_directory(directory)? {
        if path.is_dir() {
            files.extend(list_directory(&path)?.into_iter().filter(|p| is_joined_file(p)));
        } else if is_joined_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut trips = vec![];
    for file in tqdm!(files.iter(), desc = "read joined trips") {
        let filename = file.to_string_lossy().to_string();
        let mut reader = csv::Reader::from_path(file)
            .map_err(|e| CleanError::CsvReadError(filename.clone(), e))?;
        let mut points = vec![];
        for (row_idx, row) in reader.deserialize::<JoinedPoint>().enumerate() {
            match row {
                Ok(point) => points.push(point),
                Err(e) => log::debug!("{filename} row {row_idx} skipped: {e}"),
            }
        }
        let by_trip = points
            .into_iter()
            .into_group_map_by(|p| p.trip_id)
            .into_iter()
            .sorted_by_key(|(trip_id, _)| *trip_id)
            .map(|(_, mut points)| {
                points.sort_by_key(|p| p.sort_id);
                points
            });
        trips.extend(by_trip);
    }
    eprintln!();
    Ok(trips)
}

/// drops points recorded before the rider moved and builds the cleaned rows
/// of one trip. the trip length is the largest cumulative distance.
pub fn clean_trip(points: Vec<JoinedPoint>) -> Vec<CleanedRow> {
    let moving = points
        .into_iter()
        .filter(|p| p.cumul_meters != 0.0)
        .collect_vec();
    let trip_length = moving
        .iter()
        .map(|p| p.cumul_meters)
        .fold(f64::NEG_INFINITY, f64::max);
    moving
        .into_iter()
        .map(|p| CleanedRow::new(p, trip_length))
        .collect()
}

/// adds the EMME volume for the hour each point was recorded, and the EMME
/// link speed limit, lanes and volume-delay function.
pub fn add_emme_stats(rows: &mut [CleanedRow], tables: &EmmeTables) {
    for row in rows.iter_mut() {
        let attributes = tables.attributes(row.emme_id, row.time_band());
        row.set_emme(attributes);
    }
}

pub fn add_user_stats(rows: &mut [CleanedRow]) {
    for row in rows.iter_mut() {
        row.is_male = Some(row.gender == 1);
        row.road_comfortable = Some(row.cycling_level == 2);
        row.traffic_comfortable = Some(row.cycling_level == 3);
    }
}

/// keeps only rows whose age, gender and cycling level were all answered.
pub fn filter_missing_survey_vals(rows: Vec<CleanedRow>) -> Vec<CleanedRow> {
    rows.into_iter().filter(|r| r.has_complete_survey()).collect()
}

/// runs the table-wide cleaning steps over the rows of every trip.
pub fn clean_data<R: Rng>(
    mut rows: Vec<CleanedRow>,
    tables: &EmmeTables,
    config: &CleanConfiguration,
    rng: &mut R,
) -> Result<Vec<CleanedRow>, CleanError> {
    log::info!("adding EMME data");
    add_emme_stats(&mut rows, tables);
    if config.clean_users {
        log::info!("adding user stats");
        add_user_stats(&mut rows);
        log::info!("performing user age estimate");
        sample_ages(
            &mut rows,
            config.age_resample_size,
            config.age_bandwidth,
            rng,
        )?;
    }
    if config.filter_incomplete_surveys {
        let before = rows.len();
        rows = filter_missing_survey_vals(rows);
        log::info!(
            "removed {} rows with incomplete survey responses",
            before - rows.len()
        );
    }
    Ok(rows)
}

/// cleans every joined trip under `input_directory` into one CSV table.
///
/// # Returns
///
/// the number of rows written
pub fn run(
    input_directory: &Path,
    output_file: &Path,
    config: &CleanConfiguration,
) -> Result<usize, CleanError> {
    let tables = EmmeTables::from_csv(
        config.emme_volume_file.as_deref().map(Path::new),
        config.emme_link_file.as_deref().map(Path::new),
    )?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let trips = read_joined_trips(input_directory)?;
    log::info!("cleaning {} trips", trips.len());
    let rows = trips.into_iter().flat_map(clean_trip).collect_vec();
    let rows = clean_data(rows, &tables, config, &mut rng)?;

    let filename = output_file.to_string_lossy().to_string();
    let mut writer = csv::Writer::from_path(output_file)
        .map_err(|e| CleanError::CsvWriteError(filename.clone(), e))?;
    for row in rows.iter() {
        writer
            .serialize(row)
            .map_err(|e| CleanError::CsvWriteError(filename.clone(), e))?;
    }
    writer.flush()?;
    log::info!("wrote {} cleaned rows to {filename}", rows.len());
    Ok(rows.len())
}

fn list_directory(directory: &Path) -> Result<Vec<PathBuf>, CleanError> {
    let paths = fs::read_dir(directory)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(paths)
}

fn is_joined_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.is_file() && name.ends_with(".csv") && !name.ends_with(OBSERVED_ROUTE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::clean::{AgeBracket, EmmeLinkRow, EmmeVolumeRow};
    use bikespeed_core::util::parse_timestamp;

    fn joined(sort_id: usize, hour: u32, cumul_meters: f64) -> JoinedPoint {
        JoinedPoint {
            trip_id: 4,
            sort_id,
            recorded_at: parse_timestamp(&format!("2015-08-24 {hour:02}:15:00"))
                .expect("valid timestamp"),
            longitude: -79.4,
            latitude: 43.65,
            altitude: 90.0,
            speed: 5.0,
            h_accuracy: 5.0,
            v_accuracy: 5.0,
            age: 3,
            gender: 1,
            cycling_level: 2,
            cumul_meters,
            link_id: Some(1),
            lf_name: Some(String::from("College St")),
            one_way_dir: Some(0),
            speed_kmh: Some(40.0),
            slope_tf: Some(0.02),
            bike_code: Some(11),
            emme_match: Some(100),
            emme_contra: Some(101),
            link_length_m: Some(120.0),
            edge_distance_m: Some(3.0),
            sig_dist: 12.0,
            link_dir: Some(1),
        }
    }

    #[test]
    fn clean_trip_drops_stationary_points() {
        let rows = clean_trip(vec![
            joined(0, 8, 0.0),
            joined(1, 8, 15.0),
            joined(2, 8, 42.5),
        ]);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.trip_length == 42.5));
    }

    #[test]
    fn row_flags_and_directed_slope() {
        let mut forward = joined(1, 8, 10.0);
        forward.speed = -1.0;
        forward.sig_dist = -1.0;
        let row = CleanedRow::new(forward, 10.0);
        assert!(row.bike_lanes && !row.sharrows && !row.bike_path);
        assert_eq!(row.slope, Some(-0.02));
        assert_eq!(row.emme_id, Some(100));
        assert_eq!(row.speed, 0.0);
        assert_eq!(row.sig_dist, 1000.0);

        let mut reverse = joined(1, 8, 10.0);
        reverse.link_dir = Some(-1);
        reverse.bike_code = Some(7);
        let row = CleanedRow::new(reverse, 10.0);
        assert!(row.bike_path && !row.bike_lanes);
        assert_eq!(row.slope, Some(0.02));
        assert_eq!(row.emme_id, Some(101));
    }

    #[test]
    fn unmatched_point_keeps_emme_defaults() {
        let mut point = joined(1, 8, 10.0);
        point.link_id = None;
        point.link_dir = None;
        point.emme_match = None;
        point.emme_contra = None;
        point.slope_tf = None;
        point.bike_code = None;
        let mut rows = vec![CleanedRow::new(point, 10.0)];
        add_emme_stats(&mut rows, &EmmeTables::default());
        let r = &rows[0];
        assert_eq!((r.volume, r.speed_limit, r.lanes, r.vdf), (0.0, 40.0, 2.0, 90.0));
        assert_eq!(r.slope, None);
        assert!(!r.bike_lanes);
    }

    #[test]
    fn volume_by_hour() {
        let tables = EmmeTables::new(
            vec![EmmeVolumeRow {
                link_id: 100,
                am_vol: Some(1.0),
                mid_vol: Some(2.0),
                pm_vol: Some(3.0),
                eve_vol: Some(4.0),
            }],
            vec![EmmeLinkRow {
                id: 100,
                data2: Some(60.0),
                lanes: Some(3.0),
                vdf: Some(11.0),
            }],
        );
        let mut rows = [7, 12, 17, 22, 3]
            .into_iter()
            .map(|hour| CleanedRow::new(joined(1, hour, 10.0), 10.0))
            .collect_vec();
        add_emme_stats(&mut rows, &tables);
        let volumes = rows.iter().map(|r| r.volume).collect_vec();
        assert_eq!(volumes, vec![1.0, 2.0, 3.0, 4.0, 4.0]);
        assert_eq!(rows[0].speed_limit, 60.0);
        assert_eq!(rows[0].lanes, 3.0);
    }

    #[test]
    fn age_samples_fall_within_bracket() {
        let mut rows = (0..300)
            .map(|i| {
                let mut p = joined(i, 8, 10.0 + i as f64);
                p.age = (i % 7) as u8;
                CleanedRow::new(p, 310.0)
            })
            .collect_vec();
        let config = CleanConfiguration::default();
        let mut rng = StdRng::seed_from_u64(3);
        sample_ages(&mut rows, 2000, config.age_bandwidth, &mut rng).expect("sampling");
        for row in rows.iter() {
            match AgeBracket::for_code(row.age) {
                Some(bracket) => {
                    let age = row.age_sample.expect("known bracket is sampled");
                    assert!(bracket.contains(age), "{age} outside bracket {}", row.age);
                }
                None => assert_eq!(row.age_sample, None),
            }
        }
    }

    #[test]
    fn incomplete_surveys_filtered() {
        let mut missing = joined(2, 8, 20.0);
        missing.gender = 0;
        let rows = vec![
            CleanedRow::new(joined(1, 8, 10.0), 20.0),
            CleanedRow::new(missing, 20.0),
        ];
        let config = CleanConfiguration {
            filter_incomplete_surveys: true,
            clean_users: false,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let rows = clean_data(rows, &EmmeTables::default(), &config, &mut rng).expect("clean");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].is_male, None);
    }

    #[test]
    fn run_reads_date_folders() {
        let input = tempfile::tempdir().expect("input dir");
        let output = tempfile::tempdir().expect("output dir");
        let date_folder = input.path().join("Aug_24");
        fs::create_dir_all(&date_folder).expect("date folder");
        let write = |path: PathBuf, points: &[JoinedPoint]| {
            let mut writer = csv::Writer::from_path(path).expect("writer");
            for p in points {
                writer.serialize(p).expect("serialize");
            }
            writer.flush().expect("flush");
        };
        write(
            date_folder.join("4.csv"),
            &[joined(0, 8, 0.0), joined(1, 8, 11.0), joined(2, 8, 30.0)],
        );
        fs::write(date_folder.join("4_observed_route.csv"), "sequence,link_id\n0,1\n")
            .expect("route file");

        let output_file = output.path().join("cleaned_data.csv");
        let config = CleanConfiguration {
            seed: Some(11),
            ..Default::default()
        };
        let written = run(input.path(), &output_file, &config).expect("clean run");
        assert_eq!(written, 2);
        let mut reader = csv::Reader::from_path(&output_file).expect("reader");
        let rows = reader
            .deserialize::<CleanedRow>()
            .collect::<Result<Vec<_>, _>>()
            .expect("rows");
        assert_eq!(rows[0].sort_id, 1);
        assert_eq!(rows[0].is_male, Some(true));
        assert!(rows.iter().all(|r| r.age_sample.is_some()));
    }
}
