use super::{LinearRegression, SpeedError, SpeedSample};
use bikespeed_core::{
    model::Trip,
    util::{geo_utils::haversine_distance, read_trips},
};
use itertools::Itertools;
use kdam::tqdm;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// raw recorded trip files are named `coords-<anything>.csv`
pub const TRIP_FILE_PREFIX: &str = "coords-";

/// estimates the speed at each point of a trip as the haversine distance
/// between its neighbours divided by the time between them.
///
/// the first and last `window` points have no estimate, and neither does a
/// point whose neighbours share a timestamp. a window of 0 is treated as 1.
pub fn estimate_point_speeds(trip: &Trip, window: usize) -> Vec<Option<f64>> {
    let points = &trip.points;
    let window = window.max(1);
    let mut estimates = vec![None; points.len()];
    for i in window..points.len().saturating_sub(window) {
        let previous = &points[i - 1];
        let next = &points[i + 1];
        let dt = (next.recorded_at - previous.recorded_at).num_milliseconds() as f64 / 1000.0;
        if dt <= 0.0 {
            continue;
        }
        estimates[i] = Some(haversine_distance(&previous.point(), &next.point()) / dt);
    }
    estimates
}

/// pairs every defined speed estimate of a trip with the reported speed.
pub fn paired_series(trip: &Trip, window: usize) -> Vec<SpeedSample> {
    estimate_point_speeds(trip, window)
        .into_iter()
        .zip(trip.points.iter())
        .filter_map(|(estimate, point)| {
            estimate.map(|gps_estimate| SpeedSample {
                gps_estimate,
                app_speed: point.speed,
            })
        })
        .collect()
}

/// reads every `coords-*` file in a directory and pairs the speed estimates
/// of all of their trips.
pub fn collect_samples(directory: &Path, window: usize) -> Result<Vec<SpeedSample>, SpeedError> {
    let trip_files = fs::read_dir(directory)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with(TRIP_FILE_PREFIX))
        })
        .sorted()
        .collect_vec();

    let mut samples = vec![];
    for trip_file in tqdm!(trip_files.iter(), desc = "estimate point speeds") {
        for trip in read_trips(trip_file)? {
            samples.extend(paired_series(&trip, window));
        }
    }
    eprintln!();
    log::info!(
        "collected {} speed samples from {} trip files",
        samples.len(),
        trip_files.len()
    );
    Ok(samples)
}

pub fn cache_filename(window: usize) -> String {
    format!("speed_estimates_window{window}.csv")
}

/// returns the cached paired series for this window when present, otherwise
/// collects it from the trip files and writes the cache.
pub fn load_or_collect(
    directory: &Path,
    cache_directory: &Path,
    window: usize,
    refresh: bool,
) -> Result<Vec<SpeedSample>, SpeedError> {
    let cache_file = cache_directory.join(cache_filename(window));
    if cache_file.exists() && !refresh {
        log::info!("reading cached speed estimates from {}", cache_file.display());
        return read_cache(&cache_file);
    }
    let samples = collect_samples(directory, window)?;
    write_cache(&cache_file, &samples)?;
    Ok(samples)
}

/// fits the GPS speed estimates against the reported speeds. negative
/// reported speeds are clamped to 0 first.
pub fn run(
    directory: &Path,
    cache_directory: Option<&Path>,
    window: usize,
    refresh: bool,
) -> Result<LinearRegression, SpeedError> {
    if window == 0 {
        return Err(SpeedError::InvalidWindow);
    }
    let cache_directory = cache_directory.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let samples = load_or_collect(directory, &cache_directory, window, refresh)?;
    let (gps, app): (Vec<f64>, Vec<f64>) = samples
        .iter()
        .map(|s| (s.gps_estimate, s.app_speed.max(0.0)))
        .unzip();
    LinearRegression::fit(&app, &gps)
}

fn read_cache(path: &Path) -> Result<Vec<SpeedSample>, SpeedError> {
    let filename = path.to_string_lossy().to_string();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| SpeedError::CsvReadError(filename.clone(), e))?;
    reader
        .deserialize::<SpeedSample>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SpeedError::CsvReadError(filename, e))
}

fn write_cache(path: &Path, samples: &[SpeedSample]) -> Result<(), SpeedError> {
    let filename = path.to_string_lossy().to_string();
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| SpeedError::CsvWriteError(filename.clone(), e))?;
    for sample in samples {
        writer
            .serialize(sample)
            .map_err(|e| SpeedError::CsvWriteError(filename.clone(), e))?;
    }
    writer.flush()?;
    log::info!("wrote {} speed samples to {filename}", samples.len());
    Ok(())
}
