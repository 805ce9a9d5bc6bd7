use super::{JoinContext, TripScratch};
use crate::{
    algorithm::{match_route_direction, Corridor, EdgeIndex},
    model::{network::nearest_signal_distance, JoinError, ObservedRouteRow, RouteRequest},
};
use bikespeed_core::model::{JoinedPoint, LinkId, RouteEdge, Trip};
use std::{fs, path::Path};

/// solves the observed route of one trip and joins route attributes to each
/// of its GPS points.
///
/// writes `<trip_id>.csv` and `<trip_id>_observed_route.csv` into the results
/// directory. nothing is written for a trip whose route cannot be solved or
/// whose route directions cannot be resolved, and both files are removed
/// again if either write fails.
///
/// # Returns
///
/// the number of joined point rows written
pub fn solve_trip(
    trip: &Trip,
    results_directory: &Path,
    ctx: &JoinContext,
) -> Result<usize, JoinError> {
    if trip.len() < 2 {
        return Err(JoinError::TooFewPoints(trip.trip_id, trip.len()));
    }
    let path = {
        let scratch = TripScratch::create(results_directory, trip.trip_id)?;
        solve_with_retry(trip, &scratch, ctx)?
    };

    let mut edges = ctx.network.route_edges(&path)?;
    match_route_direction(&mut edges)?;

    let rows = join_points(trip, &edges, ctx);
    let points_file = results_directory.join(format!("{}.csv", trip.trip_id));
    let route_file = results_directory.join(format!("{}_observed_route.csv", trip.trip_id));
    write_rows(&points_file, rows.iter())
        .and_then(|_| write_rows(&route_file, edges.iter().map(ObservedRouteRow::from)))
        .inspect_err(|_| remove_partial_outputs(&[points_file.as_path(), route_file.as_path()]))?;
    Ok(rows.len())
}

fn remove_partial_outputs(files: &[&Path]) {
    for file in files.iter().filter(|f| f.is_file()) {
        if let Err(e) = fs::remove_file(file) {
            log::warn!("failed to remove partial output {}: {e}", file.display());
        }
    }
}

/// asks the solver for a route inside the default corridor, and once more
/// inside the widened corridor if that fails.
pub fn solve_with_retry(
    trip: &Trip,
    scratch: &TripScratch,
    ctx: &JoinContext,
) -> Result<Vec<LinkId>, JoinError> {
    let (Some(origin), Some(destination)) = (trip.origin(), trip.destination()) else {
        return Err(JoinError::TooFewPoints(trip.trip_id, trip.len()));
    };
    let track = trip.track();
    let mut attempts = vec![];
    for (attempt, radius) in ctx.config.buffer_attempts().into_iter().enumerate() {
        let corridor = Corridor::buffer(&track, radius);
        scratch.write(&format!("corridor_{attempt}.wkt"), &corridor.describe())?;
        let request = RouteRequest {
            trip_id: trip.trip_id,
            origin,
            destination,
            corridor: &corridor,
        };
        match ctx.solver.solve(&request) {
            Ok(path) if !path.is_empty() => {
                if attempt > 0 {
                    log::info!("trip {} solved with a {radius} m buffer", trip.trip_id);
                }
                return Ok(path);
            }
            Ok(_) => attempts.push(format!("{radius} m buffer: empty route")),
            Err(e) => {
                log::debug!("trip {} with {radius} m buffer: {e}", trip.trip_id);
                attempts.push(format!("{radius} m buffer: {e}"));
            }
        }
    }
    Err(JoinError::RouteUnsolved {
        trip_id: trip.trip_id,
        reason: attempts.join("; "),
    })
}

/// joins each GPS point to its nearest route edge and the nearest signalized
/// junction on the route.
pub fn join_points(trip: &Trip, edges: &[RouteEdge], ctx: &JoinContext) -> Vec<JoinedPoint> {
    let index = EdgeIndex::new(edges);
    let signals = ctx.signals.on_route(edges, ctx.config.signal_route_radius_m);
    let cumulative = trip.cumulative_meters();
    trip.points
        .iter()
        .zip(cumulative)
        .enumerate()
        .map(|(sort_id, (point, cumul_meters))| {
            let location = point.point();
            let mut row = JoinedPoint::unmatched(point, sort_id, cumul_meters);
            row.sig_dist = nearest_signal_distance(&location, &signals);
            match index.nearest(&location, ctx.config.point_join_radius_m) {
                Some((edge, distance)) => row.with_edge(edge, distance),
                None => row,
            }
        })
        .collect()
}

fn write_rows<T, I>(path: &Path, rows: I) -> Result<(), JoinError>
where
    T: serde::Serialize,
    I: IntoIterator<Item = T>,
{
    let filename = path.to_string_lossy().to_string();
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| JoinError::CsvWriteError(filename.clone(), e))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| JoinError::CsvWriteError(filename.clone(), e))?;
    }
    writer
        .flush()
        .map_err(|e| JoinError::CsvWriteError(filename.clone(), csv::Error::from(e)))?;
    Ok(())
}
