use super::{append_failures, process_date, DateSummary, JoinContext, FAILURE_LOG_FILENAME};
use crate::model::JoinCliError;
use kdam::{BarBuilder, BarExt};
use rayon::prelude::*;
use std::{
    fs,
    path::Path,
    sync::{Arc, Mutex},
};

/// outcome of a full join run.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub dates: Vec<DateSummary>,
}

impl BatchSummary {
    pub fn solved(&self) -> usize {
        self.dates.iter().map(|d| d.solved).sum()
    }

    pub fn skipped(&self) -> usize {
        self.dates.iter().map(|d| d.skipped).sum()
    }

    pub fn failed(&self) -> usize {
        self.dates.iter().map(|d| d.failures.len()).sum()
    }
}

/// joins the trips of every configured date, one date per task on a fixed
/// size worker pool. workers share nothing mutable: each writes into its own
/// date folder and hands its failures back, and the failure log is appended
/// here once all workers are done.
pub fn run_batch(
    input_directory: &Path,
    output_directory: &Path,
    ctx: &JoinContext,
) -> Result<BatchSummary, JoinCliError> {
    let dates = ctx.config.date_folders(input_directory)?;
    fs::create_dir_all(output_directory)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ctx.config.parallelism)
        .build()?;
    let bar = Arc::new(Mutex::new(
        BarBuilder::default()
            .desc("join trips by date")
            .total(dates.len())
            .build()
            .map_err(JoinCliError::InternalError)?,
    ));

    let summaries = pool.install(|| {
        dates
            .par_iter()
            .map(|date| {
                let result = process_date(date, input_directory, output_directory, ctx);
                if let Ok(mut bar) = bar.lock() {
                    let _ = bar.update(1);
                }
                result.unwrap_or_else(|e| {
                    log::error!("date {date} could not be processed: {e}");
                    DateSummary {
                        error: Some(e.to_string()),
                        ..DateSummary::new(date)
                    }
                })
            })
            .collect::<Vec<_>>()
    });
    eprintln!();

    let summary = BatchSummary { dates: summaries };
    let failure_log = output_directory.join(FAILURE_LOG_FILENAME);
    append_failures(&failure_log, summary.dates.iter().flat_map(|d| d.failures.iter()))?;
    log::info!(
        "joined {} trips, skipped {}, {} failed (see {})",
        summary.solved(),
        summary.skipped(),
        summary.failed(),
        failure_log.display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::SCRATCH_DIRECTORY,
        config::JoinConfiguration,
        model::{
            network::{road_network::tests::link, RoadNetwork, SignalJunction, SignalLayer},
            JoinError, RouteRequest, RouteSolver,
        },
    };
    use bikespeed_core::model::{JoinedPoint, LinkId, TripId};
    use std::{collections::HashMap, io::Write};

    /// succeeds only once the corridor is at least as wide as the trip's threshold.
    struct ThresholdSolver {
        min_radius: HashMap<TripId, f64>,
        path: Vec<LinkId>,
    }

    impl RouteSolver for ThresholdSolver {
        fn solve(&self, request: &RouteRequest) -> Result<Vec<LinkId>, JoinError> {
            let needed = self.min_radius.get(&request.trip_id).copied().unwrap_or(0.0);
            if request.corridor.radius_m() >= needed {
                Ok(self.path.clone())
            } else {
                Err(JoinError::RouteUnsolved {
                    trip_id: request.trip_id,
                    reason: String::from("barrier"),
                })
            }
        }
    }

    fn write_trips(path: &Path) {
        let mut file = fs::File::create(path).expect("create trip file");
        writeln!(
            file,
            "trip_id,recorded_at,longitude,latitude,altitude,speed,h_accuracy,v_accuracy,age,gender,cycling_level"
        )
        .unwrap();
        for trip_id in [1, 2] {
            for i in 0..5 {
                writeln!(
                    file,
                    "{trip_id},2015-08-24 08:00:0{i},{},0.00001,90,4.5,5,5,3,1,2",
                    i as f64 * 0.0005
                )
                .unwrap();
            }
        }
    }

    #[test]
    fn isolates_failed_trips_and_retries_with_wider_buffer() {
        let input = tempfile::tempdir().expect("input dir");
        let output = tempfile::tempdir().expect("output dir");
        fs::create_dir_all(input.path().join("Aug_24")).expect("date folder");
        write_trips(&input.path().join("Aug_24").join("coords.csv"));

        let network = RoadNetwork::new(vec![
            link(1, 1, 2, (0.0, 0.0), (0.001, 0.0), 0),
            link(2, 3, 2, (0.002, 0.0), (0.001, 0.0), 0),
        ]);
        let signals = SignalLayer::new(vec![SignalJunction {
            junction_id: 9,
            longitude: 0.001,
            latitude: 0.0,
        }]);
        let solver = ThresholdSolver {
            min_radius: HashMap::from([(1, 100.0), (2, 1000.0)]),
            path: vec![LinkId(1), LinkId(2)],
        };
        let config = JoinConfiguration {
            parallelism: 1,
            ..Default::default()
        };
        let ctx = JoinContext {
            solver: &solver,
            network: &network,
            signals: &signals,
            config: &config,
        };

        let summary = run_batch(input.path(), output.path(), &ctx).expect("batch runs");
        assert_eq!(summary.solved(), 1);
        assert_eq!(summary.failed(), 1);

        let date_folder = output.path().join("Aug_24");
        assert!(!date_folder.join("2.csv").exists());
        assert!(!date_folder.join(SCRATCH_DIRECTORY).exists());
        let log = fs::read_to_string(output.path().join(FAILURE_LOG_FILENAME)).expect("log");
        assert_eq!(log, "2\n");

        let mut reader = csv::Reader::from_path(date_folder.join("1.csv")).expect("trip output");
        let rows = reader
            .deserialize::<JoinedPoint>()
            .collect::<Result<Vec<_>, _>>()
            .expect("rows deserialize");
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].link_id, Some(1));
        assert_eq!(rows[0].link_dir, Some(1));
        assert_eq!(rows[4].link_id, Some(2));
        assert_eq!(rows[4].link_dir, Some(-1));
        assert!((rows[2].sig_dist - 1.1).abs() < 0.1);
        assert!(rows[4].cumul_meters > 200.0);

        // already joined trips are skipped on a second run
        let again = run_batch(input.path(), output.path(), &ctx).expect("batch runs");
        assert_eq!(again.skipped(), 1);
        assert_eq!(again.failed(), 1);
        let log = fs::read_to_string(output.path().join(FAILURE_LOG_FILENAME)).expect("log");
        assert_eq!(log, "2\n2\n");
    }
}
