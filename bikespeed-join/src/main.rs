use bikespeed_join::{
    algorithm::NetworkRouteSolver,
    app::{run_batch, JoinContext},
    config::JoinConfiguration,
    model::{
        network::{RoadNetwork, SignalLayer},
        JoinCliError,
    },
};
use clap::{Parser, Subcommand};
use std::{path::Path, sync::Arc};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct JoinAppArguments {
    #[command(subcommand)]
    app: App,
}

#[derive(Subcommand)]
pub enum App {
    /// solve the route of every trip and join road attributes to its GPS points
    Run {
        #[arg(long, help = "directory with one subdirectory of trip files per date")]
        input_directory: String,
        #[arg(long, help = "output path for joined trips")]
        output_directory: String,
        #[arg(long, help = "path to centreline network links CSV")]
        network_file: String,
        #[arg(long, help = "path to signalized junctions CSV")]
        signals_file: Option<String>,
        #[arg(long, help = "path to file with join parameters (.toml or .json)")]
        configuration_file: Option<String>,
        #[arg(long, help = "number of dates processed concurrently, overrides the configuration")]
        parallelism: Option<usize>,
    },
}

pub fn run(app: &App) -> Result<(), JoinCliError> {
    match app {
        App::Run {
            input_directory,
            output_directory,
            network_file,
            signals_file,
            configuration_file,
            parallelism,
        } => {
            let mut conf = match configuration_file {
                None => Ok(JoinConfiguration::default()),
                Some(f) => {
                    log::info!("reading join configuration from {f}");
                    JoinConfiguration::try_from(f)
                }
            }?;
            if let Some(p) = parallelism {
                conf.parallelism = *p;
            }

            let network = Arc::new(RoadNetwork::from_csv(Path::new(network_file))?);
            let signals = match signals_file {
                Some(f) => SignalLayer::from_csv(Path::new(f))?,
                None => {
                    log::warn!("no signals file provided, sig_dist will be -1 for every point");
                    SignalLayer::new(vec![])
                }
            };
            let solver = NetworkRouteSolver::new(network.clone(), conf.locate_tolerance_m);
            let ctx = JoinContext {
                solver: &solver,
                network: &network,
                signals: &signals,
                config: &conf,
            };

            let summary = run_batch(
                Path::new(input_directory),
                Path::new(output_directory),
                &ctx,
            )?;
            for date in summary.dates.iter().filter(|d| d.error.is_some()) {
                log::error!(
                    "date {} aborted: {}",
                    date.date,
                    date.error.as_deref().unwrap_or_default()
                );
            }
            eprintln!("finished.");
            Ok(())
        }
    }
}

fn main() {
    env_logger::init();
    let args = JoinAppArguments::parse();
    if let Err(e) = run(&args.app) {
        log::error!("bikespeed-join failed: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
