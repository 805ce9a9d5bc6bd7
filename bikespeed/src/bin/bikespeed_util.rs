use bikespeed::{
    app::{clean, speed, stops},
    config::CleanConfiguration,
};
use clap::{Parser, Subcommand};
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    app: App,
}

#[derive(Subcommand)]
pub enum App {
    #[command(
        name = "speed",
        about = "regress GPS-derived point speeds on the speeds reported by the app"
    )]
    Speed {
        /// directory of raw recorded trip files named coords-*.csv
        input_directory: String,
        /// number of points at each end of a trip without an estimate
        #[arg(long, default_value_t = 2)]
        window: usize,
        /// directory holding the speed_estimates_window<w>.csv cache
        #[arg(long)]
        cache_directory: Option<String>,
        /// recompute the paired series even when a cache exists
        #[arg(long)]
        refresh: bool,
    },
    #[command(
        name = "clean",
        about = "clean joined trips into a single analysis-ready CSV"
    )]
    Clean {
        /// output directory of a bikespeed-join run
        input_directory: String,
        /// file to write the cleaned table to
        output_file: String,
        /// file with clean parameters (.toml or .json)
        #[arg(long)]
        configuration_file: Option<String>,
    },
    #[command(
        name = "stops",
        about = "extract compulsory stop signs from the bylaw XML and locate them"
    )]
    Stops {
        /// bylaw schedule XML file
        xml_file: String,
        /// file to write stop signs to
        output_file: String,
        /// centreline intersections CSV with columns INTERSEC5,longitude,latitude
        #[arg(long)]
        intersection_file: Option<String>,
    },
}

impl App {
    pub fn run(&self) -> Result<(), String> {
        match self {
            App::Speed {
                input_directory,
                window,
                cache_directory,
                refresh,
            } => {
                let fit = speed::run(
                    Path::new(input_directory),
                    cache_directory.as_deref().map(Path::new),
                    *window,
                    *refresh,
                )
                .map_err(|e| e.to_string())?;
                println!("{fit}");
                Ok(())
            }
            App::Clean {
                input_directory,
                output_file,
                configuration_file,
            } => {
                let conf = match configuration_file {
                    None => Ok(CleanConfiguration::default()),
                    Some(f) => {
                        log::info!("reading clean configuration from {f}");
                        CleanConfiguration::try_from(f)
                    }
                }
                .map_err(|e| e.to_string())?;
                clean::run(Path::new(input_directory), Path::new(output_file), &conf)
                    .map_err(|e| e.to_string())?;
                Ok(())
            }
            App::Stops {
                xml_file,
                output_file,
                intersection_file,
            } => {
                stops::run(
                    Path::new(xml_file),
                    intersection_file.as_deref().map(Path::new),
                    Path::new(output_file),
                )
                .map_err(|e| e.to_string())?;
                Ok(())
            }
        }
    }
}

fn main() {
    env_logger::init();
    let args = CliArgs::parse();
    if let Err(e) = args.app.run() {
        log::error!("bikespeed-util failed: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
