use crate::model::JoinCliError;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// defines behaviors for a trip join run
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct JoinConfiguration {
    /// radius of the search corridor around the observed points, in meters
    pub buffer_radius_m: f64,
    /// the corridor radius is multiplied by this factor for the single retry
    pub retry_buffer_factor: f64,
    /// how far from the network an origin or destination may be located, in meters
    pub locate_tolerance_m: f64,
    /// how far a GPS point may be from its joined route edge, in meters
    pub point_join_radius_m: f64,
    /// how far a signalized junction may be from the route to count as on it, in meters
    pub signal_route_radius_m: f64,
    /// number of dates processed concurrently. 0 uses one worker per core.
    pub parallelism: usize,
    /// first date to process. when unset, every subdirectory of the input is a date.
    pub start_date: Option<NaiveDate>,
    /// number of consecutive dates starting at `start_date`
    pub num_days: usize,
    /// chrono format of the per-date folder names
    pub date_folder_format: String,
    /// re-join trips whose output already exists
    pub overwrite: bool,
}

impl Default for JoinConfiguration {
    fn default() -> Self {
        Self {
            buffer_radius_m: 50.0,
            retry_buffer_factor: 2.0,
            locate_tolerance_m: 5000.0,
            point_join_radius_m: 100.0,
            signal_route_radius_m: 5.0,
            parallelism: 0,
            start_date: None,
            num_days: 35,
            date_folder_format: String::from("%b_%d"),
            overwrite: false,
        }
    }
}

impl JoinConfiguration {
    /// the corridor radius used for each solve attempt, the default first and
    /// the widened one second.
    pub fn buffer_attempts(&self) -> [f64; 2] {
        [
            self.buffer_radius_m,
            self.buffer_radius_m * self.retry_buffer_factor,
        ]
    }

    /// names of the date folders to process.
    pub fn date_folders(&self, input_directory: &Path) -> Result<Vec<String>, JoinCliError> {
        match self.start_date {
            Some(start) => Ok((0..self.num_days)
                .map(|i| {
                    (start + Duration::days(i as i64))
                        .format(&self.date_folder_format)
                        .to_string()
                })
                .collect()),
            None => {
                let mut dates = vec![];
                for entry in std::fs::read_dir(input_directory)? {
                    let entry = entry?;
                    if entry.file_type()?.is_dir() {
                        dates.push(entry.file_name().to_string_lossy().to_string());
                    }
                }
                dates.sort();
                Ok(dates)
            }
        }
    }

    fn validate(self) -> Result<Self, JoinCliError> {
        if self.buffer_radius_m <= 0.0 || self.retry_buffer_factor < 1.0 {
            return Err(JoinCliError::ConfigurationError(format!(
                "buffer radius must be positive and retry factor at least 1, found {} and {}",
                self.buffer_radius_m, self.retry_buffer_factor
            )));
        }
        Ok(self)
    }
}

impl TryFrom<&String> for JoinConfiguration {
    type Error = JoinCliError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let conf: JoinConfiguration = if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                JoinCliError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            toml::from_str(&s).map_err(|e| {
                JoinCliError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                JoinCliError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                JoinCliError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else {
            return Err(JoinCliError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )));
        };
        conf.validate()
    }
}
