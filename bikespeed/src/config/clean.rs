use crate::app::clean::CleanError;
use serde::{Deserialize, Serialize};

/// defines behaviors for cleaning joined trips into a single analysis table
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct CleanConfiguration {
    /// EMME volume summary CSV with columns LINK_ID,AM_VOL,MID_VOL,PM_VOL,EVE_VOL
    pub emme_volume_file: Option<String>,
    /// EMME link CSV with columns ID,DATA2,LANES,VDF
    pub emme_link_file: Option<String>,
    /// add user attributes and a continuous age sample
    pub clean_users: bool,
    /// drop rows where any survey response is missing
    pub filter_incomplete_surveys: bool,
    /// gaussian kernel bandwidth of the age density estimate, in years
    pub age_bandwidth: f64,
    /// number of bracket samples the age density is fit to
    pub age_resample_size: usize,
    /// seed for age sampling. unseeded runs draw from the OS.
    pub seed: Option<u64>,
}

impl Default for CleanConfiguration {
    fn default() -> Self {
        Self {
            emme_volume_file: None,
            emme_link_file: None,
            clean_users: true,
            filter_incomplete_surveys: false,
            age_bandwidth: 5.0,
            age_resample_size: 2000,
            seed: None,
        }
    }
}

impl TryFrom<&String> for CleanConfiguration {
    type Error = CleanError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let read = || {
            std::fs::read_to_string(f)
                .map_err(|e| CleanError::ConfigurationError(format!("failure reading {f}: {e}")))
        };
        let conf: CleanConfiguration = if f.ends_with(".toml") {
            toml::from_str(&read()?).map_err(|e| {
                CleanError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else if f.ends_with(".json") {
            serde_json::from_str(&read()?).map_err(|e| {
                CleanError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else {
            return Err(CleanError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )));
        };
        if !(conf.age_bandwidth.is_finite() && conf.age_bandwidth > 0.0) {
            return Err(CleanError::ConfigurationError(format!(
                "age bandwidth must be positive, found {}",
                conf.age_bandwidth
            )));
        }
        if conf.age_resample_size == 0 {
            return Err(CleanError::ConfigurationError(String::from(
                "age resample size must be at least 1",
            )));
        }
        Ok(conf)
    }
}
