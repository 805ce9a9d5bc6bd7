use super::{CleanError, TimeBand};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{collections::HashMap, path::Path};

pub const DEFAULT_SPEED_LIMIT: f64 = 40.0;
pub const DEFAULT_LANES: f64 = 1.0;
pub const DEFAULT_VDF: f64 = 90.0;
/// lanes assigned to points that have no EMME link at all
pub const UNMATCHED_LANES: f64 = 2.0;

/// a row of the EMME volume summary. blank volumes are 0.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EmmeVolumeRow {
    #[serde(rename = "LINK_ID")]
    pub link_id: i64,
    #[serde(rename = "AM_VOL", default)]
    pub am_vol: Option<f64>,
    #[serde(rename = "MID_VOL", default)]
    pub mid_vol: Option<f64>,
    #[serde(rename = "PM_VOL", default)]
    pub pm_vol: Option<f64>,
    #[serde(rename = "EVE_VOL", default)]
    pub eve_vol: Option<f64>,
}

impl EmmeVolumeRow {
    pub fn volume(&self, band: TimeBand) -> f64 {
        let v = match band {
            TimeBand::Am => self.am_vol,
            TimeBand::Mid => self.mid_vol,
            TimeBand::Pm => self.pm_vol,
            TimeBand::Eve => self.eve_vol,
        };
        v.unwrap_or(0.0)
    }
}

/// a row of the EMME link table. `DATA2` holds the posted speed limit.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EmmeLinkRow {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "DATA2", default)]
    pub data2: Option<f64>,
    #[serde(rename = "LANES", default)]
    pub lanes: Option<f64>,
    #[serde(rename = "VDF", default)]
    pub vdf: Option<f64>,
}

/// the EMME attributes given to a GPS point.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct EmmeAttributes {
    pub volume: f64,
    pub speed_limit: f64,
    pub lanes: f64,
    pub vdf: f64,
}

impl EmmeAttributes {
    /// attributes of a point with no EMME link
    pub const UNMATCHED: EmmeAttributes = EmmeAttributes {
        volume: 0.0,
        speed_limit: DEFAULT_SPEED_LIMIT,
        lanes: UNMATCHED_LANES,
        vdf: DEFAULT_VDF,
    };
}

/// EMME volume and link tables keyed by EMME link id.
#[derive(Clone, Debug, Default)]
pub struct EmmeTables {
    volumes: HashMap<i64, EmmeVolumeRow>,
    links: HashMap<i64, EmmeLinkRow>,
}

impl EmmeTables {
    pub fn new(volumes: Vec<EmmeVolumeRow>, links: Vec<EmmeLinkRow>) -> EmmeTables {
        EmmeTables {
            volumes: volumes.into_iter().map(|v| (v.link_id, v)).collect(),
            links: links.into_iter().map(|l| (l.id, l)).collect(),
        }
    }

    /// reads whichever tables are given. a missing table behaves as an empty one.
    pub fn from_csv(
        volume_file: Option<&Path>,
        link_file: Option<&Path>,
    ) -> Result<EmmeTables, CleanError> {
        let volumes = match volume_file {
            Some(f) => read_table::<EmmeVolumeRow>(f)?,
            None => vec![],
        };
        let links = match link_file {
            Some(f) => read_table::<EmmeLinkRow>(f)?,
            None => vec![],
        };
        log::info!(
            "loaded {} EMME volume rows and {} EMME link rows",
            volumes.len(),
            links.len()
        );
        Ok(EmmeTables::new(volumes, links))
    }

    /// looks up the attributes for an EMME link during a time band.
    ///
    /// a point without an EMME id gets [`EmmeAttributes::UNMATCHED`]. for a
    /// known id, missing volumes are 0 and missing or zero link values take
    /// their defaults.
    pub fn attributes(&self, emme_id: Option<i64>, band: TimeBand) -> EmmeAttributes {
        let Some(emme_id) = emme_id else {
            return EmmeAttributes::UNMATCHED;
        };
        let volume = self
            .volumes
            .get(&emme_id)
            .map(|v| v.volume(band))
            .unwrap_or(0.0);
        let link = self.links.get(&emme_id);
        let or_default = |value: Option<f64>, default: f64| {
            value.filter(|v| *v != 0.0).unwrap_or(default)
        };
        EmmeAttributes {
            volume,
            speed_limit: or_default(link.and_then(|l| l.data2), DEFAULT_SPEED_LIMIT),
            lanes: or_default(link.and_then(|l| l.lanes), DEFAULT_LANES),
            vdf: or_default(link.and_then(|l| l.vdf), DEFAULT_VDF),
        }
    }
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CleanError> {
    let filename = path.to_string_lossy().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| CleanError::CsvReadError(filename.clone(), e))?;
    reader
        .deserialize::<T>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CleanError::CsvReadError(filename, e))
}
