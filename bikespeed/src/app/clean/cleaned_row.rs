use super::{EmmeAttributes, TimeBand};
use bikespeed_core::model::{JoinedPoint, TripId};
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// signal distance given to points whose route passes no signalized junction
pub const NO_SIGNAL_DISTANCE: f64 = 1000.0;

/// bike facility code of painted bike lanes
pub const BIKE_LANE_CODE: i32 = 11;
pub const SHARROW_CODES: [i32; 2] = [3, 4];
pub const BIKE_PATH_CODES: [i32; 2] = [6, 7];

/// one analysis-ready GPS point.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CleanedRow {
    pub trip_id: TripId,
    pub sort_id: usize,
    pub recorded_at: NaiveDateTime,
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub speed: f64,
    pub h_accuracy: f64,
    pub v_accuracy: f64,
    pub age: u8,
    pub gender: u8,
    pub cycling_level: u8,
    pub cumul_meters: f64,
    pub trip_length: f64,
    pub link_id: Option<i64>,
    pub lf_name: Option<String>,
    pub one_way_dir: Option<i8>,
    pub speed_kmh: Option<f64>,
    pub link_dir: Option<i8>,
    /// grade in the direction of travel
    pub slope: Option<f64>,
    pub bike_code: Option<i32>,
    pub bike_lanes: bool,
    pub sharrows: bool,
    pub bike_path: bool,
    pub sig_dist: f64,
    pub emme_id: Option<i64>,
    pub volume: f64,
    pub speed_limit: f64,
    pub lanes: f64,
    pub vdf: f64,
    pub is_male: Option<bool>,
    pub road_comfortable: Option<bool>,
    pub traffic_comfortable: Option<bool>,
    pub age_sample: Option<f64>,
}

impl CleanedRow {
    /// builds the cleaned row of a joined point: adds bike facility flags and
    /// the directed slope, clamps negative reported speeds to 0 and replaces
    /// a missing signal distance.
    ///
    /// the EMME id is the link's matching-direction id when the link is
    /// travelled forward and the contra-direction id otherwise. EMME values
    /// start out as those of an unmatched point.
    pub fn new(point: JoinedPoint, trip_length: f64) -> CleanedRow {
        let bike = |codes: &[i32]| point.bike_code.is_some_and(|c| codes.contains(&c));
        let bike_lanes = bike(&[BIKE_LANE_CODE]);
        let sharrows = bike(&SHARROW_CODES);
        let bike_path = bike(&BIKE_PATH_CODES);
        let slope = match (point.slope_tf, point.link_dir) {
            (Some(s), Some(d)) => Some(s * d as f64 * -1.0),
            _ => None,
        };
        let emme_id = if point.link_dir == Some(1) {
            point.emme_match
        } else {
            point.emme_contra
        };
        let sig_dist = if point.sig_dist < 0.0 {
            NO_SIGNAL_DISTANCE
        } else {
            point.sig_dist
        };
        let unmatched = EmmeAttributes::UNMATCHED;
        CleanedRow {
            trip_id: point.trip_id,
            sort_id: point.sort_id,
            recorded_at: point.recorded_at,
            longitude: point.longitude,
            latitude: point.latitude,
            altitude: point.altitude,
            speed: point.speed.max(0.0),
            h_accuracy: point.h_accuracy,
            v_accuracy: point.v_accuracy,
            age: point.age,
            gender: point.gender,
            cycling_level: point.cycling_level,
            cumul_meters: point.cumul_meters,
            trip_length,
            link_id: point.link_id,
            lf_name: point.lf_name,
            one_way_dir: point.one_way_dir,
            speed_kmh: point.speed_kmh,
            link_dir: point.link_dir,
            slope,
            bike_code: point.bike_code,
            bike_lanes,
            sharrows,
            bike_path,
            sig_dist,
            emme_id,
            volume: unmatched.volume,
            speed_limit: unmatched.speed_limit,
            lanes: unmatched.lanes,
            vdf: unmatched.vdf,
            is_male: None,
            road_comfortable: None,
            traffic_comfortable: None,
            age_sample: None,
        }
    }

    pub fn time_band(&self) -> TimeBand {
        TimeBand::from_hour(self.recorded_at.hour())
    }

    pub fn set_emme(&mut self, attributes: EmmeAttributes) {
        self.volume = attributes.volume;
        self.speed_limit = attributes.speed_limit;
        self.lanes = attributes.lanes;
        self.vdf = attributes.vdf;
    }

    pub fn has_complete_survey(&self) -> bool {
        self.age != 0 && self.gender != 0 && self.cycling_level != 0
    }
}
