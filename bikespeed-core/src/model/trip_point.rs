use super::{SurveyResponse, TripId};
use crate::{util::parse_timestamp, CoreError};
use chrono::NaiveDateTime;
use geo::Point;
use serde::{Deserialize, Serialize};

/// a row of a raw trip file before any field is interpreted.
///
/// CSV rows as currently defined:
/// trip_id,recorded_at,longitude,latitude,altitude,speed,h_accuracy,v_accuracy,
/// age,gender,cycling_level
///
/// the survey columns are optional and default to blank.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TripPointRow {
    pub trip_id: String,
    pub recorded_at: String,
    pub longitude: String,
    pub latitude: String,
    pub altitude: String,
    pub speed: String,
    pub h_accuracy: String,
    pub v_accuracy: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub cycling_level: String,
}

/// one GPS sample recorded by the app.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TripPoint {
    pub trip_id: TripId,
    pub recorded_at: NaiveDateTime,
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub speed: f64,
    pub h_accuracy: f64,
    pub v_accuracy: f64,
    pub survey: SurveyResponse,
}

impl TripPoint {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl TryFrom<TripPointRow> for TripPoint {
    type Error = CoreError;

    fn try_from(row: TripPointRow) -> Result<Self, Self::Error> {
        let trip_id = row
            .trip_id
            .trim()
            .parse::<TripId>()
            .map_err(|_| CoreError::FieldParseError {
                field: "trip_id",
                value: row.trip_id.clone(),
            })?;
        Ok(TripPoint {
            trip_id,
            recorded_at: parse_timestamp(&row.recorded_at)?,
            longitude: parse_f64("longitude", &row.longitude)?,
            latitude: parse_f64("latitude", &row.latitude)?,
            altitude: parse_f64("altitude", &row.altitude)?,
            speed: parse_f64("speed", &row.speed)?,
            h_accuracy: parse_f64("h_accuracy", &row.h_accuracy)?,
            v_accuracy: parse_f64("v_accuracy", &row.v_accuracy)?,
            survey: SurveyResponse::new(&row.age, &row.gender, &row.cycling_level),
        })
    }
}

fn parse_f64(field: &'static str, value: &str) -> Result<f64, CoreError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| CoreError::FieldParseError {
            field,
            value: value.to_string(),
        })
}
