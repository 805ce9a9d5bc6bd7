use bikespeed_core::model::TripId;
use std::fmt::Display;

/// a trip excluded from the output, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct TripFailure {
    pub date: String,
    pub trip_id: TripId,
    pub reason: String,
}

impl Display for TripFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} trip {}: {}", self.date, self.trip_id, self.reason)
    }
}
