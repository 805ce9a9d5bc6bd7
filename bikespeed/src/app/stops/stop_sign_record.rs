use serde::{Deserialize, Serialize};

/// one compulsory stop with its location details and, when the intersection
/// was found, its coordinates.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StopSignRecord {
    #[serde(rename = "Stop Street")]
    pub stop_street: String,
    #[serde(rename = "Cross Street")]
    pub cross_street: String,
    #[serde(rename = "Stop Street Location Details")]
    pub stop_street_details: String,
    #[serde(rename = "Cross Street Location Details")]
    pub cross_street_details: String,
    #[serde(rename = "Has lat/lon coordinates")]
    pub has_coordinates: bool,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
}
