use serde::{Deserialize, Serialize};

/// a speed estimated from GPS positions paired with the speed the app
/// reported for the same point, in m/s.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SpeedSample {
    pub gps_estimate: f64,
    pub app_speed: f64,
}
