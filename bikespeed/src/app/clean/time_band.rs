use std::fmt::Display;

/// the EMME assignment periods a point's volume is taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeBand {
    /// 06:00 to 10:00
    Am,
    /// 10:00 to 16:00
    Mid,
    /// 16:00 to 19:00
    Pm,
    /// 19:00 to 06:00, wrapping midnight
    Eve,
}

impl TimeBand {
    pub fn from_hour(hour: u32) -> TimeBand {
        match hour {
            6..=9 => TimeBand::Am,
            10..=15 => TimeBand::Mid,
            16..=18 => TimeBand::Pm,
            _ => TimeBand::Eve,
        }
    }
}

impl Display for TimeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TimeBand::Am => "AM",
            TimeBand::Mid => "MID",
            TimeBand::Pm => "PM",
            TimeBand::Eve => "EVE",
        };
        write!(f, "{s}")
    }
}
