use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// whether travel along a route edge follows the digitized order of its
/// nodes (FNODE -> TNODE) or runs against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkDirection {
    Forward,
    Reverse,
}

impl LinkDirection {
    /// the signed flag written to output files, `1` or `-1`.
    pub fn sign(&self) -> i8 {
        match self {
            LinkDirection::Forward => 1,
            LinkDirection::Reverse => -1,
        }
    }

    pub fn from_sign(sign: i8) -> Option<LinkDirection> {
        match sign {
            1 => Some(LinkDirection::Forward),
            -1 => Some(LinkDirection::Reverse),
            _ => None,
        }
    }
}

impl Display for LinkDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sign())
    }
}
