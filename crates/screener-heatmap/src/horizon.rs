//! Heatmap look-back horizons.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Look-back horizon of a heatmap, in calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Horizon {
    #[default]
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "1w")]
    W1,
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "3m")]
    M3,
    #[serde(rename = "6m")]
    M6,
    #[serde(rename = "1y")]
    Y1,
}

impl Horizon {
    /// Every horizon, shortest first.
    pub fn all() -> &'static [Horizon] {
        &[
            Horizon::D1,
            Horizon::W1,
            Horizon::M1,
            Horizon::M3,
            Horizon::M6,
            Horizon::Y1,
        ]
    }

    /// Calendar days spanned by the horizon.
    pub fn days(&self) -> i64 {
        match self {
            Horizon::D1 => 1,
            Horizon::W1 => 7,
            Horizon::M1 => 30,
            Horizon::M3 => 90,
            Horizon::M6 => 180,
            Horizon::Y1 => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::D1 => "1d",
            Horizon::W1 => "1w",
            Horizon::M1 => "1m",
            Horizon::M3 => "3m",
            Horizon::M6 => "6m",
            Horizon::Y1 => "1y",
        }
    }
}

impl FromStr for Horizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Horizon::all()
            .iter()
            .copied()
            .find(|h| h.as_str() == key)
            .ok_or_else(|| {
                format!(
                    "Invalid duration: {} (expected one of 1d, 1w, 1m, 3m, 6m, 1y)",
                    s
                )
            })
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
