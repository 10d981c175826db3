//! Indicator series and crossover state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One optional value per bar index.
///
/// A slot is `None` while an indicator is still warming up, or when the
/// input at that index was absent. Derived series always have the same
/// length as the bars they came from.
pub type Series = Vec<Option<f64>>;

/// Most recent directional cross between two series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CrossoverState {
    /// No cross in the scanned window
    #[default]
    Neutral,
    /// Short series crossed above the long series
    Bullish,
    /// Short series crossed below the long series
    Bearish,
}

impl CrossoverState {
    /// True for either cross direction.
    pub fn is_cross(&self) -> bool {
        !matches!(self, CrossoverState::Neutral)
    }
}

impl fmt::Display for CrossoverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CrossoverState::Neutral => "neutral",
            CrossoverState::Bullish => "bullish",
            CrossoverState::Bearish => "bearish",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for CrossoverState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neutral" | "none" => Ok(CrossoverState::Neutral),
            "bullish" => Ok(CrossoverState::Bullish),
            "bearish" => Ok(CrossoverState::Bearish),
            _ => Err(format!("Invalid crossover state: {}", s)),
        }
    }
}
