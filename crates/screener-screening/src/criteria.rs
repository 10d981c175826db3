//! Filter criteria.
//!
//! Each kind of filter is one [`Criterion`] variant; a [`FilterCriteria`]
//! is an AND of criteria. Criteria deserialize from JSON or TOML, tagged by
//! `kind`:
//!
//! ```json
//! {"criteria": [
//!     {"kind": "rsi_range", "min": 0, "max": 30},
//!     {"kind": "above_ema", "period": 200, "expect": "true"},
//!     {"kind": "ema_crossover", "pair": "21x44", "direction": "bullish", "lookback": 10}
//! ]}
//! ```

use screener_core::error::ScreenerError;
use screener_core::types::CrossoverState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// EMA periods tracked on every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum EmaPeriod {
    P21,
    P44,
    P200,
}

impl EmaPeriod {
    /// All tracked periods, shortest first.
    pub const ALL: [EmaPeriod; 3] = [EmaPeriod::P21, EmaPeriod::P44, EmaPeriod::P200];

    /// Period length in sessions.
    pub fn length(&self) -> usize {
        match self {
            EmaPeriod::P21 => 21,
            EmaPeriod::P44 => 44,
            EmaPeriod::P200 => 200,
        }
    }
}

impl TryFrom<u32> for EmaPeriod {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            21 => Ok(EmaPeriod::P21),
            44 => Ok(EmaPeriod::P44),
            200 => Ok(EmaPeriod::P200),
            other => Err(format!("Unsupported EMA period: {} (expected 21, 44 or 200)", other)),
        }
    }
}

impl From<EmaPeriod> for u32 {
    fn from(period: EmaPeriod) -> Self {
        period.length() as u32
    }
}

impl FromStr for EmaPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid EMA period: {}", s))?;
        EmaPeriod::try_from(value)
    }
}

impl fmt::Display for EmaPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.length())
    }
}

/// Three-way test on an optional boolean flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagFilter {
    #[default]
    Any,
    True,
    False,
}

impl FlagFilter {
    /// An absent flag never satisfies `True` or `False`.
    pub fn matches(&self, flag: Option<bool>) -> bool {
        match self {
            FlagFilter::Any => true,
            FlagFilter::True => flag == Some(true),
            FlagFilter::False => flag == Some(false),
        }
    }
}

impl FromStr for FlagFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" => Ok(FlagFilter::Any),
            "true" | "yes" | "above" => Ok(FlagFilter::True),
            "false" | "no" | "below" => Ok(FlagFilter::False),
            _ => Err(format!("Invalid flag filter: {}", s)),
        }
    }
}

/// Wanted MACD crossover state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdStateFilter {
    #[default]
    Any,
    Bullish,
    Bearish,
    Neutral,
}

impl MacdStateFilter {
    pub fn matches(&self, state: CrossoverState) -> bool {
        match self {
            MacdStateFilter::Any => true,
            MacdStateFilter::Bullish => state == CrossoverState::Bullish,
            MacdStateFilter::Bearish => state == CrossoverState::Bearish,
            MacdStateFilter::Neutral => state == CrossoverState::Neutral,
        }
    }
}

impl FromStr for MacdStateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" => Ok(MacdStateFilter::Any),
            "bullish" => Ok(MacdStateFilter::Bullish),
            "bearish" => Ok(MacdStateFilter::Bearish),
            "neutral" | "none" => Ok(MacdStateFilter::Neutral),
            _ => Err(format!("Invalid MACD state: {}", s)),
        }
    }
}

/// Short/long EMA pair for crossover screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmaPair {
    #[serde(rename = "21x44")]
    #[default]
    E21x44,
    #[serde(rename = "44x200")]
    E44x200,
    #[serde(rename = "21x200")]
    E21x200,
    #[serde(rename = "none")]
    None,
}

impl EmaPair {
    /// (short, long) periods, or `None` for the disabled pair.
    pub fn periods(&self) -> Option<(EmaPeriod, EmaPeriod)> {
        match self {
            EmaPair::E21x44 => Some((EmaPeriod::P21, EmaPeriod::P44)),
            EmaPair::E44x200 => Some((EmaPeriod::P44, EmaPeriod::P200)),
            EmaPair::E21x200 => Some((EmaPeriod::P21, EmaPeriod::P200)),
            EmaPair::None => None,
        }
    }
}

impl FromStr for EmaPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('/', "x").as_str() {
            "21x44" => Ok(EmaPair::E21x44),
            "44x200" => Ok(EmaPair::E44x200),
            "21x200" => Ok(EmaPair::E21x200),
            "none" => Ok(EmaPair::None),
            _ => Err(format!("Invalid EMA pair: {}", s)),
        }
    }
}

impl fmt::Display for EmaPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.periods() {
            Some((short, long)) => write!(f, "{}x{}", short, long),
            None => write!(f, "none"),
        }
    }
}

/// Wanted crossover direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossDirection {
    #[default]
    Any,
    Bullish,
    Bearish,
}

impl CrossDirection {
    /// `Any` accepts either detected direction but never the absence of a
    /// cross; a specific direction needs an exact match.
    pub fn matches(&self, state: CrossoverState) -> bool {
        match self {
            CrossDirection::Any => state.is_cross(),
            CrossDirection::Bullish => state == CrossoverState::Bullish,
            CrossDirection::Bearish => state == CrossoverState::Bearish,
        }
    }
}

impl FromStr for CrossDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" => Ok(CrossDirection::Any),
            "bullish" => Ok(CrossDirection::Bullish),
            "bearish" => Ok(CrossDirection::Bearish),
            _ => Err(format!("Invalid crossover direction: {}", s)),
        }
    }
}

/// One screening test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Criterion {
    /// RSI inside `[min, max]`; symbols without an RSI pass.
    RsiRange { min: f64, max: f64 },
    /// Latest close above (or below) an EMA.
    AboveEma {
        period: EmaPeriod,
        #[serde(default)]
        expect: FlagFilter,
    },
    /// MACD crossover state on the last session.
    MacdState {
        #[serde(default)]
        state: MacdStateFilter,
    },
    /// Most recent EMA crossover within `lookback` sessions.
    EmaCrossover {
        #[serde(default)]
        pair: EmaPair,
        #[serde(default)]
        direction: CrossDirection,
        #[serde(default)]
        lookback: Option<usize>,
    },
}

impl Criterion {
    /// Check parameters that cannot be expressed in the type.
    pub fn validate(&self) -> Result<(), ScreenerError> {
        if let Criterion::RsiRange { min, max } = self {
            if !min.is_finite() || !max.is_finite() {
                return Err(ScreenerError::Validation(
                    "RSI bounds must be finite".into(),
                ));
            }
            if min > max {
                return Err(ScreenerError::Validation(format!(
                    "RSI range is empty: min {} > max {}",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// True when the criterion cannot exclude anything.
    pub fn is_noop(&self) -> bool {
        match self {
            Criterion::RsiRange { .. } => false,
            Criterion::AboveEma { expect, .. } => *expect == FlagFilter::Any,
            Criterion::MacdState { state } => *state == MacdStateFilter::Any,
            Criterion::EmaCrossover { pair, .. } => *pair == EmaPair::None,
        }
    }
}

/// AND-composition of criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

impl FilterCriteria {
    /// Criteria that match every symbol.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a criterion.
    pub fn with(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// Add an RSI range.
    pub fn rsi_range(self, min: f64, max: f64) -> Self {
        self.with(Criterion::RsiRange { min, max })
    }

    /// Add an above/below EMA test.
    pub fn above_ema(self, period: EmaPeriod, expect: FlagFilter) -> Self {
        self.with(Criterion::AboveEma { period, expect })
    }

    /// Add a MACD state test.
    pub fn macd_state(self, state: MacdStateFilter) -> Self {
        self.with(Criterion::MacdState { state })
    }

    /// Add an EMA crossover test.
    pub fn ema_crossover(
        self,
        pair: EmaPair,
        direction: CrossDirection,
        lookback: Option<usize>,
    ) -> Self {
        self.with(Criterion::EmaCrossover {
            pair,
            direction,
            lookback,
        })
    }

    /// Validate every criterion.
    pub fn validate(&self) -> Result<(), ScreenerError> {
        self.criteria.iter().try_for_each(Criterion::validate)
    }

    /// Criteria that can actually exclude a symbol.
    pub fn active(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter().filter(|c| !c.is_noop())
    }

    /// Parse criteria from JSON.
    pub fn from_json(json: &str) -> Result<Self, ScreenerError> {
        let criteria: Self = serde_json::from_str(json)
            .map_err(|e| ScreenerError::Serialization(e.to_string()))?;
        criteria.validate()?;
        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_filter_rejects_absent() {
        assert!(FlagFilter::Any.matches(None));
        assert!(!FlagFilter::True.matches(None));
        assert!(!FlagFilter::False.matches(None));
        assert!(FlagFilter::True.matches(Some(true)));
        assert!(!FlagFilter::True.matches(Some(false)));
        assert!(FlagFilter::False.matches(Some(false)));
    }

    #[test]
    fn test_cross_direction_any_rejects_neutral() {
        assert!(CrossDirection::Any.matches(CrossoverState::Bullish));
        assert!(CrossDirection::Any.matches(CrossoverState::Bearish));
        assert!(!CrossDirection::Any.matches(CrossoverState::Neutral));
        assert!(!CrossDirection::Bullish.matches(CrossoverState::Bearish));
        assert!(CrossDirection::Bearish.matches(CrossoverState::Bearish));
    }

    #[test]
    fn test_macd_state_filter() {
        assert!(MacdStateFilter::Any.matches(CrossoverState::Neutral));
        assert!(MacdStateFilter::Neutral.matches(CrossoverState::Neutral));
        assert!(!MacdStateFilter::Neutral.matches(CrossoverState::Bullish));
    }

    #[test]
    fn test_ema_pair_parse() {
        assert_eq!("21x44".parse::<EmaPair>().unwrap(), EmaPair::E21x44);
        assert_eq!("44/200".parse::<EmaPair>().unwrap(), EmaPair::E44x200);
        assert_eq!("none".parse::<EmaPair>().unwrap(), EmaPair::None);
        assert!("9x21".parse::<EmaPair>().is_err());
        assert_eq!(EmaPair::E21x200.to_string(), "21x200");
    }

    #[test]
    fn test_ema_period_parse() {
        assert_eq!("200".parse::<EmaPeriod>().unwrap(), EmaPeriod::P200);
        assert!("50".parse::<EmaPeriod>().is_err());
    }

    #[test]
    fn test_criteria_from_json() {
        let json = r#"{"criteria": [
            {"kind": "rsi_range", "min": 0, "max": 30},
            {"kind": "above_ema", "period": 200, "expect": "true"},
            {"kind": "macd_state", "state": "bullish"},
            {"kind": "ema_crossover", "pair": "21x44", "direction": "any", "lookback": 10}
        ]}"#;
        let criteria = FilterCriteria::from_json(json).unwrap();

        assert_eq!(
            criteria,
            FilterCriteria::new()
                .rsi_range(0.0, 30.0)
                .above_ema(EmaPeriod::P200, FlagFilter::True)
                .macd_state(MacdStateFilter::Bullish)
                .ema_crossover(EmaPair::E21x44, CrossDirection::Any, Some(10))
        );
    }

    #[test]
    fn test_criteria_rejects_bad_input() {
        assert!(FilterCriteria::from_json(r#"{"criteria": [{"kind": "rsi_range", "min": 70, "max": 30}]}"#).is_err());
        assert!(FilterCriteria::from_json(r#"{"criteria": [{"kind": "above_ema", "period": 50}]}"#).is_err());
        assert!(FilterCriteria::from_json(r#"{"criteria": [{"kind": "volume_spike"}]}"#).is_err());
    }

    #[test]
    fn test_noop_criteria() {
        let criteria = FilterCriteria::new()
            .above_ema(EmaPeriod::P21, FlagFilter::Any)
            .macd_state(MacdStateFilter::Any)
            .ema_crossover(EmaPair::None, CrossDirection::Bullish, None)
            .rsi_range(0.0, 100.0);

        assert_eq!(criteria.active().count(), 1);
    }
}
