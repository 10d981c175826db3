//! Stable single-key ordering of screening results.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::record::SymbolRecord;

/// Record field to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Symbol,
    Name,
    LatestClose,
    Rsi,
    #[serde(rename = "dist_21")]
    Dist21,
    #[serde(rename = "dist_44")]
    Dist44,
    #[serde(rename = "dist_200")]
    Dist200,
    Macd,
    MacdSignal,
    MacdHist,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "symbol" => Ok(SortKey::Symbol),
            "name" => Ok(SortKey::Name),
            "latest_close" | "close" => Ok(SortKey::LatestClose),
            "rsi" => Ok(SortKey::Rsi),
            "dist_21" => Ok(SortKey::Dist21),
            "dist_44" => Ok(SortKey::Dist44),
            "dist_200" => Ok(SortKey::Dist200),
            "macd" => Ok(SortKey::Macd),
            "macd_signal" => Ok(SortKey::MacdSignal),
            "macd_hist" => Ok(SortKey::MacdHist),
            _ => Err(format!("Invalid sort key: {}", s)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Symbol => "symbol",
            SortKey::Name => "name",
            SortKey::LatestClose => "latest_close",
            SortKey::Rsi => "rsi",
            SortKey::Dist21 => "dist_21",
            SortKey::Dist44 => "dist_44",
            SortKey::Dist200 => "dist_200",
            SortKey::Macd => "macd",
            SortKey::MacdSignal => "macd_signal",
            SortKey::MacdHist => "macd_hist",
        };
        write!(f, "{}", s)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

/// Sort key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortCriteria {
    pub key: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortCriteria {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Compare two records; absent values go last in either direction.
    pub fn compare(&self, a: &SymbolRecord, b: &SymbolRecord) -> Ordering {
        match self.key {
            SortKey::Symbol => self.nulls_last(Some(a.symbol.as_str()), Some(b.symbol.as_str()), Ord::cmp),
            SortKey::Name => self.nulls_last(a.name.as_deref(), b.name.as_deref(), Ord::cmp),
            key => self.nulls_last(numeric(key, a), numeric(key, b), f64::total_cmp),
        }
    }

    fn nulls_last<T>(
        &self,
        a: Option<T>,
        b: Option<T>,
        cmp: impl Fn(&T, &T) -> Ordering,
    ) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => match self.order {
                SortOrder::Asc => cmp(&a, &b),
                SortOrder::Desc => cmp(&b, &a),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Sort in place. The sort is stable: ties keep their input order.
    pub fn sort(&self, records: &mut [&SymbolRecord]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

fn numeric(key: SortKey, record: &SymbolRecord) -> Option<f64> {
    match key {
        SortKey::LatestClose => record.latest_close,
        SortKey::Rsi => record.rsi,
        SortKey::Dist21 => record.dist_21,
        SortKey::Dist44 => record.dist_44,
        SortKey::Dist200 => record.dist_200,
        SortKey::Macd => record.macd,
        SortKey::MacdSignal => record.macd_signal,
        SortKey::MacdHist => record.macd_hist,
        SortKey::Symbol | SortKey::Name => None,
    }
}
