//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Series;

/// One daily trading session.
///
/// Every price field is optional: a field that is missing or out of range
/// in the upstream data is carried as `None` instead of rejecting the bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Session date
    pub date: NaiveDate,
    /// Opening price
    pub open: Option<f64>,
    /// Highest price
    pub high: Option<f64>,
    /// Lowest price
    pub low: Option<f64>,
    /// Closing price
    pub close: Option<f64>,
    /// Traded volume
    pub volume: Option<u64>,
}

impl Bar {
    /// Create a new bar with every field present.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    /// Create a bar carrying only a close price.
    pub fn close_only(date: NaiveDate, close: Option<f64>) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    /// Drop fields that are out of range or inconsistent.
    ///
    /// Prices must be finite and strictly positive. A high below the low
    /// leaves no way to tell which one is wrong, so both are dropped. The
    /// remaining fields are kept untouched.
    pub fn sanitized(self) -> Self {
        let price = |v: Option<f64>| v.filter(|p| p.is_finite() && *p > 0.0);

        let mut high = price(self.high);
        let mut low = price(self.low);
        if let (Some(h), Some(l)) = (high, low) {
            if h < l {
                high = None;
                low = None;
            }
        }

        Self {
            date: self.date,
            open: price(self.open),
            high,
            low,
            close: price(self.close),
            volume: self.volume,
        }
    }
}

/// Date-ordered bar history for one symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Create a new empty bar series.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    /// Create a series from bars in any order; they are sorted by date.
    pub fn from_bars(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Close of the most recent bar, if that close is present.
    pub fn latest_close(&self) -> Option<f64> {
        self.last().and_then(|b| b.close)
    }

    /// Extract close prices, one slot per bar.
    pub fn closes(&self) -> Series {
        self.bars.iter().map(|b| b.close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_sanitize_drops_only_offending_fields() {
        let bar = Bar {
            date: day(3),
            open: Some(f64::NAN),
            high: Some(110.0),
            low: Some(95.0),
            close: Some(-1.0),
            volume: Some(500),
        }
        .sanitized();

        assert_eq!(bar.open, None);
        assert_eq!(bar.high, Some(110.0));
        assert_eq!(bar.low, Some(95.0));
        assert_eq!(bar.close, None);
        assert_eq!(bar.volume, Some(500));
    }

    #[test]
    fn test_sanitize_inverted_range() {
        let bar = Bar::new(day(4), 100.0, 90.0, 95.0, 100.0, 10).sanitized();

        assert_eq!(bar.high, None);
        assert_eq!(bar.low, None);
        assert_eq!(bar.open, Some(100.0));
        assert_eq!(bar.close, Some(100.0));
    }

    #[test]
    fn test_from_bars_sorts_by_date() {
        let series = BarSeries::from_bars(
            "AAPL",
            vec![
                Bar::close_only(day(5), Some(3.0)),
                Bar::close_only(day(2), Some(1.0)),
                Bar::close_only(day(3), Some(2.0)),
            ],
        );

        assert_eq!(series.closes(), vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(series.latest_close(), Some(3.0));
        assert_eq!(series.bars()[0].date, day(2));
    }

    #[test]
    fn test_closes_keep_absent_slots() {
        let series = BarSeries::from_bars(
            "AAPL",
            vec![
                Bar::new(day(2), 100.0, 101.0, 99.0, 100.5, 1000),
                Bar::close_only(day(3), None),
            ],
        );

        assert_eq!(series.closes(), vec![Some(100.5), None]);
        assert_eq!(series.latest_close(), None);
        assert_eq!(series.len(), 2);
        assert!(BarSeries::new("EMPTY").is_empty());
    }
}
