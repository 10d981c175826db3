//! CSV bar files as written by the downloader.
//!
//! Two layouts are accepted. The Yahoo layout has a `Price,...` header row
//! followed by `Ticker,...` and `Date,...` rows before the data; the plain
//! layout has a single `Date,Open,High,Low,Close,Adj Close,Volume` header.
//! Any row whose first cell is not a date is skipped.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use screener_core::error::DataError;
use screener_core::traits::BarSource;
use screener_core::types::{Bar, BarSeries, Universe};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::universe::load_universe;

/// Close column names, most preferred first.
const CLOSE_COLUMNS: [&str; 5] = ["Close", "close", "Adj Close", "AdjClose", "Adj_Close"];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Directory of per-symbol CSV files plus the universe file.
#[derive(Debug, Clone)]
pub struct CsvBarSource {
    ohlcv_dir: PathBuf,
    universe_file: PathBuf,
}

impl CsvBarSource {
    /// Create a source reading `<ohlcv_dir>/<SYMBOL>.csv`.
    pub fn new(ohlcv_dir: impl Into<PathBuf>, universe_file: impl Into<PathBuf>) -> Self {
        Self {
            ohlcv_dir: ohlcv_dir.into(),
            universe_file: universe_file.into(),
        }
    }

    pub fn ohlcv_dir(&self) -> &Path {
        &self.ohlcv_dir
    }

    pub fn universe_file(&self) -> &Path {
        &self.universe_file
    }

    /// Path of the bar file for a symbol.
    pub fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.ohlcv_dir.join(format!("{}.csv", symbol))
    }
}

#[async_trait]
impl BarSource for CsvBarSource {
    async fn load_universe(&self) -> Result<Universe, DataError> {
        load_universe(&self.universe_file).await
    }

    async fn load_bars(&self, symbol: &str) -> Result<BarSeries, DataError> {
        let path = self.symbol_path(symbol);
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataError::SymbolNotFound(symbol.to_string()));
            }
            Err(e) => {
                return Err(DataError::Unavailable(format!("{}: {}", path.display(), e)));
            }
        };
        parse_bars(symbol, content.as_slice())
    }

    fn name(&self) -> &str {
        "CSV"
    }
}

/// Column positions resolved from the header row.
#[derive(Debug, Default)]
struct Columns {
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Self {
        let find = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| header.iter().position(|h| h == *name))
        };

        Self {
            open: find(&["Open", "open"]),
            high: find(&["High", "high"]),
            low: find(&["Low", "low"]),
            // Without a recognizable close column the second column is used
            close: find(&CLOSE_COLUMNS).or_else(|| (header.len() > 1).then_some(1)),
            volume: find(&["Volume", "volume"]),
        }
    }

    fn price(record: &StringRecord, column: Option<usize>) -> Option<f64> {
        record.get(column?)?.parse::<f64>().ok()
    }

    fn volume(&self, record: &StringRecord) -> Option<u64> {
        Self::price(record, self.volume)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
    }

    fn bar(&self, date: NaiveDate, record: &StringRecord) -> Bar {
        Bar {
            date,
            open: Self::price(record, self.open),
            high: Self::price(record, self.high),
            low: Self::price(record, self.low),
            close: Self::price(record, self.close),
            volume: self.volume(record),
        }
        .sanitized()
    }
}

/// Parse a date cell.
fn parse_date(s: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(d);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    // Timezone-qualified timestamps, e.g. "2024-01-02 00:00:00+00:00"
    DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z")
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
        .map(|dt| dt.date_naive())
}

/// Parse a bar file.
///
/// Unparsable cells become absent fields and rows without a parsable date
/// are skipped, so a damaged file still yields whatever it holds. Only a
/// file the CSV reader cannot decode at all is an error.
pub fn parse_bars<R: Read>(symbol: &str, reader: R) -> Result<BarSeries, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = reader.records();
    let header = match records.next() {
        Some(header) => header.map_err(|e| DataError::ParseError(format!("{}: {}", symbol, e)))?,
        None => return Ok(BarSeries::new(symbol)),
    };
    let columns = Columns::from_header(&header);

    let mut bars = Vec::new();
    let mut skipped = 0usize;
    for record in records {
        let record = record.map_err(|e| DataError::ParseError(format!("{}: {}", symbol, e)))?;
        match record.get(0).and_then(parse_date) {
            Some(date) => bars.push(columns.bar(date, &record)),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(symbol, skipped, "rows without a date skipped");
    }

    Ok(BarSeries::from_bars(symbol, bars))
}
