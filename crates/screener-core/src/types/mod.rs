//! Core data types for the screening engine.

mod job;
mod ohlcv;
mod series;
mod universe;

pub use job::{IngestRequest, JobId, JobProgress, JobStatus};
pub use ohlcv::{Bar, BarSeries};
pub use series::{CrossoverState, Series};
pub use universe::{Universe, UniverseEntry, UNKNOWN_SECTOR};
