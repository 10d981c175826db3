//! Data access for the screener.
//!
//! Bars and universe metadata are read from the files left behind by the
//! external downloader. [`LocalIngest`] loads them in the background and
//! publishes a complete [`Snapshot`] into a [`SnapshotStore`]; analysis
//! requests read whichever snapshot is current.

mod csv_source;
mod ingest;
mod snapshot;
mod universe;

pub use csv_source::{parse_bars, CsvBarSource};
pub use ingest::LocalIngest;
pub use snapshot::{Snapshot, SnapshotStore};
pub use universe::{load_universe, parse_universe};
