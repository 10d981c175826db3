//! Core traits for the screening engine.

mod data_source;
mod indicator;

pub use data_source::{BarSource, IngestControl, SectorLookup};
pub use indicator::{Indicator, MultiOutputIndicator, StreamingIndicator};
