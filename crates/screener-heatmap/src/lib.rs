//! Sector heatmap.
//!
//! Groups the percentage change of each symbol over a fixed [`Horizon`] by
//! sector and averages it. Independent of the indicator pipeline: only the
//! bar series and sector metadata are used.

mod aggregate;
mod horizon;

pub use aggregate::{aggregate, change_pct, Heatmap, HeatmapMember, SectorSummary};
pub use horizon::Horizon;
