//! Symbol analysis and multi-criteria screening.
//!
//! A [`SymbolRecord`] is built per symbol from its bar history by
//! [`analyze`]. [`screen`] filters a slice of records against
//! [`FilterCriteria`] and optionally orders the survivors by a
//! [`SortCriteria`].

mod criteria;
mod pipeline;
mod record;
mod sort;

pub use criteria::{
    CrossDirection, Criterion, EmaPair, EmaPeriod, FilterCriteria, FlagFilter, MacdStateFilter,
};
pub use pipeline::{matches, screen};
pub use record::{analyze, analyze_universe, ema_pair_crossover, AnalysisParams, SymbolRecord};
pub use sort::{SortCriteria, SortKey, SortOrder};
