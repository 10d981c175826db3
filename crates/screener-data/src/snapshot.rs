//! Atomically published data snapshots.

use chrono::{DateTime, Utc};
use screener_core::error::DataError;
use screener_core::types::{BarSeries, Universe};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Universe metadata and bar series loaded together.
///
/// Never mutated after construction; readers hold it through an `Arc`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub universe: Universe,
    pub bars: HashMap<String, BarSeries>,
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(universe: Universe, bars: HashMap<String, BarSeries>) -> Self {
        Self {
            universe,
            bars,
            loaded_at: Utc::now(),
        }
    }

    /// Bar series in universe order, skipping symbols without bars.
    pub fn series(&self) -> impl Iterator<Item = &BarSeries> {
        self.universe
            .entries()
            .iter()
            .filter_map(|entry| self.bars.get(&entry.symbol))
    }

    /// Get the bars of a symbol.
    pub fn bars_of(&self, symbol: &str) -> Result<&BarSeries, DataError> {
        self.bars
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }
}

/// Holder of the current snapshot.
///
/// A new snapshot replaces the old one in a single swap; readers that
/// already cloned the old `Arc` keep a consistent view.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot.
    pub fn publish(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }

    /// Get the current snapshot.
    ///
    /// Fails with [`DataError::Unavailable`] until a snapshot is published.
    pub fn current(&self) -> Result<Arc<Snapshot>, DataError> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| DataError::Unavailable("no data snapshot has been loaded".into()))
    }

    pub fn is_loaded(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
