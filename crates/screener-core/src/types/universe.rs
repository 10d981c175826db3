//! Universe metadata: which symbols are screened and how they are labelled.

use serde::{Deserialize, Serialize};

use crate::traits::SectorLookup;

/// Sector label used for symbols without one.
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// One entry of the universe file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseEntry {
    /// Symbol identifier
    pub symbol: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Sector classification
    #[serde(default)]
    pub sector: Option<String>,
}

impl UniverseEntry {
    /// Create an entry with only a symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            sector: None,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the sector.
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }
}

/// Ordered symbol universe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Universe {
    entries: Vec<UniverseEntry>,
}

impl Universe {
    /// Create a universe from entries, keeping their order.
    ///
    /// Entries with an empty symbol are dropped.
    pub fn new(entries: Vec<UniverseEntry>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|e| !e.symbol.trim().is_empty())
            .collect();
        Self { entries }
    }

    /// Get all entries in file order.
    pub fn entries(&self) -> &[UniverseEntry] {
        &self.entries
    }

    /// Get the entry for a symbol.
    pub fn get(&self, symbol: &str) -> Option<&UniverseEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    /// Symbols in file order.
    pub fn symbols(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.symbol.clone()).collect()
    }

    /// Keep only the given symbols, preserving file order.
    pub fn restrict_to(&self, symbols: &[String]) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| symbols.contains(&e.symbol))
                .cloned()
                .collect(),
        }
    }

    /// Keep at most `limit` entries.
    pub fn truncated(mut self, limit: usize) -> Self {
        self.entries.truncate(limit);
        self
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the universe is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SectorLookup for Universe {
    fn sector_of(&self, symbol: &str) -> Option<&str> {
        self.get(symbol).and_then(|e| e.sector.as_deref())
    }

    fn name_of(&self, symbol: &str) -> Option<&str> {
        self.get(symbol).and_then(|e| e.name.as_deref())
    }
}
