//! Universe file loading.

use screener_core::error::DataError;
use screener_core::types::{Universe, UniverseEntry};
use serde::Deserialize;
use std::path::Path;

/// Universe file entry. Entries without a symbol are ignored.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    sector: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a universe from its JSON form: `[{symbol, name, sector}, ...]`.
pub fn parse_universe(json: &str) -> Result<Universe, DataError> {
    let raw: Vec<RawEntry> =
        serde_json::from_str(json).map_err(|e| DataError::Universe(e.to_string()))?;

    let entries = raw
        .into_iter()
        .filter_map(|entry| {
            let symbol = non_blank(entry.symbol)?;
            Some(UniverseEntry {
                symbol,
                name: non_blank(entry.name),
                sector: non_blank(entry.sector),
            })
        })
        .collect();

    Ok(Universe::new(entries))
}

/// Read and parse a universe file.
pub async fn load_universe(path: &Path) -> Result<Universe, DataError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DataError::Universe(format!("{}: {}", path.display(), e)))?;
    parse_universe(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_core::traits::SectorLookup;

    #[test]
    fn test_parse_universe() {
        let json = r#"[
            {"symbol": "AAPL", "name": "Apple Inc.", "sector": "Technology"},
            {"symbol": "XOM", "sector": ""},
            {"name": "No symbol"},
            {"symbol": " MSFT "}
        ]"#;
        let universe = parse_universe(json).unwrap();

        assert_eq!(universe.symbols(), vec!["AAPL", "XOM", "MSFT"]);
        assert_eq!(universe.sector_of("AAPL"), Some("Technology"));
        assert_eq!(universe.sector_of("XOM"), None);
        assert_eq!(universe.name_of("AAPL"), Some("Apple Inc."));
    }

    #[test]
    fn test_parse_universe_rejects_non_list() {
        let err = parse_universe(r#"{"symbol": "AAPL"}"#).unwrap_err();
        assert!(matches!(err, DataError::Universe(_)));
    }

    #[tokio::test]
    async fn test_load_missing_universe() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_universe(&dir.path().join("missing.json")).await.unwrap_err();
        assert!(matches!(err, DataError::Universe(_)));
    }
}
