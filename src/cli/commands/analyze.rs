//! Analyze command implementation.

use anyhow::{bail, Result};
use screener_config::AppConfig;
use std::collections::BTreeMap;
use tracing::info;

use super::{analyzed_records, print_table};
use crate::cli::{AnalyzeArgs, OutputFormat};

pub async fn run(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let (snapshot, records) = analyzed_records(config).await?;
    info!(records = records.len(), "analysis complete");

    let selected: Vec<_> = match &args.symbol {
        Some(symbol) => {
            let found: Vec<_> = records.iter().filter(|r| &r.symbol == symbol).collect();
            if found.is_empty() {
                match snapshot.bars.get(symbol) {
                    Some(bars) => bail!(
                        "{} has {} bars, fewer than the {} required",
                        symbol,
                        bars.len(),
                        config.analysis.min_bars
                    ),
                    None => bail!("No data for symbol {}", symbol),
                }
            }
            found
        }
        None => records.iter().collect(),
    };

    match args.output {
        OutputFormat::Json => {
            let by_symbol: BTreeMap<&str, _> =
                selected.iter().map(|r| (r.symbol.as_str(), *r)).collect();
            println!("{}", serde_json::to_string_pretty(&by_symbol)?);
        }
        OutputFormat::Text => {
            if selected.is_empty() {
                println!("No symbols with enough history.");
            } else {
                print_table(&selected);
            }
        }
    }

    Ok(())
}
