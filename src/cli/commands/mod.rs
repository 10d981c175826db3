//! CLI command implementations.

pub mod analyze;
pub mod heatmap;
pub mod ingest;
pub mod screen;
pub mod validate;

use anyhow::{bail, Context, Result};
use screener_config::AppConfig;
use screener_core::traits::IngestControl;
use screener_core::types::{IngestRequest, JobProgress, JobStatus};
use screener_data::{CsvBarSource, LocalIngest, Snapshot, SnapshotStore};
use screener_screening::{analyze_universe, SymbolRecord};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Run an ingest job over the configured data and return the snapshot.
///
/// `on_progress` is called after each poll while the job runs.
pub async fn load_snapshot(
    config: &AppConfig,
    request: IngestRequest,
    poll: Duration,
    on_progress: impl FnMut(&JobProgress),
) -> Result<Arc<Snapshot>> {
    let source = CsvBarSource::new(config.data.ohlcv_path(), config.data.universe_path());
    let ingest = LocalIngest::new(Arc::new(source), Arc::new(SnapshotStore::new()));

    let job = ingest.trigger(request).await?;
    let progress = ingest.wait(&job, poll, on_progress).await?;

    if progress.status == JobStatus::Error {
        bail!(
            "Data load failed: {}",
            progress.error.unwrap_or_else(|| "unknown error".into())
        );
    }

    let snapshot = ingest.store().current().context("No data snapshot was published")?;
    info!(
        symbols = snapshot.universe.len(),
        loaded = snapshot.bars.len(),
        "data loaded"
    );
    Ok(snapshot)
}

/// Load the data and build the analysis records.
pub async fn analyzed_records(config: &AppConfig) -> Result<(Arc<Snapshot>, Vec<SymbolRecord>)> {
    let snapshot = load_snapshot(config, IngestRequest::default(), Duration::from_millis(20), |_| {}).await?;
    let records = analyze_universe(&snapshot.universe, &snapshot.bars, &config.analysis);
    Ok((snapshot, records))
}

/// Format an optional number for tables.
pub fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

/// Print records as a fixed-width table.
pub fn print_table(records: &[&SymbolRecord]) {
    println!(
        "{:<10} {:>10} {:>7} {:>9} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Symbol", "Close", "RSI", "MACD hist", "MACD x", "EMA x", "d21 %", "d44 %", "d200 %"
    );
    for r in records {
        println!(
            "{:<10} {:>10} {:>7} {:>9} {:>8} {:>8} {:>8} {:>8} {:>8}",
            r.symbol,
            fmt_opt(r.latest_close, 2),
            fmt_opt(r.rsi, 1),
            fmt_opt(r.macd_hist, 3),
            r.macd_crossover.to_string(),
            r.ema_crossover.to_string(),
            fmt_opt(r.dist_21, 2),
            fmt_opt(r.dist_44, 2),
            fmt_opt(r.dist_200, 2),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(12.3456), 2), "12.35");
        assert_eq!(fmt_opt(None, 2), "-");
    }
}
