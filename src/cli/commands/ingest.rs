//! Ingest command implementation.

use anyhow::Result;
use screener_config::AppConfig;
use screener_core::types::IngestRequest;
use std::time::Duration;
use tracing::info;

use super::load_snapshot;
use crate::cli::IngestArgs;

pub async fn run(args: IngestArgs, config: &AppConfig) -> Result<()> {
    let request = IngestRequest {
        symbols: (!args.symbols.is_empty()).then(|| args.symbols.clone()),
        limit: args.limit,
    };
    info!(
        universe = %config.data.universe_path().display(),
        ohlcv = %config.data.ohlcv_path().display(),
        "starting ingest"
    );

    let mut last_done = None;
    let snapshot = load_snapshot(config, request, Duration::from_millis(args.poll_ms), |progress| {
        if last_done != Some(progress.done) {
            last_done = Some(progress.done);
            println!(
                "[{:>3.0}%] {}/{} {}",
                progress.fraction() * 100.0,
                progress.done,
                progress.total,
                progress.current.as_deref().unwrap_or("")
            );
        }
    })
    .await?;

    let missing = snapshot.universe.len() - snapshot.bars.len();
    println!();
    println!(
        "Loaded {} of {} symbols ({} without usable data)",
        snapshot.bars.len(),
        snapshot.universe.len(),
        missing
    );

    Ok(())
}
