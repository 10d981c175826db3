//! Screener CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use screener_config::{load_config, AppConfig};
use screener_monitor::setup_logging;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // validate-config reports its own load errors
    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(&cli.config).await;
    }

    let (config, missing) = if cli.config.exists() {
        let config = load_config(&cli.config)
            .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
        (config, false)
    } else {
        (AppConfig::default(), true)
    };
    config.validate().context("Invalid configuration")?;

    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let json = cli.json_logs || config.logging.is_json();
    let _guard = setup_logging(&level, json, config.logging.file.as_deref());

    if missing {
        warn!(path = %cli.config.display(), "configuration file not found, using defaults");
    }

    match cli.command {
        Commands::Analyze(args) => cli::commands::analyze::run(args, &config).await,
        Commands::Screen(args) => cli::commands::screen::run(args, &config).await,
        Commands::Heatmap(args) => cli::commands::heatmap::run(args, &config).await,
        Commands::Ingest(args) => cli::commands::ingest::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
