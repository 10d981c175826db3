//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use screener_heatmap::Horizon;
use screener_screening::{CrossDirection, EmaPair, FlagFilter, MacdStateFilter, SortKey, SortOrder};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "screener")]
#[command(author, version, about = "Technical-indicator screening for daily equity bars")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "SCREENER_CONFIG")]
    pub config: PathBuf,

    /// Log level (defaults to the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute indicator records for the universe
    Analyze(AnalyzeArgs),
    /// Filter and sort the analyzed universe
    Screen(ScreenArgs),
    /// Sector heatmap of price changes
    Heatmap(HeatmapArgs),
    /// Load bar files and report progress
    Ingest(IngestArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct AnalyzeArgs {
    /// Only show this symbol
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct ScreenArgs {
    /// Lower RSI bound (inclusive)
    #[arg(long)]
    pub rsi_min: Option<f64>,

    /// Upper RSI bound (inclusive)
    #[arg(long)]
    pub rsi_max: Option<f64>,

    /// Close above EMA21 (any, true, false)
    #[arg(long, default_value = "any")]
    pub above_21: FlagFilter,

    /// Close above EMA44 (any, true, false)
    #[arg(long, default_value = "any")]
    pub above_44: FlagFilter,

    /// Close above EMA200 (any, true, false)
    #[arg(long, default_value = "any")]
    pub above_200: FlagFilter,

    /// MACD crossover state (any, bullish, bearish, neutral)
    #[arg(long, default_value = "any")]
    pub macd: MacdStateFilter,

    /// EMA pair for the crossover test (21x44, 44x200, 21x200, none)
    #[arg(long, default_value = "none")]
    pub ema_pair: EmaPair,

    /// Crossover direction (any, bullish, bearish)
    #[arg(long, default_value = "any")]
    pub direction: CrossDirection,

    /// Sessions scanned for the EMA crossover (whole history if omitted)
    #[arg(long)]
    pub lookback: Option<usize>,

    /// JSON file with additional criteria
    #[arg(long)]
    pub criteria_file: Option<PathBuf>,

    /// Sort key
    #[arg(long)]
    pub sort_by: Option<SortKey>,

    /// Sort order (asc, desc)
    #[arg(long, default_value = "asc")]
    pub order: SortOrder,

    /// Show at most this many results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct HeatmapArgs {
    /// Horizon (1d, 1w, 1m, 3m, 6m, 1y); defaults to the configured one
    #[arg(short, long)]
    pub duration: Option<Horizon>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct IngestArgs {
    /// Only these symbols (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Process at most this many symbols
    #[arg(long)]
    pub limit: Option<usize>,

    /// Progress poll interval in milliseconds
    #[arg(long, default_value = "200")]
    pub poll_ms: u64,
}
