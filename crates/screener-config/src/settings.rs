//! Configuration structures.

use screener_core::error::ScreenerError;
use screener_heatmap::Horizon;
use screener_screening::AnalysisParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub analysis: AnalysisParams,
    #[serde(default)]
    pub heatmap: HeatmapSettings,
}

impl AppConfig {
    /// Check values the types cannot rule out.
    pub fn validate(&self) -> Result<(), ScreenerError> {
        if self.analysis.rsi_period == 0 {
            return Err(ScreenerError::Config(
                "analysis.rsi_period must be at least 1".into(),
            ));
        }
        if self.analysis.min_bars == 0 {
            return Err(ScreenerError::Config(
                "analysis.min_bars must be at least 1".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ScreenerError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        if self.data.universe_file.as_os_str().is_empty() {
            return Err(ScreenerError::Config("data.universe_file is empty".into()));
        }
        Ok(())
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ScreenerError> {
        toml::to_string_pretty(self).map_err(|e| ScreenerError::Serialization(e.to_string()))
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "screener".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Directory for daily-rolling log files
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

/// Locations of the downloaded data.
///
/// Relative `universe_file` and `ohlcv_dir` are resolved against `data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub data_dir: PathBuf,
    pub universe_file: PathBuf,
    pub ohlcv_dir: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            universe_file: PathBuf::from("universe.json"),
            ohlcv_dir: PathBuf::from("ohlcv"),
        }
    }
}

impl DataSettings {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    pub fn universe_path(&self) -> PathBuf {
        self.resolve(&self.universe_file)
    }

    pub fn ohlcv_path(&self) -> PathBuf {
        self.resolve(&self.ohlcv_dir)
    }
}

/// Heatmap defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapSettings {
    pub default_duration: Horizon,
}
