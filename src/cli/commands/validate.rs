//! Validate configuration command.

use anyhow::Result;
use screener_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Universe file: {}", config.data.universe_path().display());
    println!("OHLCV directory: {}", config.data.ohlcv_path().display());
    println!("RSI period: {}", config.analysis.rsi_period);
    println!("Minimum bars: {}", config.analysis.min_bars);
    println!("Default crossover pair: {}", config.analysis.crossover_pair);
    println!("Default heatmap duration: {}", config.heatmap.default_duration);
    println!();
    println!("Effective configuration:");
    println!("{}", config.to_toml()?);

    Ok(())
}
