//! Per-symbol analysis records.

use screener_core::traits::Indicator;
use screener_core::types::{BarSeries, CrossoverState, Series, Universe};
use screener_indicators::{detect_crossover, macd, Ema, Rsi};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::criteria::{EmaPair, EmaPeriod};

/// Parameters of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// RSI period
    pub rsi_period: usize,
    /// Symbols with fewer bars are left out of the analysis
    pub min_bars: usize,
    /// Pair reported as `ema_crossover` on each record
    pub crossover_pair: EmaPair,
    /// Sessions scanned for `ema_crossover` (absent = whole history)
    pub crossover_lookback: Option<usize>,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            min_bars: 10,
            crossover_pair: EmaPair::E21x44,
            crossover_lookback: Some(10),
        }
    }
}

/// Indicator snapshot of one symbol, built from its full bar history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub symbol: String,
    pub name: Option<String>,
    pub latest_close: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub macd_crossover: CrossoverState,
    pub ema_crossover: CrossoverState,
    pub above_21: Option<bool>,
    pub above_44: Option<bool>,
    pub above_200: Option<bool>,
    pub dist_21: Option<f64>,
    pub dist_44: Option<f64>,
    pub dist_200: Option<f64>,
    /// Raw bars, so consumers can chart without another query
    pub bars: BarSeries,
}

impl SymbolRecord {
    /// Whether the latest close is above the given EMA.
    pub fn above(&self, period: EmaPeriod) -> Option<bool> {
        match period {
            EmaPeriod::P21 => self.above_21,
            EmaPeriod::P44 => self.above_44,
            EmaPeriod::P200 => self.above_200,
        }
    }

    /// Percentage distance of the latest close from the given EMA.
    pub fn dist(&self, period: EmaPeriod) -> Option<f64> {
        match period {
            EmaPeriod::P21 => self.dist_21,
            EmaPeriod::P44 => self.dist_44,
            EmaPeriod::P200 => self.dist_200,
        }
    }

    fn set_ema_position(&mut self, period: EmaPeriod, above: Option<bool>, dist: Option<f64>) {
        match period {
            EmaPeriod::P21 => {
                self.above_21 = above;
                self.dist_21 = dist;
            }
            EmaPeriod::P44 => {
                self.above_44 = above;
                self.dist_44 = dist;
            }
            EmaPeriod::P200 => {
                self.above_200 = above;
                self.dist_200 = dist;
            }
        }
    }
}

/// Compare a close with an EMA value.
///
/// Returns (above, percent distance). The distance is absent for a zero EMA.
fn ema_position(close: Option<f64>, ema: Option<f64>) -> (Option<bool>, Option<f64>) {
    match (close, ema) {
        (Some(close), Some(ema)) => {
            let dist = if ema == 0.0 {
                None
            } else {
                Some((close - ema) / ema * 100.0)
            };
            (Some(close > ema), dist)
        }
        _ => (None, None),
    }
}

/// EMA crossover state of a pair over `closes`.
pub fn ema_pair_crossover(closes: &Series, pair: EmaPair, lookback: Option<usize>) -> CrossoverState {
    match pair.periods() {
        Some((short, long)) => {
            let short = Ema::new(short.length()).calculate(closes);
            let long = Ema::new(long.length()).calculate(closes);
            detect_crossover(&short, &long, lookback)
        }
        None => CrossoverState::Neutral,
    }
}

/// Build the record of one symbol.
pub fn analyze(bars: BarSeries, name: Option<String>, params: &AnalysisParams) -> SymbolRecord {
    let closes = bars.closes();
    let latest_close = bars.latest_close();

    let rsi = Rsi::new(params.rsi_period.max(1)).calculate(&closes);
    let macd = macd(&closes);
    let latest_macd = macd.last();

    let mut record = SymbolRecord {
        symbol: bars.symbol.clone(),
        name,
        latest_close,
        rsi: rsi.last().copied().flatten(),
        macd: latest_macd.macd,
        macd_signal: latest_macd.signal,
        macd_hist: latest_macd.histogram,
        macd_crossover: macd.crossover(),
        ema_crossover: ema_pair_crossover(&closes, params.crossover_pair, params.crossover_lookback),
        ..Default::default()
    };

    for period in EmaPeriod::ALL {
        let ema = Ema::new(period.length()).calculate(&closes);
        let (above, dist) = ema_position(latest_close, ema.last().copied().flatten());
        record.set_ema_position(period, above, dist);
    }

    record.bars = bars;
    record
}

/// Build records for every universe symbol with enough history.
///
/// Records come back in universe order. Symbols without bars, or with fewer
/// than `params.min_bars`, are skipped.
pub fn analyze_universe(
    universe: &Universe,
    bars: &HashMap<String, BarSeries>,
    params: &AnalysisParams,
) -> Vec<SymbolRecord> {
    universe
        .entries()
        .iter()
        .filter_map(|entry| {
            let Some(series) = bars.get(&entry.symbol) else {
                debug!(symbol = %entry.symbol, "no bars loaded, skipping");
                return None;
            };
            if series.len() < params.min_bars {
                debug!(
                    symbol = %entry.symbol,
                    bars = series.len(),
                    min_bars = params.min_bars,
                    "not enough history, skipping"
                );
                return None;
            }
            Some(analyze(series.clone(), entry.name.clone(), params))
        })
        .collect()
}
