//! Momentum indicators.

use screener_core::traits::{Indicator, MultiOutputIndicator, StreamingIndicator};
use screener_core::types::{CrossoverState, Series};
use serde::{Deserialize, Serialize};

use crate::crossover::detect_crossover;
use crate::moving_average::ema;

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    ///
    /// # Panics
    /// If `period` is zero.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Get the period.
    pub fn period(&self) -> usize {
        self.period
    }

    /// End index of the earliest run of `len` consecutive present values.
    fn first_valid_window(data: &[Option<f64>], len: usize) -> Option<usize> {
        let mut run = 0;
        for (i, value) in data.iter().enumerate() {
            if value.is_some() {
                run += 1;
                if run == len {
                    return Some(i);
                }
            } else {
                run = 0;
            }
        }
        None
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    fn calculate(&self, data: &[Option<f64>]) -> Series {
        let mut result = vec![None; data.len()];

        let Some(end) = Self::first_valid_window(data, self.period + 1) else {
            return result;
        };
        let start = end - self.period;

        // Seed averages from the deltas inside the window
        let (mut gain, mut loss) = (0.0, 0.0);
        for pair in data[start..=end].windows(2) {
            if let (Some(prev), Some(cur)) = (pair[0], pair[1]) {
                let change = cur - prev;
                if change > 0.0 {
                    gain += change;
                } else {
                    loss -= change;
                }
            }
        }

        let period = self.period as f64;
        let mut state = WilderState::new(self.period);
        state.seed(gain / period, loss / period);
        result[end] = state.current();

        for i in (end + 1)..data.len() {
            let delta = match (data[i - 1], data[i]) {
                (Some(prev), Some(cur)) => Some(cur - prev),
                _ => None,
            };
            result[i] = state.update(delta);
        }

        result
    }

    fn warmup(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// Wilder-smoothed average gain and loss.
///
/// Fed close-to-close deltas once seeded; an absent delta yields `None`
/// without touching the averages.
#[derive(Debug, Clone)]
pub struct WilderState {
    period: f64,
    averages: Option<(f64, f64)>,
}

impl WilderState {
    /// Create an unseeded accumulator.
    pub fn new(period: usize) -> Self {
        Self {
            period: period as f64,
            averages: None,
        }
    }

    /// Seed with initial average gain and average loss.
    pub fn seed(&mut self, avg_gain: f64, avg_loss: f64) {
        self.averages = Some((avg_gain, avg_loss));
    }

    /// Current (average gain, average loss).
    pub fn averages(&self) -> Option<(f64, f64)> {
        self.averages
    }

    /// RSI from smoothed averages.
    ///
    /// Flat prices (no gain, no loss) read as 50; no loss at all reads as 100.
    pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_gain == 0.0 && avg_loss == 0.0 {
            50.0
        } else if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        }
    }
}

impl StreamingIndicator for WilderState {
    type Output = f64;

    fn update(&mut self, delta: Option<f64>) -> Option<f64> {
        let change = delta?;
        let (avg_gain, avg_loss) = self.averages?;

        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        let smoothed = (
            (avg_gain * (self.period - 1.0) + gain) / self.period,
            (avg_loss * (self.period - 1.0) + loss) / self.period,
        );
        self.averages = Some(smoothed);
        self.current()
    }

    fn current(&self) -> Option<f64> {
        self.averages
            .map(|(gain, loss)| Self::rsi_from_averages(gain, loss))
    }

    fn reset(&mut self) {
        self.averages = None;
    }
}

/// Wilder RSI of `closes`.
///
/// # Panics
/// If `period` is zero.
pub fn rsi(closes: &[Option<f64>], period: usize) -> Series {
    Rsi::new(period).calculate(closes)
}

/// Latest MACD values; each may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: Option<f64>,
    /// Signal line (EMA of MACD)
    pub signal: Option<f64>,
    /// Histogram (MACD - Signal)
    pub histogram: Option<f64>,
}

/// Index-aligned MACD series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

impl MacdSeries {
    /// Values at the last index.
    pub fn last(&self) -> MacdOutput {
        MacdOutput {
            macd: self.macd.last().copied().flatten(),
            signal: self.signal.last().copied().flatten(),
            histogram: self.histogram.last().copied().flatten(),
        }
    }

    /// Cross of the MACD line over its signal line on the last transition.
    pub fn crossover(&self) -> CrossoverState {
        detect_crossover(&self.macd, &self.signal, Some(1))
    }
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    ///
    /// # Panics
    /// If a period is zero or `fast >= slow`.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }

    fn difference(a: &[Option<f64>], b: &[Option<f64>]) -> Series {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| match (x, y) {
                (Some(x), Some(y)) => Some(x - y),
                _ => None,
            })
            .collect()
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdSeries;

    fn calculate(&self, data: &[Option<f64>]) -> MacdSeries {
        let fast = ema(data, self.fast_period);
        let slow = ema(data, self.slow_period);

        let macd = Self::difference(&fast, &slow);
        // The signal line inherits the EMA seeding: first valid MACD value
        let signal = ema(&macd, self.signal_period);
        let histogram = Self::difference(&macd, &signal);

        MacdSeries {
            macd,
            signal,
            histogram,
        }
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// MACD (12, 26, 9) of `closes`.
pub fn macd(closes: &[Option<f64>]) -> MacdSeries {
    Macd::new().calculate(closes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(values: &[f64]) -> Series {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_rsi_insufficient_warmup() {
        let closes = present(&[10., 11., 12., 11., 10., 9., 10., 11., 12., 13., 14., 15.]);
        let result = rsi(&closes, 14);

        assert_eq!(result.len(), 12);
        assert!(result.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rsi_flat_prices_read_fifty() {
        let closes = present(&[100.0; 20]);
        let result = rsi(&closes, 14);

        assert!(result[..14].iter().all(|v| v.is_none()));
        for value in &result[14..] {
            assert_eq!(*value, Some(50.0));
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let closes = present(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let result = rsi(&closes, 5);

        assert_eq!(result[4], None);
        assert_eq!(result[5], Some(100.0));
        assert_eq!(result[6], Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses() {
        let closes = present(&[7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        let result = rsi(&closes, 5);

        assert!(result[5].unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_rsi_seed_and_wilder_step() {
        // deltas: +1, -1, +2 -> avg gain 1.0, avg loss 1/3
        let closes = present(&[10.0, 11.0, 10.0, 12.0, 11.0]);
        let result = rsi(&closes, 3);

        let first = result[3].unwrap();
        assert!((first - (100.0 - 100.0 / (1.0 + 3.0))).abs() < 1e-10);

        // delta -1: gain (1*2 + 0)/3, loss (1/3*2 + 1)/3
        let gain = 2.0 / 3.0;
        let loss = (2.0 / 3.0 + 1.0) / 3.0;
        let expected = 100.0 - 100.0 / (1.0 + gain / loss);
        assert!((result[4].unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_window_restarts_after_gap() {
        let closes = vec![
            Some(1.0),
            Some(2.0),
            None,
            Some(3.0),
            Some(4.0),
            Some(5.0),
        ];
        let result = rsi(&closes, 2);

        // Earliest 3-run is indices 3..=5
        assert_eq!(result[..5], [None, None, None, None, None]);
        assert_eq!(result[5], Some(100.0));
    }

    #[test]
    fn test_rsi_gap_after_warmup_keeps_averages() {
        let closes = vec![
            Some(10.0),
            Some(11.0),
            Some(10.0),
            None,
            Some(12.0),
            Some(11.0),
        ];
        let result = rsi(&closes, 2);

        // Seeded at index 2: gain 0.5, loss 0.5
        assert_eq!(result[2], Some(50.0));
        assert_eq!(result[3], None);
        // Previous close absent
        assert_eq!(result[4], None);
        // delta -1 against untouched averages
        let expected = WilderState::rsi_from_averages(0.25, 0.75);
        assert!((result[5].unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_bounded() {
        let closes: Series = (0..120)
            .map(|i| Some(100.0 + (i as f64 * 0.5).sin() * 5.0))
            .collect();
        let result = rsi(&closes, 14);

        assert!(result.iter().flatten().count() > 0);
        for value in result.iter().flatten() {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_wilder_state_unseeded() {
        let mut state = WilderState::new(14);
        assert_eq!(state.update(Some(1.0)), None);
        assert!(!state.is_ready());
        state.seed(0.0, 0.0);
        assert_eq!(state.current(), Some(50.0));
        state.reset();
        assert!(state.averages().is_none());
    }

    #[test]
    fn test_macd_histogram_identity() {
        let mut closes: Series = (0..60).map(|i| Some(100.0 + i as f64)).collect();
        closes[10] = None;
        closes[30] = None;
        let result = macd(&closes);

        assert_eq!(result.macd.len(), 60);
        assert_eq!(result.signal.len(), 60);
        assert_eq!(result.histogram.len(), 60);

        for i in 0..60 {
            match (result.macd[i], result.signal[i]) {
                (Some(m), Some(s)) => {
                    assert!((result.histogram[i].unwrap() - (m - s)).abs() < 1e-12)
                }
                _ => assert!(result.histogram[i].is_none()),
            }
        }
        assert!(result.histogram[10].is_none());
    }

    #[test]
    fn test_macd_seeds_at_first_close() {
        let closes = present(&[50.0, 51.0, 52.0]);
        let result = macd(&closes);

        // Both EMAs seed at the first close, so MACD and signal start at zero
        assert_eq!(result.macd[0], Some(0.0));
        assert_eq!(result.signal[0], Some(0.0));
        assert_eq!(result.histogram[0], Some(0.0));
    }

    #[test]
    fn test_macd_uptrend_positive() {
        let closes: Series = (0..50).map(|i| Some(100.0 + i as f64)).collect();
        let last = macd(&closes).last();

        assert!(last.macd.unwrap() > 0.0);
        assert!(last.histogram.is_some());
    }

    #[test]
    fn test_macd_crossover_last_transition() {
        let series = MacdSeries {
            macd: vec![Some(-1.0), Some(1.0), Some(-0.5), Some(0.5)],
            signal: vec![Some(0.0); 4],
            histogram: vec![Some(-1.0), Some(1.0), Some(-0.5), Some(0.5)],
        };
        assert_eq!(series.crossover(), CrossoverState::Bullish);

        let flat = MacdSeries {
            macd: vec![Some(1.0), Some(2.0)],
            signal: vec![Some(0.0), Some(0.0)],
            histogram: vec![Some(1.0), Some(2.0)],
        };
        assert_eq!(flat.crossover(), CrossoverState::Neutral);
    }

    #[test]
    #[should_panic(expected = "Fast period must be less than slow period")]
    fn test_macd_rejects_inverted_periods() {
        Macd::with_periods(26, 12, 9);
    }
}
