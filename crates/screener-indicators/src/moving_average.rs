//! Moving average indicators.

use screener_core::traits::{Indicator, StreamingIndicator};
use screener_core::types::Series;

/// Exponential Moving Average (EMA).
///
/// Gives more weight to recent prices using an exponential decay. The first
/// valid observation seeds the average exactly; there is no SMA warm-up.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified period.
    ///
    /// # Panics
    /// If `period` is zero.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        let multiplier = 2.0 / (period as f64 + 1.0);
        Self { period, multiplier }
    }

    /// Get the period.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Fresh accumulator for this EMA.
    pub fn state(&self) -> EmaState {
        EmaState {
            multiplier: self.multiplier,
            current: None,
        }
    }
}

impl Indicator for Ema {
    fn calculate(&self, data: &[Option<f64>]) -> Series {
        let mut state = self.state();
        data.iter().map(|&value| state.update(value)).collect()
    }

    fn warmup(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Running EMA value carried across gaps.
#[derive(Debug, Clone)]
pub struct EmaState {
    multiplier: f64,
    current: Option<f64>,
}

impl StreamingIndicator for EmaState {
    type Output = f64;

    /// An absent value yields `None` and leaves the running value as is.
    fn update(&mut self, value: Option<f64>) -> Option<f64> {
        let price = value?;
        let next = match self.current {
            None => price,
            Some(prev) => self.multiplier * price + (1.0 - self.multiplier) * prev,
        };
        self.current = Some(next);
        self.current
    }

    fn current(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.current = None;
    }
}

/// EMA of `series` with the given period.
///
/// # Panics
/// If `period` is zero.
pub fn ema(series: &[Option<f64>], period: usize) -> Series {
    Ema::new(period).calculate(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(values: &[f64]) -> Series {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_ema_seeds_with_first_value() {
        let data = present(&[10.0, 11.0, 12.0]);
        for period in [1, 2, 5, 200] {
            let result = ema(&data, period);
            assert_eq!(result.len(), data.len());
            assert_eq!(result[0], Some(10.0));
        }
    }

    #[test]
    fn test_ema_recurrence() {
        // mult = 2/(3+1) = 0.5
        let result = ema(&present(&[1.0, 2.0, 3.0, 4.0]), 3);

        assert!((result[1].unwrap() - 1.5).abs() < 1e-10);
        assert!((result[2].unwrap() - 2.25).abs() < 1e-10);
        assert!((result[3].unwrap() - 3.125).abs() < 1e-10);
    }

    #[test]
    fn test_ema_period_one_tracks_input() {
        let data = present(&[5.0, 7.0, 3.0]);
        assert_eq!(ema(&data, 1), data);
    }

    #[test]
    fn test_ema_gap_keeps_running_value() {
        let data = vec![None, Some(4.0), None, None, Some(8.0)];
        let result = ema(&data, 3);

        assert_eq!(result.len(), 5);
        assert_eq!(result[0], None);
        assert_eq!(result[1], Some(4.0));
        assert_eq!(result[2], None);
        assert_eq!(result[3], None);
        // Running value survives the gap: 0.5 * 8 + 0.5 * 4
        assert!((result[4].unwrap() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_all_absent() {
        let data = vec![None; 4];
        assert_eq!(ema(&data, 21), vec![None; 4]);
        assert!(ema(&[], 21).is_empty());
    }

    #[test]
    #[should_panic(expected = "Period must be greater than 0")]
    fn test_ema_rejects_zero_period() {
        Ema::new(0);
    }

    #[test]
    fn test_ema_state_reset() {
        let ema = Ema::new(3);
        let mut state = ema.state();
        state.update(Some(1.0));
        state.update(Some(2.0));

        assert!(state.is_ready());
        state.reset();
        assert!(!state.is_ready());
        assert_eq!(state.update(Some(9.0)), Some(9.0));
    }
}
