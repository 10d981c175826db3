//! Gap-tolerant technical indicators.
//!
//! This crate provides the indicator engines used by the screener:
//! - Exponential moving average seeded by the first valid observation
//! - Wilder RSI with warm-up detection
//! - MACD line, signal line and histogram
//! - Crossover detection between two series over a trailing window
//!
//! Every engine returns a series with one slot per input slot. Absent inputs
//! produce absent outputs at the same index and never reset running state.

pub mod crossover;
pub mod momentum;
pub mod moving_average;

pub use crossover::detect_crossover;
pub use momentum::{macd, rsi, Macd, MacdOutput, MacdSeries, Rsi, WilderState};
pub use moving_average::{ema, Ema, EmaState};
