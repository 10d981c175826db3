//! Crossover detection between two indicator series.

use screener_core::types::CrossoverState;

/// Most recent cross of `short` over or under `long`.
///
/// With `lookback` absent or zero every transition `[1, n)` is scanned;
/// otherwise only the last `lookback` transitions `[max(1, n - lookback), n)`.
/// Transitions touching an absent value are skipped. The whole window is
/// scanned and a later cross replaces an earlier one, so the result is the
/// latest cross in the window, not the first.
pub fn detect_crossover(
    short: &[Option<f64>],
    long: &[Option<f64>],
    lookback: Option<usize>,
) -> CrossoverState {
    let n = short.len().min(long.len());
    let start = match lookback {
        Some(lookback) if lookback > 0 => n.saturating_sub(lookback).max(1),
        _ => 1,
    };

    let mut state = CrossoverState::Neutral;
    for i in start..n {
        let (Some(prev_short), Some(prev_long), Some(cur_short), Some(cur_long)) =
            (short[i - 1], long[i - 1], short[i], long[i])
        else {
            continue;
        };

        if prev_short <= prev_long && cur_short > cur_long {
            state = CrossoverState::Bullish;
        } else if prev_short >= prev_long && cur_short < cur_long {
            state = CrossoverState::Bearish;
        }
    }

    state
}
