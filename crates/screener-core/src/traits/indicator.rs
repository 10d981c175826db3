//! Indicator trait definitions.

/// Trait for batch technical indicators over null-tolerant input.
///
/// Implementations must return exactly one slot per input slot, so that
/// derived series stay index-aligned with the bars they came from.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically closes), `None` where absent
    ///
    /// # Returns
    /// A series of the same length as `data`
    fn calculate(&self, data: &[Option<f64>]) -> Vec<Option<f64>>;

    /// Get the number of leading valid observations needed for a first value.
    fn warmup(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Accumulator that is fed one observation at a time.
///
/// Batch indicators thread a fresh accumulator through their input, which
/// keeps them reentrant: no state survives between `calculate` calls.
pub trait StreamingIndicator {
    /// The output type of the indicator.
    type Output;

    /// Update the indicator with a new observation.
    ///
    /// # Returns
    /// The value for this observation, or None if it cannot be computed
    fn update(&mut self, value: Option<f64>) -> Option<Self::Output>;

    /// Get the value produced by the last present observation.
    fn current(&self) -> Option<Self::Output>;

    /// Reset the accumulator state.
    fn reset(&mut self);

    /// Check if the accumulator has produced a value yet.
    fn is_ready(&self) -> bool {
        self.current().is_some()
    }
}

/// Multi-output indicator (e.g., MACD).
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple aligned series.
    type Outputs;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[Option<f64>]) -> Self::Outputs;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Running sum that skips gaps.
    #[derive(Default)]
    struct RunningSum {
        total: Option<f64>,
    }

    impl StreamingIndicator for RunningSum {
        type Output = f64;

        fn update(&mut self, value: Option<f64>) -> Option<f64> {
            let v = value?;
            let next = self.total.unwrap_or(0.0) + v;
            self.total = Some(next);
            Some(next)
        }

        fn current(&self) -> Option<f64> {
            self.total
        }

        fn reset(&mut self) {
            self.total = None;
        }
    }

    struct Cumulative;

    impl Indicator for Cumulative {
        fn calculate(&self, data: &[Option<f64>]) -> Vec<Option<f64>> {
            let mut acc = RunningSum::default();
            data.iter().map(|v| acc.update(*v)).collect()
        }

        fn warmup(&self) -> usize {
            1
        }

        fn name(&self) -> &str {
            "cumulative"
        }
    }

    #[test]
    fn test_streaming_default_is_ready() {
        let mut sum = RunningSum::default();
        assert!(!sum.is_ready());
        assert_eq!(sum.update(None), None);
        assert!(!sum.is_ready());
        assert_eq!(sum.update(Some(2.0)), Some(2.0));
        assert!(sum.is_ready());
        sum.reset();
        assert!(sum.current().is_none());
    }

    #[test]
    fn test_indicator_keeps_alignment() {
        let result = Cumulative.calculate(&[Some(1.0), None, Some(2.0)]);
        assert_eq!(result, vec![Some(1.0), None, Some(3.0)]);
    }
}
