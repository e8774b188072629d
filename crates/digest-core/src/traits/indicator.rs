//! Indicator trait definitions.

/// Trait for single-input technical indicators.
///
/// Indicators process a price (or volume) series and produce the rolling
/// series of derived values, oldest first.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// Returns an empty vector when `data` is shorter than [`Indicator::period`].
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// The most recent value, if there is enough data.
    fn latest(&self, data: &[f64]) -> Option<Self::Output> {
        self.calculate(data).pop()
    }
}
