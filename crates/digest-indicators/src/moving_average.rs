//! Moving average indicators.

use digest_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len() - self.period + 1);
        let period_f64 = self.period as f64;

        // Initial sum
        let mut sum: f64 = data[..self.period].iter().sum();
        result.push(sum / period_f64);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result.push(sum / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }

    /// Mean of the trailing window, summed directly rather than rolled.
    fn latest(&self, data: &[f64]) -> Option<f64> {
        sma(data, self.period)
    }
}

/// Arithmetic mean of the last `period` values, or `None` if there are fewer.
pub fn sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    let window = &data[data.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Percent change of the `period` SMA over the last `lookback` bars.
///
/// Compares the SMA ending at the newest value with the SMA ending `lookback`
/// values earlier, so `period + lookback` values are required.
pub fn sma_slope(data: &[f64], period: usize, lookback: usize) -> Option<f64> {
    if lookback == 0 || data.len() < period + lookback {
        return None;
    }
    let now = sma(data, period)?;
    let then = sma(&data[..data.len() - lookback], period)?;
    if then == 0.0 {
        return None;
    }
    Some((now - then) / then * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma.calculate(&data);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result[1] - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result[2] - 4.0).abs() < 1e-10); // (3+4+5)/3
    }

    #[test]
    fn test_sma_insufficient_data() {
        let indicator = Sma::new(5);
        let data = vec![1.0, 2.0, 3.0];

        assert!(indicator.calculate(&data).is_empty());
        assert_eq!(indicator.latest(&data), None);
        assert_eq!(sma(&data, 5), None);
        assert_eq!(sma(&data, 3), Some(2.0));
    }

    #[test]
    fn test_sma_latest_matches_rolling() {
        let data: Vec<f64> = (0..250).map(|i| 100.0 + (i as f64 * 0.3).sin() * 7.0).collect();
        let indicator = Sma::new(50);

        let rolling = *indicator.calculate(&data).last().unwrap();
        let direct = indicator.latest(&data).unwrap();
        assert!((rolling - direct).abs() < 1e-9);
    }

    #[test]
    fn test_sma_slope() {
        // Linear ramp: SMA shifts by exactly `lookback` per step
        let data: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let slope = sma_slope(&data, 10, 5).unwrap();

        let now = (120..130).sum::<i32>() as f64 / 10.0;
        let then = (115..125).sum::<i32>() as f64 / 10.0;
        assert!((slope - (now - then) / then * 100.0).abs() < 1e-10);
        assert!(slope > 0.0);
    }

    #[test]
    fn test_sma_slope_needs_lookback_margin() {
        let data = vec![100.0; 204];
        assert_eq!(sma_slope(&data, 200, 5), None);

        let data = vec![100.0; 205];
        assert_eq!(sma_slope(&data, 200, 5), Some(0.0));
    }
}
