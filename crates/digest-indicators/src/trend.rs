//! Trend strength indicators.

use crate::momentum::wilder_smooth;

/// Average Directional Index (ADX).
///
/// Measures trend strength regardless of direction, from Wilder-smoothed
/// directional movement. Needs highs, lows and closes.
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
}

impl Adx {
    /// Create a new ADX indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Minimum number of bars before a value can exist.
    pub fn period(&self) -> usize {
        2 * self.period
    }

    /// Calculate the ADX series from OHLC data.
    ///
    /// Days whose +DI and -DI are both zero have no defined DX and are
    /// skipped, so a series without directional movement yields nothing.
    pub fn calculate_hlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
        let len = high.len().min(low.len()).min(close.len());
        if len < self.period() {
            return vec![];
        }

        let mut tr = Vec::with_capacity(len - 1);
        let mut plus_dm = Vec::with_capacity(len - 1);
        let mut minus_dm = Vec::with_capacity(len - 1);

        for i in 1..len {
            let high_low = high[i] - low[i];
            let high_close = (high[i] - close[i - 1]).abs();
            let low_close = (low[i] - close[i - 1]).abs();
            tr.push(high_low.max(high_close).max(low_close));

            let up = high[i] - high[i - 1];
            let down = low[i - 1] - low[i];
            plus_dm.push(if up > down && up > 0.0 { up } else { 0.0 });
            minus_dm.push(if down > up && down > 0.0 { down } else { 0.0 });
        }

        let smoothed_tr = wilder_smooth(&tr, self.period);
        let smoothed_plus = wilder_smooth(&plus_dm, self.period);
        let smoothed_minus = wilder_smooth(&minus_dm, self.period);

        let dx: Vec<f64> = smoothed_tr
            .iter()
            .zip(smoothed_plus.iter().zip(smoothed_minus.iter()))
            .filter_map(|(&str_, (&sp, &sm))| {
                let (plus_di, minus_di) = if str_ == 0.0 {
                    (0.0, 0.0)
                } else {
                    (100.0 * sp / str_, 100.0 * sm / str_)
                };
                let di_sum = plus_di + minus_di;
                if di_sum == 0.0 {
                    None
                } else {
                    Some(100.0 * (plus_di - minus_di).abs() / di_sum)
                }
            })
            .collect();

        wilder_smooth(&dx, self.period)
    }

    /// Get the name of the indicator.
    pub fn name(&self) -> &str {
        "ADX"
    }
}

/// Latest ADX value, or `None` with fewer than `2 * period` bars or too few
/// days with directional movement.
pub fn adx(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Option<f64> {
    if period == 0 {
        return None;
    }
    Adx::new(period).calculate_hlc(high, low, close).pop()
}
