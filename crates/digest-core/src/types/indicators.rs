//! Indicator results for one series evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of on-balance volume over a short look-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObvTrend {
    Rising,
    Falling,
    Flat,
}

impl fmt::Display for ObvTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObvTrend::Rising => write!(f, "rising"),
            ObvTrend::Falling => write!(f, "falling"),
            ObvTrend::Flat => write!(f, "flat"),
        }
    }
}

/// The (short, long) moving-average windows an evaluation used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmaWindows {
    pub short: usize,
    pub long: usize,
}

impl SmaWindows {
    pub fn new(short: usize, long: usize) -> Self {
        Self { short, long }
    }
}

impl fmt::Display for SmaWindows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMA{}/SMA{}", self.short, self.long)
    }
}

/// Indicator values computed from one price series.
///
/// `None` means the series was too short for that indicator; it never stands
/// in for zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma_windows: SmaWindows,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    /// Percent change of the short SMA over the slope look-back
    pub slope_short: Option<f64>,
    /// Percent change of the long SMA over the slope look-back
    pub slope_long: Option<f64>,
    pub rsi: Option<f64>,
    pub obv_current: Option<f64>,
    pub obv_sma: Option<f64>,
    pub obv_trend: Option<ObvTrend>,
    pub adx: Option<f64>,
    /// Number of bars the indicators were computed from
    pub bars_used: usize,
}

impl IndicatorSet {
    /// An empty set for the given windows.
    pub fn empty(sma_windows: SmaWindows) -> Self {
        Self {
            sma_windows,
            sma_short: None,
            sma_long: None,
            slope_short: None,
            slope_long: None,
            rsi: None,
            obv_current: None,
            obv_sma: None,
            obv_trend: None,
            adx: None,
            bars_used: 0,
        }
    }

    /// Names of the classifier inputs that are missing.
    pub fn missing_required(&self) -> Vec<String> {
        missing_inputs(self.rsi, self.sma_short, self.sma_long)
    }
}

/// Names of the required classifier inputs that are `None`, in a fixed order.
pub fn missing_inputs(
    rsi: Option<f64>,
    sma_short: Option<f64>,
    sma_long: Option<f64>,
) -> Vec<String> {
    [
        ("rsi", rsi.is_none()),
        ("sma_short", sma_short.is_none()),
        ("sma_long", sma_long.is_none()),
    ]
    .into_iter()
    .filter(|(_, missing)| *missing)
    .map(|(name, _)| name.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required() {
        let mut set = IndicatorSet::empty(SmaWindows::new(50, 200));
        assert_eq!(set.missing_required(), vec!["rsi", "sma_short", "sma_long"]);

        set.rsi = Some(48.0);
        set.sma_short = Some(101.0);
        assert_eq!(set.missing_required(), vec!["sma_long"]);

        // ADX is optional for classification
        set.sma_long = Some(99.0);
        assert!(set.missing_required().is_empty());
    }

    #[test]
    fn test_obv_trend_serializes_lowercase() {
        let json = serde_json::to_string(&ObvTrend::Rising).unwrap();
        assert_eq!(json, "\"rising\"");
    }
}
