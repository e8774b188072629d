//! Engine configuration.

use digest_core::error::IndicatorError;
use digest_core::types::SmaWindows;
use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierThresholds;

/// Indicator windows, series length limits and classifier thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fewest bars worth evaluating at all
    pub min_bars: usize,
    /// Most recent bars kept after ordering
    pub max_bars: usize,
    /// Canonical fast SMA window
    pub sma_short: usize,
    /// Canonical slow SMA window
    pub sma_long: usize,
    /// Pair used when the series is too short for the canonical slow window
    pub fallback_sma: Option<SmaWindows>,
    pub rsi_period: usize,
    pub adx_period: usize,
    pub obv_lookback: usize,
    pub obv_sma_period: usize,
    pub slope_lookback: usize,
    pub thresholds: ClassifierThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_bars: 50,
            max_bars: 205,
            sma_short: 50,
            sma_long: 200,
            fallback_sma: Some(SmaWindows::new(20, 50)),
            rsi_period: 14,
            adx_period: 14,
            obv_lookback: 5,
            obv_sma_period: 20,
            slope_lookback: 5,
            thresholds: ClassifierThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Canonical SMA pair.
    pub fn canonical_windows(&self) -> SmaWindows {
        SmaWindows::new(self.sma_short, self.sma_long)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let periods = [
            ("sma_short", self.sma_short),
            ("rsi_period", self.rsi_period),
            ("adx_period", self.adx_period),
            ("obv_lookback", self.obv_lookback),
            ("obv_sma_period", self.obv_sma_period),
            ("slope_lookback", self.slope_lookback),
            ("min_bars", self.min_bars),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(IndicatorError::InvalidParameter(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }
        if self.sma_short >= self.sma_long {
            return Err(IndicatorError::InvalidParameter(
                "sma_short must be less than sma_long".into(),
            ));
        }
        if let Some(fallback) = self.fallback_sma {
            if fallback.short == 0 || fallback.short >= fallback.long {
                return Err(IndicatorError::InvalidParameter(
                    "fallback_sma short window must be positive and less than its long window"
                        .into(),
                ));
            }
            if fallback.long >= self.sma_long {
                return Err(IndicatorError::InvalidParameter(
                    "fallback_sma long window must be shorter than sma_long".into(),
                ));
            }
        }
        if self.max_bars < self.min_bars {
            return Err(IndicatorError::InvalidParameter(
                "max_bars must be at least min_bars".into(),
            ));
        }
        if self.max_bars < self.sma_long {
            return Err(IndicatorError::InvalidParameter(format!(
                "max_bars ({}) cannot hold the sma_long window ({})",
                self.max_bars, self.sma_long
            )));
        }
        self.thresholds.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.canonical_windows(), SmaWindows::new(50, 200));
        // Slow SMA plus the slope look-back margin
        assert_eq!(config.max_bars, config.sma_long + config.slope_lookback);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.sma_short = 200;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.fallback_sma = Some(SmaWindows::new(50, 20));
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.max_bars = 150;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.rsi_period = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.fallback_sma = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"min_bars": 60}"#).unwrap();
        assert_eq!(config.min_bars, 60);
        assert_eq!(config.sma_long, 200);
        assert_eq!(config.thresholds, ClassifierThresholds::default());
    }
}
