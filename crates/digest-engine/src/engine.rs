//! Per-asset evaluation.

use digest_core::error::{EngineError, IndicatorError};
use digest_core::types::{Evaluation, IndicatorSet, PriceSeries, RawSeries, SmaWindows};
use digest_indicators::{adx, obv, obv_trend, rsi, sma, sma_slope};
use tracing::{debug, warn};

use crate::classifier::SignalClassifier;
use crate::config::EngineConfig;
use crate::preprocess::{Preprocessed, Preprocessor};

/// Evaluates one price series at a time.
///
/// Holds no mutable state; share it behind an `Arc` across tasks.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: EngineConfig,
    preprocessor: Preprocessor,
    classifier: SignalClassifier,
}

impl SignalEngine {
    /// Create an engine after validating the configuration.
    pub fn new(config: EngineConfig) -> Result<Self, IndicatorError> {
        config.validate()?;
        Ok(Self {
            preprocessor: Preprocessor::new(config.min_bars, config.max_bars),
            classifier: SignalClassifier::new(config.thresholds),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// SMA pair for a series of `len` bars.
    ///
    /// The canonical pair when the slow window fits, else the fallback pair
    /// when that fits, else the canonical pair (leaving the slow SMA undefined).
    pub fn select_windows(&self, len: usize) -> SmaWindows {
        let canonical = self.config.canonical_windows();
        if len >= canonical.long {
            return canonical;
        }
        match self.config.fallback_sma {
            Some(fallback) if len >= fallback.long => fallback,
            _ => canonical,
        }
    }

    /// Compute every indicator for a prepared series.
    pub fn compute_indicators(&self, prepared: &Preprocessed) -> IndicatorSet {
        let cfg = &self.config;
        let windows = self.select_windows(prepared.len());
        let closes = &prepared.closes;

        let obv_series = obv(closes, &prepared.volumes);

        IndicatorSet {
            sma_windows: windows,
            sma_short: sma(closes, windows.short),
            sma_long: sma(closes, windows.long),
            slope_short: sma_slope(closes, windows.short, cfg.slope_lookback),
            slope_long: sma_slope(closes, windows.long, cfg.slope_lookback),
            rsi: rsi(closes, cfg.rsi_period),
            obv_current: obv_series.last().copied(),
            obv_sma: sma(&obv_series, cfg.obv_sma_period),
            obv_trend: obv_trend(&obv_series, cfg.obv_lookback),
            adx: adx(&prepared.highs, &prepared.lows, closes, cfg.adx_period),
            bars_used: prepared.len(),
        }
    }

    /// Evaluate an ordered series.
    ///
    /// Fails with `InsufficientData` below `min_bars`. Undefined classifier
    /// inputs produce an `Indeterminate` evaluation rather than an error; use
    /// [`Evaluation::into_determinate`] to treat those as skips.
    pub fn evaluate(&self, series: &PriceSeries) -> Result<Evaluation, EngineError> {
        let symbol = series.symbol().to_string();
        let prepared = self.preprocessor.prepare(series).map_err(|e| {
            warn!(symbol = %symbol, error = %e, "Series rejected");
            EngineError::from(e)
        })?;

        let last = prepared
            .series
            .last()
            .ok_or_else(|| EngineError::InvalidSeries("empty series".into()))?;
        let (as_of, price) = (last.date, last.close);

        let indicators = self.compute_indicators(&prepared);
        let classification = self.classifier.classify_indicators(price, &indicators);

        debug!(
            symbol = %symbol,
            bars = indicators.bars_used,
            windows = %indicators.sma_windows,
            rsi = ?indicators.rsi,
            adx = ?indicators.adx,
            obv_trend = ?indicators.obv_trend,
            signal = %classification.signal,
            "Evaluated"
        );

        Ok(Evaluation {
            symbol,
            as_of,
            price,
            indicators,
            classification,
            synthetic: false,
        })
    }

    /// Evaluate a date-keyed provider map.
    pub fn evaluate_raw(&self, symbol: &str, raw: &RawSeries) -> Result<Evaluation, EngineError> {
        let series = self.preprocessor.from_raw(symbol, raw).map_err(|e| {
            warn!(symbol = %symbol, error = %e, "Provider series rejected");
            EngineError::from(e)
        })?;
        self.evaluate(&series)
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            preprocessor: Preprocessor::new(config.min_bars, config.max_bars),
            classifier: SignalClassifier::new(config.thresholds),
            config,
        }
    }
}
