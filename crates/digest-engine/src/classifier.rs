//! Signal classification.
//!
//! An ordered rule cascade maps price, moving averages, RSI, ADX and the OBV
//! trend onto one [`Signal`]. The first matching rule wins, so the narrow
//! STRONG cases are checked before the broad BUY/SELL rules that would
//! otherwise shadow them.

use digest_core::error::IndicatorError;
use digest_core::types::{
    missing_inputs, Classification, IndicatorSet, ObvTrend, Signal, SmaWindows,
};
use serde::{Deserialize, Serialize};

/// Thresholds of the rule cascade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Minimum ADX for the STRONG rules
    pub strong_adx: f64,
    /// Minimum ADX for BUY and SELL
    pub adx: f64,
    /// STRONG rules need RSI strictly below this
    pub strong_rsi_below: f64,
    /// BUY needs RSI strictly below this
    pub buy_rsi_below: f64,
    /// SELL needs RSI strictly above this
    pub sell_rsi_above: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            strong_adx: 25.0,
            adx: 20.0,
            strong_rsi_below: 45.0,
            buy_rsi_below: 55.0,
            sell_rsi_above: 45.0,
        }
    }
}

impl ClassifierThresholds {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let values = [
            ("strong_adx", self.strong_adx),
            ("adx", self.adx),
            ("strong_rsi_below", self.strong_rsi_below),
            ("buy_rsi_below", self.buy_rsi_below),
            ("sell_rsi_above", self.sell_rsi_above),
        ];
        for (name, value) in values {
            if !(0.0..=100.0).contains(&value) {
                return Err(IndicatorError::InvalidParameter(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
        if self.strong_adx < self.adx {
            return Err(IndicatorError::InvalidParameter(
                "strong_adx must not be below adx".into(),
            ));
        }
        Ok(())
    }
}

/// Values the classifier looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierInput {
    pub price: f64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub adx: Option<f64>,
    pub obv_trend: Option<ObvTrend>,
    /// Window labels for the rationale text
    pub windows: SmaWindows,
}

impl ClassifierInput {
    /// Pick the classifier inputs out of an indicator set.
    pub fn from_indicators(price: f64, indicators: &IndicatorSet) -> Self {
        Self {
            price,
            sma_short: indicators.sma_short,
            sma_long: indicators.sma_long,
            rsi: indicators.rsi,
            adx: indicators.adx,
            obv_trend: indicators.obv_trend,
            windows: indicators.sma_windows,
        }
    }
}

/// Ordered rule cascade producing a [`Classification`].
#[derive(Debug, Clone, Default)]
pub struct SignalClassifier {
    thresholds: ClassifierThresholds,
}

impl SignalClassifier {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ClassifierThresholds {
        &self.thresholds
    }

    /// Classify one asset.
    ///
    /// Missing RSI or either SMA makes the result `Indeterminate`. A missing
    /// ADX only fails the ADX-gated rules, which leaves HOLD.
    pub fn classify(&self, input: &ClassifierInput) -> Classification {
        let (sma_short, sma_long, rsi) = match (input.sma_short, input.sma_long, input.rsi) {
            (Some(short), Some(long), Some(rsi)) => (short, long, rsi),
            _ => {
                let missing = missing_inputs(input.rsi, input.sma_short, input.sma_long);
                return Classification::new(
                    Signal::Indeterminate,
                    vec![format!("missing {}", missing.join(", "))],
                );
            }
        };

        let t = &self.thresholds;
        let price = input.price;
        let short = format!("SMA{}", input.windows.short);
        let long = format!("SMA{}", input.windows.long);
        let adx_at_least = |min: f64| input.adx.map_or(false, |adx| adx >= min);
        let adx_text = || match input.adx {
            Some(adx) => format!("ADX {:.1}", adx),
            None => "ADX n/a".to_string(),
        };

        // 1. STRONG_BUY: dip inside an established uptrend with volume support
        if price >= sma_short
            && sma_short > sma_long
            && adx_at_least(t.strong_adx)
            && rsi < t.strong_rsi_below
            && input.obv_trend == Some(ObvTrend::Rising)
        {
            return Classification::new(
                Signal::StrongBuy,
                vec![
                    format!("price {:.2} >= {} {:.2} > {} {:.2}", price, short, sma_short, long, sma_long),
                    format!("{} >= {}", adx_text(), t.strong_adx),
                    format!("RSI {:.1} < {}", rsi, t.strong_rsi_below),
                    "OBV rising".to_string(),
                ],
            );
        }

        // 2. STRONG_SELL: established downtrend with volume leaving
        if price < sma_long
            && sma_short < sma_long
            && adx_at_least(t.strong_adx)
            && rsi < t.strong_rsi_below
            && input.obv_trend == Some(ObvTrend::Falling)
        {
            return Classification::new(
                Signal::StrongSell,
                vec![
                    format!("price {:.2} < {} {:.2}", price, long, sma_long),
                    format!("{} {:.2} < {} {:.2}", short, sma_short, long, sma_long),
                    format!("{} >= {}", adx_text(), t.strong_adx),
                    format!("RSI {:.1} < {}", rsi, t.strong_rsi_below),
                    "OBV falling".to_string(),
                ],
            );
        }

        // 3. BUY
        if price >= sma_long && adx_at_least(t.adx) && rsi < t.buy_rsi_below {
            return Classification::new(
                Signal::Buy,
                vec![
                    format!("price {:.2} >= {} {:.2}", price, long, sma_long),
                    format!("{} >= {}", adx_text(), t.adx),
                    format!("RSI {:.1} < {}", rsi, t.buy_rsi_below),
                ],
            );
        }

        // 4. SELL
        if price < sma_short && sma_short < sma_long && adx_at_least(t.adx) && rsi > t.sell_rsi_above
        {
            return Classification::new(
                Signal::Sell,
                vec![
                    format!("price {:.2} < {} {:.2} < {} {:.2}", price, short, sma_short, long, sma_long),
                    format!("{} >= {}", adx_text(), t.adx),
                    format!("RSI {:.1} > {}", rsi, t.sell_rsi_above),
                ],
            );
        }

        // 5. HOLD: say why nothing stronger matched
        let mut rationale = Vec::new();
        if price >= sma_long.min(sma_short) && price < sma_long.max(sma_short) {
            rationale.push(format!("price {:.2} between {} and {}", price, short, long));
        }
        if !adx_at_least(t.adx) {
            rationale.push(format!("weak trend ({} < {})", adx_text(), t.adx));
        }
        if rsi >= t.buy_rsi_below {
            rationale.push(format!("RSI {:.1} neutral/overbought", rsi));
        }
        if input.obv_trend == Some(ObvTrend::Flat) {
            rationale.push("OBV flat".to_string());
        }
        if rationale.is_empty() {
            rationale.push("no rule matched".to_string());
        }
        Classification::new(Signal::Hold, rationale)
    }

    /// Classify straight from an indicator set.
    pub fn classify_indicators(&self, price: f64, indicators: &IndicatorSet) -> Classification {
        self.classify(&ClassifierInput::from_indicators(price, indicators))
    }
}
