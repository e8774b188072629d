//! Trading signals and evaluation results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::IndicatorSet;
use crate::error::EngineError;

/// Discrete signal state, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
    /// A required indicator was undefined; treated like a skipped asset
    Indeterminate,
}

impl Signal {
    /// All signals in display order.
    pub const ALL: [Signal; 6] = [
        Signal::StrongBuy,
        Signal::Buy,
        Signal::Hold,
        Signal::Sell,
        Signal::StrongSell,
        Signal::Indeterminate,
    ];

    /// Human-readable label for the digest.
    pub fn label(&self) -> &'static str {
        match self {
            Signal::StrongBuy => "STRONG BUY",
            Signal::Buy => "BUY",
            Signal::Hold => "HOLD",
            Signal::Sell => "SELL",
            Signal::StrongSell => "STRONG SELL",
            Signal::Indeterminate => "N/A",
        }
    }

    /// Display colour tag used by the email template.
    pub fn color(&self) -> &'static str {
        match self {
            Signal::StrongBuy => "#1b5e20",
            Signal::Buy => "#43a047",
            Signal::Hold => "#f9a825",
            Signal::Sell => "#e53935",
            Signal::StrongSell => "#b71c1c",
            Signal::Indeterminate => "#9e9e9e",
        }
    }

    #[inline]
    pub fn is_determinate(&self) -> bool {
        !matches!(self, Signal::Indeterminate)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifier output: the signal plus which conditions produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub signal: Signal,
    /// Matched conditions, informational only
    pub rationale: Vec<String>,
}

impl Classification {
    pub fn new(signal: Signal, rationale: Vec<String>) -> Self {
        Self { signal, rationale }
    }

    /// Rationale joined for single-line display.
    pub fn summary(&self) -> String {
        self.rationale.join("; ")
    }
}

/// Engine output for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub symbol: String,
    /// Date of the most recent bar
    pub as_of: NaiveDate,
    /// Close of the most recent bar
    pub price: f64,
    pub indicators: IndicatorSet,
    pub classification: Classification,
    /// Series came from the synthetic fallback source rather than a provider
    #[serde(default)]
    pub synthetic: bool,
}

impl Evaluation {
    #[inline]
    pub fn signal(&self) -> Signal {
        self.classification.signal
    }

    /// Mark the evaluation as computed from synthetic data.
    pub fn with_synthetic(mut self, synthetic: bool) -> Self {
        self.synthetic = synthetic;
        self
    }

    /// Turn an indeterminate evaluation into an error so callers can skip it
    /// the same way as any other engine failure.
    pub fn into_determinate(self) -> Result<Self, EngineError> {
        if self.signal().is_determinate() {
            Ok(self)
        } else {
            Err(EngineError::Indeterminate {
                symbol: self.symbol,
                missing: self.indicators.missing_required(),
            })
        }
    }
}
