//! Core data types for the market digest.

mod asset;
mod indicators;
mod ohlcv;
mod signal;

pub use asset::{Asset, AssetClass};
pub use indicators::{missing_inputs, IndicatorSet, ObvTrend, SmaWindows};
pub use ohlcv::{PriceBar, PriceSeries, RawBar, RawSeries};
pub use signal::{Classification, Evaluation, Signal};
