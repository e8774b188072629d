//! Technical indicators for daily price series.
//!
//! This crate provides pure, deterministic implementations of:
//! - Moving averages (SMA and SMA slope)
//! - Momentum (Wilder RSI)
//! - Volume flow (OBV and its short-term trend)
//! - Trend strength (Wilder ADX)
//!
//! Every function works on plain `f64` slices ordered oldest to newest and
//! returns `None` (or an empty vector) when the input is too short. Nothing is
//! rounded here; rounding is a display concern.

pub mod momentum;
pub mod moving_average;
pub mod trend;
pub mod volume;

pub use momentum::{rsi, Rsi};
pub use moving_average::{sma, sma_slope, Sma};
pub use trend::{adx, Adx};
pub use volume::{obv, obv_trend, Obv};
