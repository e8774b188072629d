//! Core types and traits for the market digest.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (PriceBar, PriceSeries, Asset)
//! - Indicator results and trading signals
//! - Core traits for indicators, market data sources and notifiers

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DataError, DigestError, EngineError, IndicatorError, NotifyError, SeriesError};
pub use traits::*;
pub use types::*;
