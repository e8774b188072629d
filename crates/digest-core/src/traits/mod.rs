//! Core traits for the market digest.

mod data_source;
mod indicator;
mod notifier;

pub use data_source::MarketDataSource;
pub use indicator::Indicator;
pub use notifier::{Notifier, Recipient};
