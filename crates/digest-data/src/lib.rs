//! Market data sources for the digest.
//!
//! - [`AlphaVantageSource`]: HTTP provider with pacing, retry and key rotation
//! - [`SyntheticSource`]: deterministic generated series for fallback and demos
//! - [`CsvSource`]: local files for one-off evaluation
//! - [`MarketGateway`]: per-run cache and fallback policy in front of a source

mod alpha_vantage;
mod cache;
mod credentials;
mod csv_source;
mod gateway;
mod rate_limit;
mod synthetic;

pub use alpha_vantage::{
    parse_daily_response, AlphaVantageConfig, AlphaVantageSource, OutputSize, DEFAULT_BASE_URL,
};
pub use cache::{FetchedSeries, SeriesCache};
pub use credentials::{mask_key, CredentialPool};
pub use csv_source::{load_csv, CsvSource};
pub use gateway::{Fallback, MarketGateway};
pub use rate_limit::RequestPacer;
pub use synthetic::SyntheticSource;
