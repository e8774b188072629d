//! Market data source trait definitions.

use crate::error::DataError;
use crate::types::{Asset, RawSeries};
use async_trait::async_trait;

/// Trait for historical daily data providers.
///
/// Implementations own transport concerns: timeouts, retry/backoff, request
/// pacing and credential rotation. The signal engine never talks to them
/// directly.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the provider's daily series for an asset.
    ///
    /// The map is keyed by `YYYY-MM-DD` date strings and carries no ordering
    /// guarantee.
    async fn daily_series(&self, asset: &Asset) -> Result<RawSeries, DataError>;

    /// Whether the data is generated rather than fetched from a provider.
    fn is_synthetic(&self) -> bool {
        false
    }

    /// Get the data source name.
    fn name(&self) -> &str;
}
