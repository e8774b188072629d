//! Cached fetching with an optional synthetic fallback.

use digest_core::error::DataError;
use digest_core::traits::MarketDataSource;
use digest_core::types::Asset;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{FetchedSeries, SeriesCache};

/// What to do when the provider fails for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fallback {
    /// Surface the error; the asset is skipped
    #[default]
    None,
    /// Substitute generated data, flagged as synthetic
    Synthetic,
}

/// Front door of the data layer for the batch job.
pub struct MarketGateway {
    primary: Arc<dyn MarketDataSource>,
    fallback: Option<Arc<dyn MarketDataSource>>,
    cache: SeriesCache,
}

impl MarketGateway {
    pub fn new(primary: Arc<dyn MarketDataSource>) -> Self {
        Self {
            primary,
            fallback: None,
            cache: SeriesCache::new(),
        }
    }

    /// Use `fallback` when the primary source fails.
    pub fn with_fallback(mut self, fallback: Arc<dyn MarketDataSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn primary_name(&self) -> &str {
        self.primary.name()
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Fetch an asset once per run.
    pub async fn fetch(&self, asset: &Asset) -> Result<FetchedSeries, DataError> {
        if let Some(hit) = self.cache.get(asset) {
            debug!(symbol = %asset.symbol, "Series cache hit");
            return Ok(hit);
        }

        let fetched = match self.primary.daily_series(asset).await {
            Ok(series) => FetchedSeries {
                series: Arc::new(series),
                synthetic: self.primary.is_synthetic(),
            },
            Err(err) => {
                let Some(fallback) = &self.fallback else {
                    return Err(err);
                };
                warn!(
                    symbol = %asset.symbol,
                    error = %err,
                    fallback = fallback.name(),
                    "Provider failed, using fallback data"
                );
                FetchedSeries {
                    series: Arc::new(fallback.daily_series(asset).await?),
                    synthetic: fallback.is_synthetic(),
                }
            }
        };

        self.cache.put(asset, fetched.clone());
        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticSource;
    use async_trait::async_trait;
    use digest_core::types::RawSeries;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataSource for FailingSource {
        async fn daily_series(&self, asset: &Asset) -> Result<RawSeries, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DataError::SymbolNotFound(asset.symbol.clone()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_fetch_is_cached() {
        let gateway = MarketGateway::new(Arc::new(SyntheticSource::new(60)));
        let asset = Asset::equity("AAPL", "Apple");

        let first = gateway.fetch(&asset).await.unwrap();
        let second = gateway.fetch(&asset).await.unwrap();
        assert!(Arc::ptr_eq(&first.series, &second.series));
        assert_eq!(gateway.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_error_without_fallback() {
        let primary = Arc::new(FailingSource {
            calls: AtomicUsize::new(0),
        });
        let gateway = MarketGateway::new(primary.clone());

        let err = gateway.fetch(&Asset::equity("NOPE", "")).await.unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound(_)));
        assert!(gateway.cache().is_empty());
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_synthetic_fallback_is_flagged() {
        let gateway = MarketGateway::new(Arc::new(FailingSource {
            calls: AtomicUsize::new(0),
        }))
        .with_fallback(Arc::new(SyntheticSource::new(60)));

        let fetched = gateway.fetch(&Asset::equity("AAPL", "")).await.unwrap();
        assert!(fetched.synthetic);
        assert_eq!(fetched.series.len(), 60);
    }

    #[test]
    fn test_fallback_deserializes_lowercase() {
        let fallback: Fallback = serde_json::from_str("\"synthetic\"").unwrap();
        assert_eq!(fallback, Fallback::Synthetic);
        assert_eq!(Fallback::default(), Fallback::None);
    }
}
