//! Per-run series cache.

use digest_core::types::{Asset, AssetClass, RawSeries};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A fetched series and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSeries {
    pub series: Arc<RawSeries>,
    /// Generated by the synthetic fallback
    pub synthetic: bool,
}

/// In-memory cache keyed by symbol and asset class.
///
/// Lives for one batch run so an asset shared by several subscribers is
/// fetched once.
#[derive(Debug, Default)]
pub struct SeriesCache {
    cache: RwLock<HashMap<(String, AssetClass), FetchedSeries>>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn cache_key(asset: &Asset) -> (String, AssetClass) {
        (asset.symbol.to_uppercase(), asset.class)
    }

    /// Get a cached series.
    pub fn get(&self, asset: &Asset) -> Option<FetchedSeries> {
        self.cache.read().get(&Self::cache_key(asset)).cloned()
    }

    /// Store a series.
    pub fn put(&self, asset: &Asset, fetched: FetchedSeries) {
        self.cache.write().insert(Self::cache_key(asset), fetched);
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Clear all cached data.
    pub fn clear(&self) {
        self.cache.write().clear();
    }
}
