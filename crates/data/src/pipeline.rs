//! Fetch → clean orchestration with result caching.

use crate::cache::TtlCache;
use crate::models::CleanTable;
use crate::normalizer;
use chrono::{DateTime, Utc};
use crypto_analytics_coingecko::{CoinGeckoClient, CoinGeckoError, MarketsRequest, DEFAULT_ORDER};
use crypto_analytics_core::Currency;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Cache key: one entry per currency and requested size.
pub type CacheKey = (Currency, usize);

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("market data fetch failed: {0}")]
    Fetch(#[from] CoinGeckoError),
}

/// One completed fetch-and-clean run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub table: CleanTable,
    /// Rows after dedup, before cleaning. Always equals `table.len()`.
    pub raw_count: usize,
    pub fetched_at: DateTime<Utc>,
}

/// Runs the fetcher and normalizer, caching successful results per
/// `(currency, target_size)`.
#[derive(Debug)]
pub struct MarketPipeline {
    client: CoinGeckoClient,
    order: String,
    cache: TtlCache<CacheKey, Arc<PipelineResult>>,
}

impl MarketPipeline {
    /// `cache_ttl = None` keeps results until [`Self::clear_cache`] or
    /// [`Self::refresh`].
    #[must_use]
    pub fn new(client: CoinGeckoClient, cache_ttl: Option<Duration>) -> Self {
        Self {
            client,
            order: DEFAULT_ORDER.to_string(),
            cache: TtlCache::new(cache_ttl),
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    /// Returns the cached result for this key if fresh, otherwise fetches,
    /// cleans, and caches.
    ///
    /// # Errors
    /// Returns [`PipelineError::Fetch`] if any page fails. Failures are not cached.
    pub async fn run(
        &mut self,
        currency: Currency,
        target_size: usize,
    ) -> Result<Arc<PipelineResult>, PipelineError> {
        let key = (currency, target_size);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(%currency, target_size, "pipeline cache hit");
            return Ok(Arc::clone(hit));
        }

        let request = MarketsRequest::new(currency, target_size).with_order(self.order.clone());
        let outcome = self.client.fetch_markets(&request).await?;

        let table = normalizer::clean(&outcome.table);
        let result = Arc::new(PipelineResult {
            raw_count: outcome.raw_count(),
            table,
            fetched_at: Utc::now(),
        });

        tracing::info!(
            %currency,
            target_size,
            rows = result.table.len(),
            pages = outcome.pages_requested,
            "pipeline run complete"
        );

        self.cache.insert(key, Arc::clone(&result));
        Ok(result)
    }

    /// Drops every cached result, then runs.
    ///
    /// # Errors
    /// Same as [`Self::run`].
    pub async fn refresh(
        &mut self,
        currency: Currency,
        target_size: usize,
    ) -> Result<Arc<PipelineResult>, PipelineError> {
        self.clear_cache();
        self.run(currency, target_size).await
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Drops expired cache entries, returning how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        self.cache.purge_expired()
    }

    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}
