//! CoinGecko REST client for the paginated markets listing.
//!
//! Pages are requested strictly one after another through a rate limiter.
//! A fetch either returns every page up to the first empty one, or fails as
//! a whole.
//!
//! # Example
//!
//! ```ignore
//! use crypto_analytics_coingecko::{CoinGeckoClient, MarketsRequest};
//! use crypto_analytics_core::Currency;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CoinGeckoClient::public()?;
//!     let outcome = client
//!         .fetch_markets(&MarketsRequest::new(Currency::Usd, 500))
//!         .await?;
//!     println!("Fetched {} unique coins", outcome.raw_count());
//!     Ok(())
//! }
//! ```

use crate::error::{CoinGeckoError, Result, DEFAULT_RATE_LIMIT_WAIT_SECS};
use crate::types::{FetchOutcome, MarketsRequest, MAX_PER_PAGE};
use crypto_analytics_core::{RawRecord, RawTable};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use std::collections::HashSet;
use std::num::NonZeroU32;
use std::time::Duration;

// =============================================================================
// Constants
// =============================================================================

/// Public CoinGecko API base URL.
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Path of the markets listing endpoint, relative to the base URL.
pub const MARKETS_PATH: &str = "/coins/markets";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the CoinGecko client.
#[derive(Debug, Clone)]
pub struct CoinGeckoClientConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Requests per minute limit.
    pub requests_per_minute: NonZeroU32,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Retries allowed per page for transient failures.
    pub max_retries: u32,

    /// Longest wait honoured before a retry. A server asking for more
    /// fails the fetch instead of stalling it.
    pub max_retry_delay_secs: u64,
}

impl Default for CoinGeckoClientConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            requests_per_minute: nonzero!(30u32),
            timeout_secs: 30,
            max_retries: 2,
            max_retry_delay_secs: 30,
        }
    }
}

impl CoinGeckoClientConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Sets the per-page retry budget for transient failures.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the longest retry wait the client will sleep through.
    #[must_use]
    pub fn with_max_retry_delay_secs(mut self, secs: u64) -> Self {
        self.max_retry_delay_secs = secs;
        self
    }
}

// =============================================================================
// CoinGeckoClient
// =============================================================================

/// Client for the public markets listing.
pub struct CoinGeckoClient {
    /// Configuration.
    config: CoinGeckoClientConfig,

    /// HTTP client.
    http: Client,

    /// Rate limiter.
    rate_limiter: RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl std::fmt::Debug for CoinGeckoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinGeckoClient")
            .field("base_url", &self.config.base_url)
            .field("requests_per_minute", &self.config.requests_per_minute)
            .field("max_retries", &self.config.max_retries)
            .finish_non_exhaustive()
    }
}

impl CoinGeckoClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: CoinGeckoClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoinGeckoError::ClientBuild(e.to_string()))?;

        let rate_limiter = RateLimiter::direct(Quota::per_minute(config.requests_per_minute));

        Ok(Self {
            config,
            http,
            rate_limiter,
        })
    }

    /// Creates a client for the public API with default settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn public() -> Result<Self> {
        Self::new(CoinGeckoClientConfig::default())
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fetches up to `ceil(target_size / 250)` pages of market listings.
    ///
    /// Stops at the first empty page. The accumulated records are projected
    /// onto the expected field set and deduplicated by `(symbol, name)`,
    /// keeping the first occurrence.
    ///
    /// # Errors
    /// Returns error if `target_size` is zero or any page request fails.
    /// Nothing gathered before the failure is returned.
    pub async fn fetch_markets(&self, request: &MarketsRequest) -> Result<FetchOutcome> {
        if request.target_size == 0 {
            return Err(CoinGeckoError::InvalidRequest(
                "target_size must be positive".to_string(),
            ));
        }

        let pages = request.page_count();
        let mut rows: Vec<RawRecord> = Vec::new();
        let mut pages_requested = 0;

        tracing::info!(
            vs_currency = %request.vs_currency,
            target_size = request.target_size,
            pages,
            "fetching market listings"
        );

        for page in 1..=pages {
            let records = self.get_page_with_retry(request, page).await?;
            pages_requested += 1;

            if records.is_empty() {
                tracing::debug!(page, "empty page, no more listings upstream");
                break;
            }

            tracing::debug!(page, records = records.len(), "page received");
            rows.extend(records);
        }

        let fetched_rows = rows.len();
        let table = RawTable::new(dedup_by_identity(rows));

        tracing::info!(
            fetched_rows,
            unique_rows = table.len(),
            pages_requested,
            "market listings fetched"
        );

        Ok(FetchOutcome {
            table,
            fetched_rows,
            pages_requested,
        })
    }

    /// Requests one page, retrying transient failures within the budget.
    ///
    /// A requested wait longer than `max_retry_delay_secs` is not slept
    /// through; the error is returned at once.
    async fn get_page_with_retry(
        &self,
        request: &MarketsRequest,
        page: usize,
    ) -> Result<Vec<RawRecord>> {
        let max_delay = Duration::from_secs(self.config.max_retry_delay_secs);
        let mut attempt = 0;
        loop {
            let err = match self.get_page(request, page).await {
                Ok(records) => return Ok(records),
                Err(err) => err,
            };
            let delay = match err.retry_delay() {
                Some(delay) if err.is_retryable() && attempt < self.config.max_retries => delay,
                _ => return Err(err),
            };
            if delay > max_delay {
                tracing::warn!(
                    page,
                    requested_secs = delay.as_secs(),
                    max_secs = max_delay.as_secs(),
                    "upstream asked for a longer wait than allowed, giving up"
                );
                return Err(err);
            }

            attempt += 1;
            tracing::warn!(
                page,
                attempt,
                delay_secs = delay.as_secs(),
                error = %err,
                "transient fetch failure, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Waits for the rate limiter and requests a single page.
    async fn get_page(&self, request: &MarketsRequest, page: usize) -> Result<Vec<RawRecord>> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.config.base_url, MARKETS_PATH);
        let per_page = MAX_PER_PAGE.to_string();
        let page_param = page.to_string();

        tracing::debug!("GET {} page={}", url, page);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(&[
                ("vs_currency", request.vs_currency.as_str()),
                ("order", request.order.as_str()),
                ("per_page", per_page.as_str()),
                ("page", page_param.as_str()),
                ("sparkline", "false"),
            ])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Maps the status to an error or decodes the body as one page.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Vec<RawRecord>> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_RATE_LIMIT_WAIT_SECS);
            return Err(CoinGeckoError::rate_limited(retry_after));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoinGeckoError::status(status.as_u16(), body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Removes duplicate `(symbol, name)` pairs, keeping the first occurrence.
///
/// Records missing either identity field are compared on the missing marker,
/// so two records both lacking a symbol but sharing a name are duplicates.
#[must_use]
pub fn dedup_by_identity(records: Vec<RawRecord>) -> Vec<RawRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.identity_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(symbol: &str, name: &str, price: f64) -> RawRecord {
        RawRecord {
            symbol: Some(json!(symbol)),
            name: Some(json!(name)),
            current_price: Some(json!(price)),
            ..Default::default()
        }
    }

    // ==================== Config Tests ====================

    #[test]
    fn test_client_config_default() {
        let config = CoinGeckoClientConfig::default();
        assert_eq!(config.base_url, COINGECKO_API_URL);
        assert_eq!(config.requests_per_minute.get(), 30);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.max_retry_delay_secs, 30);
    }

    #[test]
    fn test_client_config_builder() {
        let config = CoinGeckoClientConfig::default()
            .with_base_url("http://localhost:9999")
            .with_rate_limit(nonzero!(120u32))
            .with_timeout_secs(5)
            .with_max_retries(0)
            .with_max_retry_delay_secs(5);

        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.requests_per_minute.get(), 120);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.max_retry_delay_secs, 5);
    }

    #[test]
    fn test_client_debug_hides_internals() {
        let client = CoinGeckoClient::public().unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("api.coingecko.com"));
        assert_eq!(client.base_url(), COINGECKO_API_URL);
    }

    // ==================== Dedup Tests ====================

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let records = vec![
            record("btc", "Bitcoin", 1.0),
            record("eth", "Ethereum", 2.0),
            record("btc", "Bitcoin", 3.0),
            record("btc", "Bitcoin Cash", 4.0),
        ];

        let unique = dedup_by_identity(records);

        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0].current_price, Some(json!(1.0)));
        assert_eq!(unique[2].name, Some(json!("Bitcoin Cash")));
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let records = vec![
            record("a", "A", 1.0),
            record("a", "A", 2.0),
            record("b", "B", 3.0),
            RawRecord::default(),
            RawRecord::default(),
        ];

        let once = dedup_by_identity(records);
        let twice = dedup_by_identity(once.clone());

        assert_eq!(once.len(), 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dedup_treats_missing_identity_as_equal() {
        let mut first = record("x", "X", 1.0);
        first.symbol = None;
        let mut second = record("y", "X", 2.0);
        second.symbol = Some(serde_json::Value::Null);

        let unique = dedup_by_identity(vec![first, second]);
        assert_eq!(unique.len(), 1);
    }

    // ==================== Request Validation Tests ====================

    #[tokio::test]
    async fn test_zero_target_size_is_rejected_without_io() {
        let client = CoinGeckoClient::new(
            CoinGeckoClientConfig::default().with_base_url("http://127.0.0.1:1"),
        )
        .unwrap();

        let err = client
            .fetch_markets(&MarketsRequest::new(
                crypto_analytics_core::Currency::Usd,
                0,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, CoinGeckoError::InvalidRequest(_)));
    }
}
