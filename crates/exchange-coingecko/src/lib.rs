//! CoinGecko markets listing integration for the crypto analytics pipeline.
//!
//! This crate provides:
//! - Paginated, rate-limited client for `GET /coins/markets`
//! - Identity deduplication of the accumulated listing
//! - Typed fetch errors with transient/final classification
//!
//! # Example
//!
//! ```ignore
//! use crypto_analytics_coingecko::{CoinGeckoClient, MarketsRequest};
//! use crypto_analytics_core::Currency;
//!
//! let client = CoinGeckoClient::public()?;
//! let outcome = client.fetch_markets(&MarketsRequest::new(Currency::Eur, 1000)).await?;
//! println!("{} pages, {} unique coins", outcome.pages_requested, outcome.raw_count());
//! ```
//!
//! # Failure model
//!
//! A fetch is all-or-nothing. Any non-success response, network failure, or
//! timeout aborts the whole fetch, after the per-page retry budget for
//! transient failures is spent.

pub mod client;
pub mod error;
pub mod types;

pub use client::{
    dedup_by_identity, CoinGeckoClient, CoinGeckoClientConfig, COINGECKO_API_URL, MARKETS_PATH,
};
pub use error::{CoinGeckoError, Result, DEFAULT_RATE_LIMIT_WAIT_SECS};
pub use types::{pages_needed, FetchOutcome, MarketsRequest, DEFAULT_ORDER, MAX_PER_PAGE};
