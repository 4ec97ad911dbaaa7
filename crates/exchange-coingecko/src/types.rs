//! Request and result types for the CoinGecko markets listing.

use crypto_analytics_core::{Currency, RawTable};
use serde::{Deserialize, Serialize};

/// Largest page the markets endpoint serves.
pub const MAX_PER_PAGE: usize = 250;

/// Upstream sort key for descending market capitalization.
pub const DEFAULT_ORDER: &str = "market_cap_desc";

/// Parameters of one fetch across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketsRequest {
    /// Quote currency for prices and caps.
    pub vs_currency: Currency,

    /// Number of records wanted; drives the page count.
    pub target_size: usize,

    /// Sort key recognized by upstream.
    pub order: String,
}

impl MarketsRequest {
    /// Creates a request ordered by descending market cap.
    #[must_use]
    pub fn new(vs_currency: Currency, target_size: usize) -> Self {
        Self {
            vs_currency,
            target_size,
            order: DEFAULT_ORDER.to_string(),
        }
    }

    /// Sets the upstream sort key.
    #[must_use]
    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    /// Number of pages needed to cover `target_size`.
    #[must_use]
    pub fn page_count(&self) -> usize {
        pages_needed(self.target_size, MAX_PER_PAGE)
    }
}

/// `ceil(target_size / page_capacity)`; zero capacity yields zero pages.
#[must_use]
pub fn pages_needed(target_size: usize, page_capacity: usize) -> usize {
    if page_capacity == 0 {
        return 0;
    }
    target_size.div_ceil(page_capacity)
}

/// Result of a complete, successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// Deduplicated raw table in arrival order.
    pub table: RawTable,

    /// Rows received across all pages before deduplication.
    pub fetched_rows: usize,

    /// Page requests that returned a response (including a final empty page).
    pub pages_requested: usize,
}

impl FetchOutcome {
    /// Record count of the raw table handed to cleaning.
    #[must_use]
    pub fn raw_count(&self) -> usize {
        self.table.len()
    }

    /// Rows dropped as duplicate `(symbol, name)` pairs.
    #[must_use]
    pub fn duplicates_removed(&self) -> usize {
        self.fetched_rows.saturating_sub(self.table.len())
    }
}
