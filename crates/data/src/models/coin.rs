//! Cleaned market listing record.
//!
//! Every field that can fail coercion is an `Option`; `None` is the missing
//! marker and is never conflated with zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One asset after cleaning: typed, rounded, and enriched with derived columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    /// Ticker symbol (e.g., "btc")
    pub symbol: Option<String>,
    /// Display name (e.g., "Bitcoin")
    pub name: Option<String>,
    /// Logo URL
    pub image: Option<String>,

    pub current_price: Option<i128>,
    pub market_cap: Option<i128>,
    pub market_cap_rank: Option<i64>,
    pub total_volume: Option<i128>,
    pub circulating_supply: Option<i128>,
    pub total_supply: Option<i128>,

    /// All-time high price
    pub ath: Option<i128>,
    /// Distance from the all-time high in percent, 2 decimal places
    pub ath_change_percentage: Option<f64>,
    pub ath_date: Option<DateTime<Utc>>,
    pub ath_year: Option<i32>,
    pub ath_month: Option<u32>,

    /// All-time low price
    pub atl: Option<i128>,
    /// Distance from the all-time low in percent, 2 decimal places
    pub atl_change_percentage: Option<f64>,
    pub atl_date: Option<DateTime<Utc>>,
    pub atl_year: Option<i32>,
    pub atl_month: Option<u32>,

    /// circulating_supply / total_supply
    pub supply_ratio: Option<f64>,
}

impl CleanRecord {
    /// Name for display, falling back to the symbol.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.symbol.as_deref())
            .unwrap_or("-")
    }

    /// Returns true if the name or symbol contains `needle` (case-insensitive).
    ///
    /// `needle` is expected to be lowercase already.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        [self.name.as_deref(), self.symbol.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}
