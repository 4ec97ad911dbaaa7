//! Arguments and output helpers shared by every command.

use anyhow::{anyhow, Result};
use clap::Args;
use crypto_analytics_coingecko::{CoinGeckoClient, CoinGeckoClientConfig};
use crypto_analytics_core::{AppConfig, Currency, PipelineConfig};
use crypto_analytics_data::{CleanRecord, CleanTable, MarketPipeline, PipelineResult, TableFilter};
use std::num::NonZeroU32;
use std::time::Duration;

pub const NO_DATA_MESSAGE: &str =
    "No data returned. Try lowering target size or changing currency.";
pub const NO_MATCH_MESSAGE: &str = "No coins match the current filters.";

/// Which listings to fetch. Unset flags fall back to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Quote currency (usd, inr, eur, gbp, jpy)
    #[arg(long)]
    pub currency: Option<Currency>,

    /// Number of coins to request (fetched in pages of 250)
    #[arg(long)]
    pub target_size: Option<usize>,
}

impl SourceArgs {
    pub fn resolve(&self, config: &PipelineConfig) -> (Currency, usize) {
        (
            self.currency.unwrap_or(config.vs_currency),
            self.target_size.unwrap_or(config.target_size),
        )
    }
}

/// Row filters applied to the clean table before display or export.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive substring of name or symbol
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub min_market_cap: Option<f64>,

    #[arg(long)]
    pub max_market_cap: Option<f64>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    /// Keep coins whose all-time high fell in this year (repeatable)
    #[arg(long = "ath-year")]
    pub ath_years: Vec<i32>,

    /// Keep coins whose all-time low fell in this year (repeatable)
    #[arg(long = "atl-year")]
    pub atl_years: Vec<i32>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> TableFilter {
        let mut filter = TableFilter::new()
            .with_ath_years(self.ath_years.iter().copied())
            .with_atl_years(self.atl_years.iter().copied());

        if let Some(search) = &self.search {
            filter = filter.with_search(search);
        }
        if let Some((min, max)) = open_range(self.min_market_cap, self.max_market_cap) {
            filter = filter.with_market_cap_range(min, max);
        }
        if let Some((min, max)) = open_range(self.min_price, self.max_price) {
            filter = filter.with_price_range(min, max);
        }
        filter
    }
}

fn open_range(min: Option<f64>, max: Option<f64>) -> Option<(f64, f64)> {
    if min.is_none() && max.is_none() {
        return None;
    }
    Some((min.unwrap_or(f64::NEG_INFINITY), max.unwrap_or(f64::INFINITY)))
}

/// Builds the pipeline from the loaded configuration.
///
/// # Errors
/// Returns an error if the rate limit is zero or the HTTP client cannot be built.
pub fn build_pipeline(config: &AppConfig, cache_ttl: Option<Duration>) -> Result<MarketPipeline> {
    let requests_per_minute = NonZeroU32::new(config.coingecko.requests_per_minute)
        .ok_or_else(|| anyhow!("coingecko.requests_per_minute must be greater than zero"))?;

    let client = CoinGeckoClient::new(
        CoinGeckoClientConfig::default()
            .with_base_url(config.coingecko.api_url.clone())
            .with_rate_limit(requests_per_minute)
            .with_timeout_secs(config.coingecko.timeout_secs)
            .with_max_retries(config.coingecko.max_retries)
            .with_max_retry_delay_secs(config.coingecko.max_retry_delay_secs),
    )?;

    Ok(MarketPipeline::new(client, cache_ttl).with_order(config.pipeline.order.clone()))
}

/// Applies the filters, printing the matching notice when nothing is left.
///
/// An empty fetch and an empty filter result get different messages.
pub fn filtered_or_notice(result: &PipelineResult, filters: &FilterArgs) -> Option<CleanTable> {
    if result.table.is_empty() {
        println!("{NO_DATA_MESSAGE}");
        return None;
    }
    let filtered = result.table.filter(&filters.to_filter());
    if filtered.is_empty() {
        println!("{NO_MATCH_MESSAGE}");
        return None;
    }
    Some(filtered)
}

pub fn print_header(title: &str, subtitle: &str) {
    println!();
    println!("{}", "=".repeat(100));
    println!("{title}");
    println!("{subtitle}");
    println!("{}", "=".repeat(100));
    println!();
}

/// Prints up to `limit` records as a fixed-width table.
pub fn print_records<'a>(records: impl IntoIterator<Item = &'a CleanRecord>, limit: usize) {
    println!(
        "{:>5} {:<8} {:<24} {:>14} {:>20} {:>10} {:>12} {:>8}",
        "Rank", "Symbol", "Name", "Price", "Market Cap", "ATH %", "ATL %", "Supply"
    );
    println!("{}", "-".repeat(100));

    for record in records.into_iter().take(limit) {
        println!(
            "{:>5} {:<8} {:<24} {:>14} {:>20} {:>10} {:>12} {:>8}",
            format_opt(record.market_cap_rank),
            truncate(record.symbol.as_deref().unwrap_or("N/A"), 8),
            truncate(record.display_name(), 24),
            format_whole(record.current_price),
            format_whole(record.market_cap),
            format_decimal(record.ath_change_percentage, 2),
            format_decimal(record.atl_change_percentage, 2),
            format_decimal(record.supply_ratio, 2),
        );
    }
}

pub fn format_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

pub fn format_decimal(value: Option<f64>, places: usize) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.places$}"))
}

/// Whole number with thousands separators.
pub fn format_whole(value: Option<i128>) -> String {
    let Some(value) = value else {
        return "N/A".to_string();
    };
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}
