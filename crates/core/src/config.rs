use crate::market::Currency;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub coingecko: CoinGeckoConfig,
    pub pipeline: PipelineConfig,
}

/// Upstream API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinGeckoConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    pub requests_per_minute: u32,
    pub max_retries: u32,
    /// Longest upstream-requested wait honoured before a retry.
    pub max_retry_delay_secs: u64,
}

/// Defaults for a fetch-clean cycle; CLI flags override these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub vs_currency: Currency,
    pub target_size: usize,
    pub order: String,
    /// Cache lifetime in seconds. `None` keeps entries until cleared.
    pub cache_ttl_secs: Option<u64>,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.coingecko.com/api/v3".to_string(),
            timeout_secs: 30,
            requests_per_minute: 30,
            max_retries: 2,
            max_retry_delay_secs: 30,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vs_currency: Currency::Usd,
            target_size: 1000,
            order: "market_cap_desc".to_string(),
            cache_ttl_secs: None,
        }
    }
}
