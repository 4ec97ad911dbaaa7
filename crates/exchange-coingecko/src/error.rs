//! Fetch errors for the markets listing.
//!
//! Every variant aborts the whole fetch: pages gathered before the failure
//! are discarded, so callers never see a partial table.

use std::time::Duration;
use thiserror::Error;

/// Delay assumed when a 429 carries no usable `Retry-After` header.
pub const DEFAULT_RATE_LIMIT_WAIT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum CoinGeckoError {
    /// The markets endpoint answered with a non-success status other than 429.
    #[error("markets endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// HTTP 429. `retry_after_secs` comes from the `Retry-After` header.
    #[error("rate limited by CoinGecko, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Connection or transport failure before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The per-request timeout elapsed.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The body was not a JSON array of listing objects.
    #[error("undecodable markets page: {0}")]
    Decode(String),

    /// Rejected before any network call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl CoinGeckoError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// True for failures worth another attempt: transport problems,
    /// timeouts, 429 and 5xx.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) | Self::InvalidRequest(_) | Self::ClientBuild(_) => false,
        }
    }

    /// How long to wait before retrying, or `None` if the error is final.
    #[must_use]
    pub fn retry_delay(&self) -> Option<Duration> {
        let secs = match self {
            Self::RateLimited { retry_after_secs } => *retry_after_secs,
            Self::Network(_) | Self::Timeout(_) => 1,
            Self::Status { status, .. } if *status >= 500 => 2,
            _ => return None,
        };
        Some(Duration::from_secs(secs))
    }
}

impl From<reqwest::Error> for CoinGeckoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CoinGeckoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoinGeckoError>;
