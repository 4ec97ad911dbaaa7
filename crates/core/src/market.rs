//! Raw market listing types shared by the fetcher and the normalizer.
//!
//! A [`RawRecord`] is deliberately untyped: upstream guarantees nothing about
//! field presence or value shape, so every field is kept as an optional JSON
//! value and typed only later during cleaning.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// Currency
// =============================================================================

/// Quote currency for market listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Inr,
    Eur,
    Gbp,
    Jpy,
}

impl Currency {
    /// Every supported quote currency, in display order.
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Inr,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
    ];

    /// Returns the lowercase code the upstream API expects.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Inr => "inr",
            Self::Eur => "eur",
            Self::Gbp => "gbp",
            Self::Jpy => "jpy",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a currency code outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported currency '{0}' (expected one of usd, inr, eur, gbp, jpy)")]
pub struct UnknownCurrency(pub String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == code)
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

// =============================================================================
// Raw records
// =============================================================================

/// One asset entry as returned by the markets listing, before validation.
///
/// Holds exactly the listing columns the pipeline uses. Absent fields and
/// explicit `null`s both deserialize to `None`; any other upstream field is
/// dropped on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub symbol: Option<Value>,
    pub name: Option<Value>,
    pub image: Option<Value>,
    pub current_price: Option<Value>,
    pub market_cap: Option<Value>,
    pub market_cap_rank: Option<Value>,
    pub total_volume: Option<Value>,
    pub circulating_supply: Option<Value>,
    pub total_supply: Option<Value>,
    pub ath: Option<Value>,
    pub ath_change_percentage: Option<Value>,
    pub ath_date: Option<Value>,
    pub atl: Option<Value>,
    pub atl_change_percentage: Option<Value>,
    pub atl_date: Option<Value>,
}

impl RawRecord {
    /// Returns the deduplication key `(symbol, name)`.
    #[must_use]
    pub fn identity_key(&self) -> (Option<String>, Option<String>) {
        (
            value_text(self.symbol.as_ref()),
            value_text(self.name.as_ref()),
        )
    }
}

/// Renders a JSON value as text; strings are taken verbatim, `null` is missing.
#[must_use]
pub fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Ordered table of raw records as accumulated by the fetcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    records: Vec<RawRecord>,
}

impl RawTable {
    #[must_use]
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<RawRecord> {
        self.records
    }
}

impl From<Vec<RawRecord>> for RawTable {
    fn from(records: Vec<RawRecord>) -> Self {
        Self::new(records)
    }
}
