//! Core types and configuration for the crypto market analytics pipeline.
//!
//! - [`market`]: quote currencies and the untyped raw listing records
//! - [`config`] / [`config_loader`]: layered application configuration

pub mod config;
pub mod config_loader;
pub mod market;

pub use config::{AppConfig, CoinGeckoConfig, PipelineConfig};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use market::{value_text, Currency, RawRecord, RawTable, UnknownCurrency};
