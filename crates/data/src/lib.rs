//! Clean market data: normalization, queries, export, and the cached pipeline.
//!
//! This crate provides:
//! - The normalizer turning fetched raw tables into typed clean tables
//! - Filters, ranking views and summary statistics over clean tables
//! - CSV export of the clean table
//! - A fetch → clean pipeline with an explicit result cache

pub mod cache;
pub mod csv_storage;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod query;
pub mod summary;

// Re-export commonly used types
pub use cache::TtlCache;
pub use csv_storage::{CsvStorage, CLEAN_COLUMNS};
pub use normalizer::clean;
pub use pipeline::{CacheKey, MarketPipeline, PipelineError, PipelineResult};
pub use query::{Range, TableFilter};
pub use summary::Summary;

// Re-export models
pub use models::{CleanRecord, CleanTable, NumericColumn, YearColumn};
