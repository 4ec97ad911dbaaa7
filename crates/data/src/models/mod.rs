//! Data models for the clean market table.
//!
//! Magnitudes are whole numbers (`i128`, wide enough for token supplies);
//! percentages and ratios stay `f64`.

pub mod coin;
pub mod table;

pub use coin::CleanRecord;
pub use table::{CleanTable, NumericColumn, YearColumn};
