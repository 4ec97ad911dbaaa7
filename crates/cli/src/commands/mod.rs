//! CLI commands for the market analytics pipeline.

pub mod common;
pub mod export;
pub mod summary;
pub mod top;
pub mod watch;

pub use export::{run_export, ExportArgs};
pub use summary::{run_summary, SummaryArgs};
pub use top::{run_top, TopArgs};
pub use watch::{run_watch, WatchArgs};
