//! Export command: writes the (filtered) clean table to CSV.

use super::common::{build_pipeline, filtered_or_notice, FilterArgs, SourceArgs};
use anyhow::Result;
use clap::Args;
use crypto_analytics_core::AppConfig;
use crypto_analytics_data::CsvStorage;
use std::path::PathBuf;

/// Arguments for the export command.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output CSV file path
    #[arg(short, long, default_value = "crypto_clean.csv")]
    pub output: PathBuf,
}

/// Runs the export command. Nothing is written when no rows remain.
///
/// # Errors
/// Returns an error if the fetch fails or the file cannot be written.
pub async fn run_export(config: &AppConfig, args: ExportArgs) -> Result<()> {
    let (currency, target_size) = args.source.resolve(&config.pipeline);
    let mut pipeline = build_pipeline(config, None)?;
    let result = pipeline.run(currency, target_size).await?;

    let Some(table) = filtered_or_notice(&result, &args.filters) else {
        return Ok(());
    };

    CsvStorage::write_clean(&args.output, &table)?;
    println!("Wrote {} coins to {}", table.len(), args.output.display());
    Ok(())
}
