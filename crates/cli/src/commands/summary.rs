//! Summary command: headline statistics plus the leading rows of the table.

use super::common::{
    build_pipeline, filtered_or_notice, format_decimal, format_opt, print_header, print_records,
    FilterArgs, SourceArgs,
};
use anyhow::Result;
use clap::Args;
use crypto_analytics_core::AppConfig;
use crypto_analytics_data::Summary;

/// Arguments for the summary command.
#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Number of table rows to print
    #[arg(long, default_value_t = 20)]
    pub rows: usize,

    /// Print the statistics as JSON and skip the table
    #[arg(long)]
    pub json: bool,
}

/// Runs the summary command.
///
/// # Errors
/// Returns an error if the configuration is invalid or the fetch fails.
pub async fn run_summary(config: &AppConfig, args: SummaryArgs) -> Result<()> {
    let (currency, target_size) = args.source.resolve(&config.pipeline);
    let mut pipeline = build_pipeline(config, None)?;
    let result = pipeline.run(currency, target_size).await?;

    let Some(table) = filtered_or_notice(&result, &args.filters) else {
        return Ok(());
    };
    let summary = Summary::from_table(&table);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_header(
        "CRYPTO MARKET SUMMARY",
        &format!(
            "Currency: {} | Fetched: {} | Showing {} of {} coins",
            currency,
            result.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
            table.len(),
            result.raw_count
        ),
    );

    println!("{:<28} {:>20}", "Coins", summary.coins);
    println!("{:<28} {:>20}", "Average price", format_decimal(summary.mean_price, 2));
    println!(
        "{:<28} {:>20}",
        "Average market cap",
        format_decimal(summary.mean_market_cap, 0)
    );
    println!(
        "{:<28} {:>20}",
        "Median supply ratio",
        format_decimal(summary.median_supply_ratio, 2)
    );
    println!(
        "{:<28} {:>20}",
        "Farthest above ATL",
        summary.farthest_above_atl.as_deref().unwrap_or("N/A")
    );
    println!("{:<28} {:>20}", "Most common ATH year", format_opt(summary.top_ath_year));
    println!("{:<28} {:>20}", "Most common ATL year", format_opt(summary.top_atl_year));
    println!();

    print_records(table.iter(), args.rows);
    Ok(())
}
