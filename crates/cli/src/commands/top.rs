//! Top-N views over the clean table.

use super::common::{
    build_pipeline, filtered_or_notice, print_header, print_records, FilterArgs, SourceArgs,
};
use anyhow::Result;
use clap::Args;
use crypto_analytics_core::AppConfig;
use crypto_analytics_data::{CleanTable, NumericColumn};

/// Arguments for the top command.
#[derive(Args, Debug, Clone)]
pub struct TopArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Column to rank by (e.g. market_cap, ath_change_percentage).
    /// Without it, coins are listed by market cap rank.
    #[arg(long)]
    pub by: Option<NumericColumn>,

    /// Take the smallest values instead of the largest
    #[arg(long)]
    pub smallest: bool,

    /// Number of coins to show
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,
}

impl TopArgs {
    fn select(&self, table: &CleanTable) -> CleanTable {
        match (self.by, self.smallest) {
            (None, _) => table.top_by_rank(self.limit),
            (Some(column), false) => table.largest(column, self.limit),
            (Some(column), true) => table.smallest(column, self.limit),
        }
    }

    fn title(&self) -> String {
        match (self.by, self.smallest) {
            (None, _) => format!("TOP {} BY MARKET CAP RANK", self.limit),
            (Some(column), false) => format!("TOP {} BY {}", self.limit, column.name()),
            (Some(column), true) => format!("BOTTOM {} BY {}", self.limit, column.name()),
        }
    }
}

/// Runs the top command.
///
/// # Errors
/// Returns an error if the configuration is invalid or the fetch fails.
pub async fn run_top(config: &AppConfig, args: TopArgs) -> Result<()> {
    let (currency, target_size) = args.source.resolve(&config.pipeline);
    let mut pipeline = build_pipeline(config, None)?;
    let result = pipeline.run(currency, target_size).await?;

    let Some(table) = filtered_or_notice(&result, &args.filters) else {
        return Ok(());
    };

    let top = args.select(&table);
    print_header(
        &args.title().to_uppercase(),
        &format!("Currency: {} | {} of {} coins have a value", currency, top.len(), table.len()),
    );
    print_records(top.iter(), args.limit);
    Ok(())
}
