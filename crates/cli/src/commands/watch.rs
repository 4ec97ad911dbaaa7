//! Watch command: periodic pipeline runs backed by the result cache.
//!
//! Runs within the cache TTL are served without touching the network, so the
//! interval can be shorter than the TTL without extra upstream load.

use super::common::{
    build_pipeline, format_decimal, FilterArgs, SourceArgs, NO_DATA_MESSAGE, NO_MATCH_MESSAGE,
};
use anyhow::Result;
use clap::Args;
use crypto_analytics_core::{AppConfig, Currency};
use crypto_analytics_data::{PipelineResult, Summary, TableFilter};
use std::sync::Arc;
use std::time::Duration;

/// Arguments for the watch command.
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Seconds between runs
    #[arg(long, default_value_t = 60)]
    pub interval_secs: u64,

    /// Stop after this many runs (0 = until Ctrl-C)
    #[arg(long, default_value_t = 0)]
    pub iterations: u64,

    /// Cache lifetime in seconds (overrides `pipeline.cache_ttl_secs`)
    #[arg(long)]
    pub cache_ttl_secs: Option<u64>,

    /// Bypass the cache on every run
    #[arg(long)]
    pub refresh: bool,
}

/// Runs the watch loop. A failed run is reported on stderr and the loop continues.
///
/// # Errors
/// Returns an error if the pipeline cannot be built.
pub async fn run_watch(config: &AppConfig, args: WatchArgs) -> Result<()> {
    let (currency, target_size) = args.source.resolve(&config.pipeline);
    let ttl = args
        .cache_ttl_secs
        .or(config.pipeline.cache_ttl_secs)
        .map(Duration::from_secs);
    let mut pipeline = build_pipeline(config, ttl)?;
    let filter = args.filters.to_filter();

    tracing::info!(
        %currency,
        target_size,
        interval_secs = args.interval_secs,
        cache_ttl_secs = ttl.map(|t| t.as_secs()),
        "watching market listings"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval_secs.max(1)));
    let mut previous: Option<Arc<PipelineResult>> = None;
    let mut completed = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, stopping watch");
                break;
            }
        }

        let run = if args.refresh {
            pipeline.refresh(currency, target_size).await
        } else {
            pipeline.run(currency, target_size).await
        };

        match run {
            Ok(result) => {
                let cached = previous
                    .as_ref()
                    .is_some_and(|prev| Arc::ptr_eq(prev, &result));
                println!("{}", status_line(currency, &result, &filter, cached));
                previous = Some(result);
            }
            Err(e) => {
                eprintln!("Error: {e}");
                tracing::warn!(error = %e, "pipeline run failed");
            }
        }

        let purged = pipeline.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "expired cache entries dropped");
        }

        completed += 1;
        if args.iterations > 0 && completed >= args.iterations {
            break;
        }
    }

    Ok(())
}

/// One line per run: the notice for an empty fetch or filter, otherwise
/// the headline figures of the filtered table.
fn status_line(
    currency: Currency,
    result: &PipelineResult,
    filter: &TableFilter,
    cached: bool,
) -> String {
    if result.table.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }
    let filtered = result.table.filter(filter);
    if filtered.is_empty() {
        return NO_MATCH_MESSAGE.to_string();
    }
    let summary = Summary::from_table(&filtered);
    format!(
        "[{}] {} coins={} avg_price={} avg_market_cap={} source={}",
        chrono::Utc::now().format("%H:%M:%S"),
        currency,
        summary.coins,
        format_decimal(summary.mean_price, 2),
        format_decimal(summary.mean_market_cap, 0),
        if cached { "cache" } else { "upstream" },
    )
}
