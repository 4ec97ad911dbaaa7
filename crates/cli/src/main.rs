use clap::{Parser, Subcommand};
use crypto_analytics_core::{AppConfig, ConfigLoader, DEFAULT_CONFIG_PATH};

mod commands;

use commands::{ExportArgs, SummaryArgs, TopArgs, WatchArgs};

#[derive(Parser)]
#[command(name = "crypto-analytics")]
#[command(about = "Fetch, clean and explore CoinGecko market listings", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Config profile, layered from `<config>.<profile>.toml`
    #[arg(long, global = true, env = "APP_PROFILE")]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and clean listings, then print headline statistics and the table
    Summary(SummaryArgs),
    /// Show the top coins by a numeric column
    Top(TopArgs),
    /// Write the clean table to CSV
    Export(ExportArgs),
    /// Re-run the pipeline on an interval, serving from the cache when fresh
    Watch(WatchArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = load_config(&cli.config, cli.profile.as_deref())?;

    match cli.command {
        Commands::Summary(args) => commands::run_summary(&config, args).await?,
        Commands::Top(args) => commands::run_top(&config, args).await?,
        Commands::Export(args) => commands::run_export(&config, args).await?,
        Commands::Watch(args) => commands::run_watch(&config, args).await?,
    }

    Ok(())
}

fn load_config(path: &str, profile: Option<&str>) -> anyhow::Result<AppConfig> {
    let config = match profile {
        Some(profile) => ConfigLoader::load_with_profile(path, profile)?,
        None => ConfigLoader::load_from(path)?,
    };
    tracing::debug!(
        path,
        currency = %config.pipeline.vs_currency,
        target_size = config.pipeline.target_size,
        "configuration loaded"
    );
    Ok(config)
}
