use clap::Parser;
use pricecache::cli::commands::{Cli, Commands};
use pricecache::config::CacheConfig;
use pricecache::PriceCache;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pricecache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match CacheConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::debug!(db_path = %config.db_path, base_url = %config.iex_base_url, "configuration loaded");

    let cache = match PriceCache::new(&config) {
        Ok(cache) => cache,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize price cache");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(cache, cli.command).await {
        tracing::error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

async fn run_command(cache: PriceCache, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::History {
            symbol,
            range,
            date,
        } => {
            let records = cache
                .historical_prices(&symbol, range.as_deref(), date.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Symbols => {
            let symbols = cache.symbols().await?;
            println!("{}", serde_json::to_string_pretty(&symbols)?);
        }
        Commands::Last { symbols } => {
            let prices = cache.last_traded_prices(&symbols).await?;
            println!("{}", serde_json::to_string_pretty(&prices)?);
        }
        Commands::Stats { symbol } => {
            let count = cache.cached_points(&symbol)?;
            println!("{}: {count} cached points", symbol.to_uppercase());
        }
    }
    Ok(())
}
