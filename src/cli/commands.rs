use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pricecache", about = "Cached historical prices backed by IEX Cloud")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Historical prices for a symbol (served from cache where possible)
    History {
        /// Ticker symbol
        symbol: String,
        /// Range token (1d, 5d, 1m, 3m, 6m, 1y, 2y, 5y)
        #[arg(long)]
        range: Option<String>,
        /// Exact date (YYYYMMDD); returns minute bars for that day
        #[arg(long)]
        date: Option<String>,
    },
    /// List all symbols known to the provider
    Symbols,
    /// Last traded price for one or more symbols
    Last {
        symbols: Vec<String>,
    },
    /// Show how many points are cached for a symbol
    Stats {
        symbol: String,
    },
}
