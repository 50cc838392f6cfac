pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::historical_prices::HistoricalPricesUseCase;
use crate::application::market_data::MarketDataUseCase;
use crate::config::CacheConfig;
use crate::domain::entities::price_record::PriceRecord;
use crate::domain::entities::reference::{LastTradedPrice, ListedSymbol};
use crate::domain::error::DomainError;
use crate::domain::ports::clock::Clock;
use crate::domain::ports::price_source::PriceSource;
use crate::domain::ports::price_store::PriceStore;
use crate::domain::ports::reference_data::ReferenceDataSource;
use crate::domain::values::chart_range::ChartRange;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::iex::IexClient;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::price_repo::SqlitePriceRepo;
use rusqlite::Connection;
use std::sync::Arc;

pub struct PriceCache {
    history_uc: HistoricalPricesUseCase,
    market_uc: MarketDataUseCase,
    store: Arc<dyn PriceStore>,
}

impl PriceCache {
    pub fn new(config: &CacheConfig) -> Result<Self, DomainError> {
        let iex = Arc::new(IexClient::new(
            config.iex_base_url.clone(),
            config.iex_token.clone(),
            config.http_timeout,
        )?);
        Self::with_providers(config, iex.clone(), iex, Arc::new(SystemClock))
    }

    pub fn with_providers(
        config: &CacheConfig,
        source: Arc<dyn PriceSource>,
        reference: Arc<dyn ReferenceDataSource>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        let conn = Connection::open(&config.db_path).map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL").map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;

        run_migrations(&conn)?;

        let store: Arc<dyn PriceStore> = Arc::new(SqlitePriceRepo::new(conn));

        Ok(Self {
            history_uc: HistoricalPricesUseCase::new(
                store.clone(),
                source,
                clock,
                config.day_fetch_concurrency,
            ),
            market_uc: MarketDataUseCase::new(reference),
            store,
        })
    }

    /// Dispatch a historical price request the way the HTTP entry point does:
    /// blank values count as absent, a date selects the exact-date query, a
    /// range selects the range query, otherwise one month of daily data.
    /// Non-blank tokens are passed on untouched.
    pub async fn historical_prices(
        &self,
        symbol: &str,
        range: Option<&str>,
        date: Option<&str>,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Ok(vec![]);
        }
        let range = range.filter(|r| !r.trim().is_empty());
        let date = date.filter(|d| !d.trim().is_empty());

        match (date, range) {
            (Some(date), range) => {
                let range = range.map(ChartRange::parse).unwrap_or(ChartRange::ByDate);
                self.history_uc.for_date(&symbol, &range, date).await
            }
            (None, Some(range)) => {
                self.history_uc
                    .for_range(&symbol, &ChartRange::parse(range))
                    .await
            }
            (None, None) => self.history_uc.for_symbol(&symbol).await,
        }
    }

    // Delegating methods
    pub async fn prices_for_date(
        &self,
        symbol: &str,
        range: &ChartRange,
        date: &str,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        self.history_uc.for_date(&symbol.to_uppercase(), range, date).await
    }

    pub async fn prices_for_range(
        &self,
        symbol: &str,
        range: &ChartRange,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        self.history_uc.for_range(&symbol.to_uppercase(), range).await
    }

    pub async fn prices(&self, symbol: &str) -> Result<Vec<PriceRecord>, DomainError> {
        self.history_uc.for_symbol(&symbol.to_uppercase()).await
    }

    pub async fn symbols(&self) -> Result<Vec<ListedSymbol>, DomainError> {
        self.market_uc.symbols().await
    }

    pub async fn last_traded_prices(
        &self,
        symbols: &[String],
    ) -> Result<Vec<LastTradedPrice>, DomainError> {
        self.market_uc.last_traded_prices(symbols).await
    }

    pub fn cached_points(&self, symbol: &str) -> Result<usize, DomainError> {
        self.store.count(symbol)
    }

    pub fn store(&self) -> Arc<dyn PriceStore> {
        self.store.clone()
    }
}
