use crate::domain::entities::reference::{LastTradedPrice, ListedSymbol};
use crate::domain::error::DomainError;
use crate::domain::ports::reference_data::ReferenceDataSource;
use std::sync::Arc;

/// Reference calls forwarded to the provider without caching.
pub struct MarketDataUseCase {
    source: Arc<dyn ReferenceDataSource>,
}

impl MarketDataUseCase {
    pub fn new(source: Arc<dyn ReferenceDataSource>) -> Self {
        Self { source }
    }

    pub async fn symbols(&self) -> Result<Vec<ListedSymbol>, DomainError> {
        self.source.list_symbols().await
    }

    /// An empty symbol list short-circuits without a provider call.
    pub async fn last_traded_prices(
        &self,
        symbols: &[String],
    ) -> Result<Vec<LastTradedPrice>, DomainError> {
        let symbols: Vec<String> = symbols
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if symbols.is_empty() {
            return Ok(vec![]);
        }
        self.source.last_traded_prices(&symbols).await
    }
}
