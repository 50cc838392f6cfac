use crate::domain::entities::reference::{LastTradedPrice, ListedSymbol};
use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Uncached reference calls forwarded straight to the provider.
#[async_trait]
pub trait ReferenceDataSource: Send + Sync {
    async fn list_symbols(&self) -> Result<Vec<ListedSymbol>, DomainError>;
    async fn last_traded_prices(
        &self,
        symbols: &[String],
    ) -> Result<Vec<LastTradedPrice>, DomainError>;
}
