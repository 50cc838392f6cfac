use crate::domain::entities::price_record::PriceRecord;
use crate::domain::error::DomainError;
use crate::domain::values::chart_range::ChartRange;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Upstream historical price provider.
///
/// Returned records carry the provider's own date and, for intraday data, its
/// minute; callers decide how to key them. No implementation retries.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &str;

    /// Full chart for one date (intraday minute bars).
    async fn fetch_for_date(
        &self,
        symbol: &str,
        range: &ChartRange,
        date: NaiveDate,
    ) -> Result<Vec<PriceRecord>, DomainError>;

    /// Daily chart covering a whole range.
    async fn fetch_range(
        &self,
        symbol: &str,
        range: &ChartRange,
    ) -> Result<Vec<PriceRecord>, DomainError>;

    /// Provider default chart for a symbol.
    async fn fetch_latest(&self, symbol: &str) -> Result<Vec<PriceRecord>, DomainError>;

    /// Day-level aggregate(s) for one calendar day.
    async fn fetch_by_day(
        &self,
        symbol: &str,
        granularity: &ChartRange,
        day: NaiveDate,
    ) -> Result<Vec<PriceRecord>, DomainError>;
}
