//! Historical price reconciliation.
//!
//! Every query first asks the store what is already materialized, fetches only
//! what is missing from the upstream source, persists it, and returns the
//! merged result. Two sentinel slots make "is this unit cached?" a single
//! lookup:
//!
//! - [`MinuteSlot::CompletenessMarker`] on a date means the whole trading day
//!   (09:30 through 16:00) was stored minute by minute.
//! - [`MinuteSlot::DayAggregate`] holds one record per calendar day for range
//!   queries.
//!
//! The use case keeps no state between calls; the store is the only source of
//! truth for what is cached.

use crate::domain::entities::price_record::{PriceKey, PriceRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::clock::Clock;
use crate::domain::ports::price_source::PriceSource;
use crate::domain::ports::price_store::PriceStore;
use crate::domain::values::chart_range::ChartRange;
use crate::domain::values::market_date::{
    days_back, format_canonical, parse_compact, trading_minutes, TRADING_MINUTES_PER_DAY,
};
use crate::domain::values::minute_slot::MinuteSlot;
use chrono::{NaiveDate, NaiveTime};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of reading one key from the store.
///
/// `exists` and `get` are separate reads, so a key can be reported present
/// and then come back empty. That case is `Inconsistent` and is handled as a
/// miss.
#[derive(Debug)]
pub enum CacheRead {
    Hit(PriceRecord),
    Absent,
    Inconsistent,
}

/// Result of scanning a day already flagged complete.
enum DayScan {
    Complete(Vec<PriceRecord>),
    /// A minute vanished between the existence probe and the read.
    Inconsistent(NaiveTime),
}

pub struct HistoricalPricesUseCase {
    store: Arc<dyn PriceStore>,
    source: Arc<dyn PriceSource>,
    clock: Arc<dyn Clock>,
    day_fetch_concurrency: usize,
}

impl HistoricalPricesUseCase {
    pub fn new(
        store: Arc<dyn PriceStore>,
        source: Arc<dyn PriceSource>,
        clock: Arc<dyn Clock>,
        day_fetch_concurrency: usize,
    ) -> Self {
        Self {
            store,
            source,
            clock,
            day_fetch_concurrency: day_fetch_concurrency.max(1),
        }
    }

    /// Exact-date query. `date` is compact `YYYYMMDD`; a malformed date yields
    /// an empty result rather than an error.
    #[instrument(skip(self))]
    pub async fn for_date(
        &self,
        symbol: &str,
        range: &ChartRange,
        date: &str,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        let Some(day) = parse_compact(date) else {
            warn!(symbol, date, "malformed date, returning empty result");
            return Ok(Vec::new());
        };
        self.for_day(symbol, range, day).await
    }

    /// Symbolic-range query anchored on yesterday. The provider has no
    /// same-day data.
    #[instrument(skip(self))]
    pub async fn for_range(
        &self,
        symbol: &str,
        range: &ChartRange,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        let today = self.clock.today();
        let anchor = today.pred_opt().unwrap_or(today);

        let one_month = ChartRange::OneMonth;
        let range = match range {
            ChartRange::OneDay => return self.for_day(symbol, range, anchor).await,
            ChartRange::ByDate => {
                debug!(symbol, "date token without a date, using one month");
                &one_month
            }
            other => other,
        };

        let lower_bound = range.lower_bound(anchor);
        let mut records = Vec::new();
        let mut missing = Vec::new();

        for day in days_back(anchor, lower_bound) {
            let key = PriceKey::new(symbol, day, MinuteSlot::DayAggregate);
            match self.read_cached(&key)? {
                CacheRead::Hit(record) => records.push(record),
                CacheRead::Absent | CacheRead::Inconsistent => missing.push(day),
            }
        }

        if records.is_empty() {
            info!(symbol, range = %range, "no cached days, fetching whole range");
            let fetched = self.source.fetch_range(symbol, range).await?;
            return self.persist_days(symbol, fetched);
        }

        debug!(
            symbol,
            cached = records.len(),
            missing = missing.len(),
            "partial range hit"
        );
        let fetched = self.fetch_missing_days(symbol, &missing).await?;
        records.extend(fetched);
        Ok(records)
    }

    /// Bare-symbol query: one month of daily data.
    pub async fn for_symbol(&self, symbol: &str) -> Result<Vec<PriceRecord>, DomainError> {
        self.for_range(symbol, &ChartRange::OneMonth).await
    }

    async fn for_day(
        &self,
        symbol: &str,
        range: &ChartRange,
        day: NaiveDate,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        let marker = PriceKey::new(symbol, day, MinuteSlot::CompletenessMarker);

        if self.store.exists(&marker)? {
            match self.scan_trading_day(symbol, day)? {
                DayScan::Complete(records) => {
                    debug!(symbol, date = %format_canonical(day), points = records.len(), "served day from cache");
                    return Ok(records);
                }
                DayScan::Inconsistent(minute) => {
                    warn!(
                        symbol,
                        date = %format_canonical(day),
                        minute = %minute,
                        "cached minute vanished during read, re-fetching day"
                    );
                }
            }
        }

        let fetched = self.source.fetch_for_date(symbol, range, day).await?;
        info!(symbol, date = %format_canonical(day), points = fetched.len(), "fetched day from source");

        let mut persisted = Vec::with_capacity(fetched.len());
        for record in fetched {
            let minute = record.minute();
            persisted.push(self.store.upsert(&record.rekeyed(symbol, minute))?);
        }
        Ok(persisted)
    }

    /// Read every stored minute of a day flagged complete. Minutes that were
    /// never stored are skipped; nothing is synthesized.
    fn scan_trading_day(&self, symbol: &str, day: NaiveDate) -> Result<DayScan, DomainError> {
        let mut records = Vec::with_capacity(TRADING_MINUTES_PER_DAY);
        for minute in trading_minutes() {
            let key = PriceKey::new(symbol, day, MinuteSlot::Minute(minute));
            match self.read_cached(&key)? {
                CacheRead::Hit(record) => records.push(record),
                CacheRead::Absent => {}
                CacheRead::Inconsistent => return Ok(DayScan::Inconsistent(minute)),
            }
        }
        Ok(DayScan::Complete(records))
    }

    /// Existence probe followed by a point read.
    pub fn read_cached(&self, key: &PriceKey) -> Result<CacheRead, DomainError> {
        if !self.store.exists(key)? {
            return Ok(CacheRead::Absent);
        }
        match self.store.get(key)? {
            Some(record) => Ok(CacheRead::Hit(record)),
            None => {
                warn!(
                    symbol = %key.symbol,
                    date = %format_canonical(key.date),
                    minute = %key.minute,
                    "key reported present but read returned nothing"
                );
                Ok(CacheRead::Inconsistent)
            }
        }
    }

    /// Fetch each missing day with bounded concurrency. Results come back in
    /// the order of `missing` and are persisted in that order; the first
    /// failure stops the merge and propagates.
    async fn fetch_missing_days(
        &self,
        symbol: &str,
        missing: &[NaiveDate],
    ) -> Result<Vec<PriceRecord>, DomainError> {
        let mut fetches = std::pin::pin!(stream::iter(missing.iter().copied())
            .map(|day| async move {
                let granularity = ChartRange::OneMonth;
                let result = self.source.fetch_by_day(symbol, &granularity, day).await;
                (day, result)
            })
            .buffered(self.day_fetch_concurrency));

        let mut merged = Vec::new();
        while let Some((day, result)) = fetches.next().await {
            let fetched = result.map_err(|e| {
                warn!(symbol, date = %format_canonical(day), error = %e, "day fetch failed");
                e
            })?;
            merged.extend(self.persist_days(symbol, fetched)?);
        }
        Ok(merged)
    }

    /// Persist at day granularity, discarding any provider minute.
    fn persist_days(
        &self,
        symbol: &str,
        fetched: Vec<PriceRecord>,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        fetched
            .into_iter()
            .map(|record| {
                self.store
                    .upsert(&record.rekeyed(symbol, MinuteSlot::DayAggregate))
            })
            .collect()
    }
}
