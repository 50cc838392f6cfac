//! Shared test helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use pricecache::config::CacheConfig;
use pricecache::domain::entities::price_record::{PriceKey, PriceRecord};
use pricecache::domain::entities::reference::{LastTradedPrice, ListedSymbol};
use pricecache::domain::error::DomainError;
use pricecache::domain::ports::clock::Clock;
use pricecache::domain::ports::price_source::PriceSource;
use pricecache::domain::ports::reference_data::ReferenceDataSource;
use pricecache::domain::values::chart_range::ChartRange;
use pricecache::domain::values::minute_slot::MinuteSlot;
use pricecache::PriceCache;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn record(symbol: &str, date: NaiveDate, minute: MinuteSlot, close: Decimal) -> PriceRecord {
    PriceRecord::new(
        PriceKey::new(symbol, date, minute),
        Some(close - Decimal::ONE),
        Some(close + Decimal::ONE),
        Some(close - Decimal::TWO),
        Some(close),
        Decimal::new(46691331, 0),
    )
}

/// A minute with no trades: every price null, zero volume.
pub fn untraded(symbol: &str, date: NaiveDate, minute: MinuteSlot) -> PriceRecord {
    PriceRecord::new(
        PriceKey::new(symbol, date, minute),
        None,
        None,
        None,
        None,
        Decimal::ZERO,
    )
}

/// Close price derived from the calendar day so fetched records are
/// recognizable.
pub fn close_for(day: NaiveDate) -> Decimal {
    Decimal::new(day.format("%m%d").to_string().parse::<i64>().unwrap(), 2)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceCall {
    ForDate(String, ChartRange, NaiveDate),
    Range(String, ChartRange),
    Latest(String),
    ByDay(String, ChartRange, NaiveDate),
}

/// Scripted price source that records every call.
#[derive(Default)]
pub struct MockSource {
    calls: Mutex<Vec<SourceCall>>,
    day_minutes: Mutex<HashMap<NaiveDate, Vec<PriceRecord>>>,
    range_points: Mutex<Vec<PriceRecord>>,
    failing_days: Mutex<HashSet<NaiveDate>>,
}

impl MockSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_day(&self, day: NaiveDate, records: Vec<PriceRecord>) {
        self.day_minutes.lock().unwrap().insert(day, records);
    }

    pub fn with_range(&self, records: Vec<PriceRecord>) {
        *self.range_points.lock().unwrap() = records;
    }

    pub fn fail_on(&self, day: NaiveDate) {
        self.failing_days.lock().unwrap().insert(day);
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn by_day_calls(&self) -> Vec<NaiveDate> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SourceCall::ByDay(_, _, day) => Some(day),
                _ => None,
            })
            .collect()
    }

    pub fn range_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SourceCall::Range(..)))
            .count()
    }

    fn record_call(&self, call: SourceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PriceSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_for_date(
        &self,
        symbol: &str,
        range: &ChartRange,
        date: NaiveDate,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        self.record_call(SourceCall::ForDate(symbol.into(), range.clone(), date));
        Ok(self
            .day_minutes
            .lock()
            .unwrap()
            .get(&date)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_range(
        &self,
        symbol: &str,
        range: &ChartRange,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        self.record_call(SourceCall::Range(symbol.into(), range.clone()));
        Ok(self.range_points.lock().unwrap().clone())
    }

    async fn fetch_latest(&self, symbol: &str) -> Result<Vec<PriceRecord>, DomainError> {
        self.record_call(SourceCall::Latest(symbol.into()));
        Ok(self.range_points.lock().unwrap().clone())
    }

    /// One aggregate per day, carrying a provider minute that must not be kept.
    async fn fetch_by_day(
        &self,
        symbol: &str,
        granularity: &ChartRange,
        day: NaiveDate,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        self.record_call(SourceCall::ByDay(symbol.into(), granularity.clone(), day));
        if self.failing_days.lock().unwrap().contains(&day) {
            return Err(DomainError::Source(format!("upstream unavailable for {day}")));
        }
        Ok(vec![record(
            symbol,
            day,
            MinuteSlot::Minute(hm(15, 59)),
            close_for(day),
        )])
    }
}

#[derive(Default)]
pub struct MockReference {
    pub calls: Mutex<usize>,
}

#[async_trait]
impl ReferenceDataSource for MockReference {
    async fn list_symbols(&self) -> Result<Vec<ListedSymbol>, DomainError> {
        *self.calls.lock().unwrap() += 1;
        Ok(vec![ListedSymbol {
            symbol: "A".into(),
            name: Some("Agilent Technologies Inc.".into()),
            date: None,
            is_enabled: Some(true),
        }])
    }

    async fn last_traded_prices(
        &self,
        symbols: &[String],
    ) -> Result<Vec<LastTradedPrice>, DomainError> {
        *self.calls.lock().unwrap() += 1;
        Ok(symbols
            .iter()
            .map(|s| LastTradedPrice {
                symbol: s.to_uppercase(),
                price: Decimal::new(1863011, 4),
                size: None,
                time: None,
            })
            .collect())
    }
}

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Today is 2021-06-28, so range queries anchor on 2021-06-27.
pub fn today() -> NaiveDate {
    ymd(2021, 6, 28)
}

pub fn setup_with(config: &CacheConfig, source: Arc<MockSource>) -> PriceCache {
    PriceCache::with_providers(
        config,
        source,
        Arc::new(MockReference::default()),
        Arc::new(FixedClock(today())),
    )
    .unwrap()
}

pub fn setup(source: Arc<MockSource>) -> PriceCache {
    setup_with(&CacheConfig::in_memory(), source)
}
