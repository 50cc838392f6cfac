use crate::domain::values::minute_slot::MinuteSlot;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Identity of a stored price point. Immutable once the record is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PriceKey {
    pub symbol: String,
    pub date: NaiveDate,
    pub minute: MinuteSlot,
}

impl PriceKey {
    /// Symbols are always keyed uppercase.
    pub fn new(symbol: &str, date: NaiveDate, minute: MinuteSlot) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            date,
            minute,
        }
    }
}

/// One OHLCV point. Prices stay in `Decimal` end to end.
///
/// A minute with no trades has no prices but is still a real point and is
/// stored like any other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRecord {
    #[serde(flatten)]
    pub key: PriceKey,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Option<Decimal>,
    pub volume: Decimal,
}

impl PriceRecord {
    pub fn new(
        key: PriceKey,
        open: Option<Decimal>,
        high: Option<Decimal>,
        low: Option<Decimal>,
        close: Option<Decimal>,
        volume: Decimal,
    ) -> Self {
        Self {
            key,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.key.symbol
    }

    pub fn date(&self) -> NaiveDate {
        self.key.date
    }

    pub fn minute(&self) -> MinuteSlot {
        self.key.minute
    }

    /// Same values under another symbol/slot. Used when a provider point is
    /// filed under the requested symbol or collapsed to day granularity.
    pub fn rekeyed(self, symbol: &str, minute: MinuteSlot) -> Self {
        Self {
            key: PriceKey::new(symbol, self.key.date, minute),
            ..self
        }
    }
}
