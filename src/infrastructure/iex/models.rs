use crate::domain::entities::price_record::{PriceKey, PriceRecord};
use crate::domain::values::market_date::{parse_any, parse_minute};
use crate::domain::values::minute_slot::MinuteSlot;
use rust_decimal::Decimal;

/// One point of an IEX `/chart` response. Only the consumed fields are kept.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChartPoint {
    pub date: String,
    #[serde(default)]
    pub minute: Option<String>,
    #[serde(default)]
    pub open: Option<Decimal>,
    #[serde(default)]
    pub high: Option<Decimal>,
    #[serde(default)]
    pub low: Option<Decimal>,
    #[serde(default)]
    pub close: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<Decimal>,
}

impl ChartPoint {
    /// Convert into a record keyed under `symbol`. Intervals without trades
    /// keep their null prices; only an unreadable date or minute yields
    /// `None`.
    pub fn into_record(self, symbol: &str) -> Option<PriceRecord> {
        let date = parse_any(&self.date)?;
        let minute = match self.minute.as_deref() {
            Some(raw) => MinuteSlot::Minute(parse_minute(raw)?),
            None => MinuteSlot::DayAggregate,
        };
        Some(PriceRecord::new(
            PriceKey::new(symbol, date, minute),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume.unwrap_or(Decimal::ZERO),
        ))
    }
}
