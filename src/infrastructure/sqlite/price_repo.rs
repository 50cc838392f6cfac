use crate::domain::entities::price_record::{PriceKey, PriceRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::price_store::PriceStore;
use crate::domain::values::market_date::{format_canonical, parse_any};
use crate::domain::values::minute_slot::MinuteSlot;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Mutex;

const SELECT_COLS: &str = "symbol, date, minute, open, high, low, close, volume";

pub struct SqlitePriceRepo {
    conn: Mutex<Connection>,
}

impl SqlitePriceRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conversion_error(idx: usize, msg: String) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, msg.into())
    }

    fn decimal_at(row: &rusqlite::Row, idx: usize) -> Result<Decimal, rusqlite::Error> {
        let raw: String = row.get(idx)?;
        Self::parse_decimal(idx, &raw)
    }

    fn optional_decimal_at(row: &rusqlite::Row, idx: usize) -> Result<Option<Decimal>, rusqlite::Error> {
        let raw: Option<String> = row.get(idx)?;
        raw.map(|raw| Self::parse_decimal(idx, &raw)).transpose()
    }

    fn parse_decimal(idx: usize, raw: &str) -> Result<Decimal, rusqlite::Error> {
        Decimal::from_str(raw)
            .map_err(|e| Self::conversion_error(idx, format!("invalid decimal '{raw}': {e}")))
    }

    fn row_to_record(row: &rusqlite::Row) -> Result<PriceRecord, rusqlite::Error> {
        let symbol: String = row.get(0)?;
        let date_str: String = row.get(1)?;
        let minute_str: String = row.get(2)?;

        let date = parse_any(&date_str)
            .ok_or_else(|| Self::conversion_error(1, format!("invalid date '{date_str}'")))?;
        let minute = MinuteSlot::parse(&minute_str).map_err(|e| Self::conversion_error(2, e.to_string()))?;

        Ok(PriceRecord::new(
            PriceKey::new(&symbol, date, minute),
            Self::optional_decimal_at(row, 3)?,
            Self::optional_decimal_at(row, 4)?,
            Self::optional_decimal_at(row, 5)?,
            Self::optional_decimal_at(row, 6)?,
            Self::decimal_at(row, 7)?,
        ))
    }
}

impl PriceStore for SqlitePriceRepo {
    fn exists(&self, key: &PriceKey) -> Result<bool, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM historical_prices WHERE symbol = ?1 AND date = ?2 AND minute = ?3)",
            params![key.symbol, format_canonical(key.date), key.minute.to_string()],
            |row| row.get::<_, bool>(0),
        )
        .map_err(|e| DomainError::Database(format!("Existence check failed: {e}")))
    }

    fn get(&self, key: &PriceKey) -> Result<Option<PriceRecord>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        conn.query_row(
            &format!(
                "SELECT {SELECT_COLS} FROM historical_prices WHERE symbol = ?1 AND date = ?2 AND minute = ?3"
            ),
            params![key.symbol, format_canonical(key.date), key.minute.to_string()],
            Self::row_to_record,
        )
        .optional()
        .map_err(|e| DomainError::Database(format!("Failed to read price: {e}")))
    }

    fn upsert(&self, record: &PriceRecord) -> Result<PriceRecord, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        conn.execute(
            "INSERT INTO historical_prices (symbol, date, minute, open, high, low, close, volume, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(symbol, date, minute) DO UPDATE SET
                open = excluded.open,
                high = excluded.high,
                low = excluded.low,
                close = excluded.close,
                volume = excluded.volume,
                updated_at = excluded.updated_at",
            params![
                record.key.symbol,
                format_canonical(record.key.date),
                record.key.minute.to_string(),
                record.open.map(|d| d.to_string()),
                record.high.map(|d| d.to_string()),
                record.low.map(|d| d.to_string()),
                record.close.map(|d| d.to_string()),
                record.volume.to_string(),
                chrono::Utc::now().to_rfc3339(),
            ],
        ).map_err(|e| DomainError::Database(format!("Failed to upsert price: {e}")))?;
        Ok(record.clone())
    }

    fn count(&self, symbol: &str) -> Result<usize, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM historical_prices WHERE symbol = ?1",
                params![symbol.to_uppercase()],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(n as usize)
    }
}
