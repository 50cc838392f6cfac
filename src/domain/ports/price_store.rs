use crate::domain::entities::price_record::{PriceKey, PriceRecord};
use crate::domain::error::DomainError;

/// Persistent table of price points keyed by `(symbol, date, minute)`.
///
/// `exists` and `get` are independent reads with no transactional link, so a
/// caller must tolerate `exists == true` followed by `get == None`.
pub trait PriceStore: Send + Sync {
    fn exists(&self, key: &PriceKey) -> Result<bool, DomainError>;
    /// `None` means not stored, not an error.
    fn get(&self, key: &PriceKey) -> Result<Option<PriceRecord>, DomainError>;
    /// Insert or overwrite the record under its key.
    fn upsert(&self, record: &PriceRecord) -> Result<PriceRecord, DomainError>;
    /// Number of stored points for a symbol, all granularities.
    fn count(&self, symbol: &str) -> Result<usize, DomainError>;
}
