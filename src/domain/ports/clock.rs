use chrono::NaiveDate;

/// Source of "today" for range anchoring.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
