use crate::domain::ports::clock::Clock;
use chrono::NaiveDate;

/// Wall clock in UTC.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}
