//! Date and minute encodings shared by the store, the provider client and the
//! reconciliation engine.
//!
//! Request-facing dates are compact (`YYYYMMDD`); stored dates are canonical
//! (`YYYY-MM-DD`); minutes are zero-padded 24-hour `HH:MM`.

use chrono::{NaiveDate, NaiveTime};

pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";
pub const MINUTE_FORMAT: &str = "%H:%M";

/// First minute of the regular session (09:30), in minutes since midnight.
const SESSION_OPEN: u32 = 9 * 60 + 30;
/// Last minute of the regular session (16:00), inclusive.
const SESSION_CLOSE: u32 = 16 * 60;

/// Number of points in a fully materialized trading day.
pub const TRADING_MINUTES_PER_DAY: usize = (SESSION_CLOSE - SESSION_OPEN + 1) as usize;

/// Parse a compact `YYYYMMDD` date. Anything that is not exactly eight ASCII
/// digits naming a real calendar day yields `None`.
pub fn parse_compact(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(raw, COMPACT_DATE_FORMAT).ok()
}

pub fn format_compact(date: NaiveDate) -> String {
    date.format(COMPACT_DATE_FORMAT).to_string()
}

pub fn format_canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}

/// Parse a date in either canonical or compact form. Providers are not
/// consistent about which one they send back.
pub fn parse_any(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, CANONICAL_DATE_FORMAT)
        .ok()
        .or_else(|| parse_compact(raw))
}

pub fn parse_minute(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, MINUTE_FORMAT).ok()
}

pub fn format_minute(time: NaiveTime) -> String {
    time.format(MINUTE_FORMAT).to_string()
}

/// Every minute of the regular session, 09:30 through 16:00 inclusive.
pub fn trading_minutes() -> impl Iterator<Item = NaiveTime> {
    (SESSION_OPEN..=SESSION_CLOSE).filter_map(|m| NaiveTime::from_hms_opt(m / 60, m % 60, 0))
}

/// Walk calendar days from `anchor` (inclusive) back to `lower_bound`
/// (exclusive), newest first.
pub fn days_back(anchor: NaiveDate, lower_bound: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(anchor), |d| d.pred_opt()).take_while(move |d| *d > lower_bound)
}
