use crate::domain::error::DomainError;
use crate::domain::values::market_date::{format_minute, parse_minute};
use chrono::NaiveTime;
use serde::{Serialize, Serializer};
use std::fmt;

/// Stored text for a day-level aggregate point.
const DAY_AGGREGATE: &str = "00:00";
/// Minute probed to decide whether a day has been back-filled minute by minute.
const COMPLETENESS_MARKER: &str = "10:50";

/// The third component of a price key: which point within a day it names.
///
/// `CompletenessMarker` is only ever probed, never written. It encodes to the
/// same text as the 10:50 minute bar, which a full-day intraday fetch always
/// persists, so its presence means the whole day was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinuteSlot {
    Minute(NaiveTime),
    DayAggregate,
    CompletenessMarker,
}

impl MinuteSlot {
    /// Decode stored text. `00:00` is always the day aggregate; every other
    /// valid `HH:MM` is a minute bar.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw == DAY_AGGREGATE {
            return Ok(MinuteSlot::DayAggregate);
        }
        parse_minute(raw)
            .map(MinuteSlot::Minute)
            .ok_or_else(|| DomainError::Parse(format!("Invalid minute: {raw}")))
    }

    pub fn is_day_aggregate(&self) -> bool {
        matches!(self, MinuteSlot::DayAggregate)
    }
}

impl fmt::Display for MinuteSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinuteSlot::Minute(time) => write!(f, "{}", format_minute(*time)),
            MinuteSlot::DayAggregate => write!(f, "{DAY_AGGREGATE}"),
            MinuteSlot::CompletenessMarker => write!(f, "{COMPLETENESS_MARKER}"),
        }
    }
}

impl Serialize for MinuteSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
