use chrono::{Days, Months, NaiveDate};
use std::fmt;

/// Symbolic chart range accepted by the provider.
///
/// Parsing is total and case-sensitive: anything that is not exactly one of
/// the provider tokens (`1Y` included) is kept verbatim in `Other` so it can
/// still be forwarded upstream, and it resolves like one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ChartRange {
    OneDay,
    FiveDays,
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    /// Single-date chart (`/chart/date/{YYYYMMDD}`). Only meaningful together
    /// with a date; a range query given this token runs as one month.
    ByDate,
    Other(String),
}

impl ChartRange {
    pub fn parse(token: &str) -> Self {
        match token {
            "1d" => ChartRange::OneDay,
            "5d" => ChartRange::FiveDays,
            "1m" => ChartRange::OneMonth,
            "3m" => ChartRange::ThreeMonths,
            "6m" => ChartRange::SixMonths,
            "1y" => ChartRange::OneYear,
            "2y" => ChartRange::TwoYears,
            "5y" => ChartRange::FiveYears,
            "date" => ChartRange::ByDate,
            _ => ChartRange::Other(token.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChartRange::OneDay => "1d",
            ChartRange::FiveDays => "5d",
            ChartRange::OneMonth => "1m",
            ChartRange::ThreeMonths => "3m",
            ChartRange::SixMonths => "6m",
            ChartRange::OneYear => "1y",
            ChartRange::TwoYears => "2y",
            ChartRange::FiveYears => "5y",
            ChartRange::ByDate => "date",
            ChartRange::Other(token) => token,
        }
    }

    /// Lower bound (exclusive) of the days covered by this range when counting
    /// back from `anchor`. Anything without its own offset, `1d` included,
    /// counts back one month. Never fails; an underflow clamps to the earliest
    /// representable date.
    pub fn lower_bound(&self, anchor: NaiveDate) -> NaiveDate {
        let bound = match self {
            ChartRange::FiveYears => anchor.checked_sub_months(Months::new(60)),
            ChartRange::TwoYears => anchor.checked_sub_months(Months::new(24)),
            ChartRange::OneYear => anchor.checked_sub_months(Months::new(12)),
            ChartRange::SixMonths => anchor.checked_sub_months(Months::new(6)),
            ChartRange::ThreeMonths => anchor.checked_sub_months(Months::new(3)),
            ChartRange::FiveDays => anchor.checked_sub_days(Days::new(5)),
            _ => anchor.checked_sub_months(Months::new(1)),
        };
        bound.unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ChartRange {
    fn from(token: &str) -> Self {
        ChartRange::parse(token)
    }
}
