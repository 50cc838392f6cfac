pub mod chart_range;
pub mod market_date;
pub mod minute_slot;
