pub mod historical_prices;
pub mod market_data;
