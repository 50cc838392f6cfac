use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tradable symbol as listed by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedSymbol {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastTradedPrice {
    pub symbol: String,
    pub price: Decimal,
    #[serde(default)]
    pub size: Option<Decimal>,
    /// Epoch milliseconds of the trade.
    #[serde(default)]
    pub time: Option<i64>,
}
