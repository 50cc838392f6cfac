//! IEX Cloud client. Implements both the historical [`PriceSource`] and the
//! uncached [`ReferenceDataSource`] calls.

mod models;

use crate::domain::entities::price_record::PriceRecord;
use crate::domain::entities::reference::{LastTradedPrice, ListedSymbol};
use crate::domain::error::DomainError;
use crate::domain::ports::price_source::PriceSource;
use crate::domain::ports::reference_data::ReferenceDataSource;
use crate::domain::values::chart_range::ChartRange;
use crate::domain::values::market_date::format_compact;
use async_trait::async_trait;
use chrono::NaiveDate;
use models::ChartPoint;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://cloud.iexapis.com/stable";

#[derive(Debug)]
pub enum IexError {
    /// HTTP or network error
    Network(String),
    /// Response parsing error
    Parse(String),
    /// Client construction error
    Config(String),
}

impl std::fmt::Display for IexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IexError::Network(msg) => write!(f, "Network error: {msg}"),
            IexError::Parse(msg) => write!(f, "Parse error: {msg}"),
            IexError::Config(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for IexError {}

impl From<IexError> for DomainError {
    fn from(e: IexError) -> Self {
        DomainError::Source(e.to_string())
    }
}

pub struct IexClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl IexClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self, IexError> {
        let client = reqwest::Client::builder()
            .user_agent("pricecache/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| IexError::Config(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn chart_url(&self, symbol: &str, segments: &[&str]) -> String {
        let mut url = format!("{}/stock/{}/chart", self.base_url, symbol.to_uppercase());
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, IexError> {
        let mut request = self.client.get(url).query(query);
        if let Some(token) = &self.token {
            request = request.query(&[("token", token)]);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| IexError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(IexError::Network(format!(
                "IEX returned {} for {url}",
                resp.status()
            )));
        }

        resp.json().await.map_err(|e| IexError::Parse(e.to_string()))
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Vec<PriceRecord>, IexError> {
        let url = self.chart_url(symbol, segments);
        let points: Vec<ChartPoint> = self.get_json(&url, query).await?;
        let received = points.len();
        let records: Vec<PriceRecord> = points
            .into_iter()
            .filter_map(|p| p.into_record(symbol))
            .collect();
        debug!(
            symbol,
            url = %url,
            received,
            kept = records.len(),
            "fetched chart"
        );
        Ok(records)
    }
}

#[async_trait]
impl PriceSource for IexClient {
    fn name(&self) -> &str {
        "iex_cloud"
    }

    async fn fetch_for_date(
        &self,
        symbol: &str,
        range: &ChartRange,
        date: NaiveDate,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        let day = format_compact(date);
        Ok(self.fetch_chart(symbol, &[range.as_str(), day.as_str()], &[]).await?)
    }

    async fn fetch_range(
        &self,
        symbol: &str,
        range: &ChartRange,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        Ok(self.fetch_chart(symbol, &[range.as_str()], &[]).await?)
    }

    async fn fetch_latest(&self, symbol: &str) -> Result<Vec<PriceRecord>, DomainError> {
        Ok(self.fetch_chart(symbol, &[], &[]).await?)
    }

    async fn fetch_by_day(
        &self,
        symbol: &str,
        granularity: &ChartRange,
        day: NaiveDate,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        let compact = format_compact(day);
        Ok(self
            .fetch_chart(
                symbol,
                &[granularity.as_str(), compact.as_str()],
                &[("chartByDay", "true".to_string())],
            )
            .await?)
    }
}

#[async_trait]
impl ReferenceDataSource for IexClient {
    async fn list_symbols(&self) -> Result<Vec<ListedSymbol>, DomainError> {
        let url = format!("{}/ref-data/symbols", self.base_url);
        Ok(self.get_json(&url, &[]).await?)
    }

    async fn last_traded_prices(
        &self,
        symbols: &[String],
    ) -> Result<Vec<LastTradedPrice>, DomainError> {
        let url = format!("{}/tops/last", self.base_url);
        let joined = symbols
            .iter()
            .map(|s| s.to_uppercase())
            .collect::<Vec<_>>()
            .join(",");
        Ok(self.get_json(&url, &[("symbols", joined)]).await?)
    }
}
