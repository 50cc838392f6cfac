//! Environment-driven configuration.

use crate::domain::error::DomainError;
use crate::infrastructure::iex::DEFAULT_BASE_URL;
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "./pricecache.db";
pub const DEFAULT_DAY_FETCH_CONCURRENCY: usize = 4;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// SQLite path, or `:memory:`.
    pub db_path: String,
    pub iex_base_url: String,
    pub iex_token: Option<String>,
    /// Upper bound on in-flight per-day fetches during a partial-hit range query.
    pub day_fetch_concurrency: usize,
    pub http_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.into(),
            iex_base_url: DEFAULT_BASE_URL.into(),
            iex_token: None,
            day_fetch_concurrency: DEFAULT_DAY_FETCH_CONCURRENCY,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CacheConfig::default`] but backed by an in-memory database.
    pub fn in_memory() -> Self {
        Self {
            db_path: ":memory:".into(),
            ..Self::default()
        }
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let defaults = Self::default();

        let day_fetch_concurrency = match lookup("PRICECACHE_DAY_FETCH_CONCURRENCY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(DomainError::InvalidInput(format!(
                        "PRICECACHE_DAY_FETCH_CONCURRENCY must be a positive integer, got '{raw}'"
                    )))
                }
            },
            None => defaults.day_fetch_concurrency,
        };

        let http_timeout = match lookup("PRICECACHE_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|_| {
                DomainError::InvalidInput(format!(
                    "PRICECACHE_HTTP_TIMEOUT_SECS must be a number of seconds, got '{raw}'"
                ))
            })?),
            None => defaults.http_timeout,
        };

        Ok(Self {
            db_path: lookup("PRICECACHE_DB").unwrap_or(defaults.db_path),
            iex_base_url: lookup("PRICECACHE_IEX_BASE_URL").unwrap_or(defaults.iex_base_url),
            iex_token: lookup("PRICECACHE_IEX_TOKEN").filter(|t| !t.is_empty()),
            day_fetch_concurrency,
            http_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CacheConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.db_path, DEFAULT_DB_PATH);
        assert_eq!(config.iex_base_url, DEFAULT_BASE_URL);
        assert!(config.iex_token.is_none());
        assert_eq!(config.day_fetch_concurrency, DEFAULT_DAY_FETCH_CONCURRENCY);
    }

    #[test]
    fn test_overrides() {
        let config = CacheConfig::from_lookup(lookup_from(&[
            ("PRICECACHE_DB", "/tmp/prices.db"),
            ("PRICECACHE_IEX_TOKEN", "pk_test"),
            ("PRICECACHE_DAY_FETCH_CONCURRENCY", "1"),
            ("PRICECACHE_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, "/tmp/prices.db");
        assert_eq!(config.iex_token.as_deref(), Some("pk_test"));
        assert_eq!(config.day_fetch_concurrency, 1);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let result = CacheConfig::from_lookup(lookup_from(&[("PRICECACHE_DAY_FETCH_CONCURRENCY", "0")]));
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_bad_timeout() {
        let result = CacheConfig::from_lookup(lookup_from(&[("PRICECACHE_HTTP_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }
}
