//! Market-data provider configuration parsing from environment variables.

use super::{EnvLookup, parse_u64};
use anyhow::Result;

/// Market-data provider environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketDataEnvConfig {
    pub base_url: String,
    /// Fixed pause before every provider request.
    pub fetch_delay_ms: u64,
    pub http_timeout_secs: u64,
    pub http_connect_timeout_secs: u64,
}

impl Default for MarketDataEnvConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            fetch_delay_ms: 1000,
            http_timeout_secs: 30,
            http_connect_timeout_secs: 10,
        }
    }
}

impl MarketDataEnvConfig {
    pub fn from_lookup(lookup: &EnvLookup) -> Result<Self> {
        let defaults = Self::default();

        let http_timeout_secs =
            parse_u64(lookup, "HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?;
        if http_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be greater than 0");
        }

        Ok(Self {
            base_url: lookup("COINGECKO_BASE_URL").unwrap_or(defaults.base_url),
            fetch_delay_ms: parse_u64(lookup, "FETCH_DELAY_MS", defaults.fetch_delay_ms)?,
            http_timeout_secs,
            http_connect_timeout_secs: parse_u64(
                lookup,
                "HTTP_CONNECT_TIMEOUT_SECS",
                defaults.http_connect_timeout_secs,
            )?,
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
    fn test_market_data_config_defaults() {
        let config = MarketDataEnvConfig::from_lookup(&lookup_from(&[])).unwrap();
        assert_eq!(config, MarketDataEnvConfig::default());
        assert_eq!(config.fetch_delay_ms, 1000);
    }

    #[test]
    fn test_market_data_config_overrides() {
        let config = MarketDataEnvConfig::from_lookup(&lookup_from(&[
            ("COINGECKO_BASE_URL", "http://localhost:9000"),
            ("FETCH_DELAY_MS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.fetch_delay_ms, 0);
    }

    #[test]
    fn test_market_data_config_rejects_garbage() {
        assert!(MarketDataEnvConfig::from_lookup(&lookup_from(&[("FETCH_DELAY_MS", "soon")])).is_err());
        assert!(MarketDataEnvConfig::from_lookup(&lookup_from(&[("HTTP_TIMEOUT_SECS", "0")])).is_err());
    }
}
