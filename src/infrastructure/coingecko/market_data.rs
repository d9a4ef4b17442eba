//! CoinGecko historical data
//!
//! Daily USD closes from the `/coins/{id}/market_chart` endpoint. Every request
//! is preceded by a fixed pause to stay under the public rate limit.

use crate::domain::errors::MarketDataError;
use crate::domain::market::PricePoint;
use crate::domain::ports::HistoricalDataFetcher;
use crate::infrastructure::core::HttpClientFactory;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    /// `[timestamp_ms, price]` pairs.
    prices: Vec<(f64, f64)>,
}

pub struct CoinGeckoHistoricalDataFetcher {
    client: Client,
    base_url: String,
    request_delay: Duration,
    /// Catalog symbol to CoinGecko coin id.
    provider_ids: HashMap<String, String>,
}

impl CoinGeckoHistoricalDataFetcher {
    pub fn builder() -> CoinGeckoHistoricalDataFetcherBuilder {
        CoinGeckoHistoricalDataFetcherBuilder::default()
    }

    /// CoinGecko id for `symbol`. Unmapped symbols are sent lowercased.
    pub fn provider_id(&self, symbol: &str) -> String {
        self.provider_ids
            .get(&symbol.to_uppercase())
            .cloned()
            .unwrap_or_else(|| symbol.to_lowercase())
    }

    fn market_chart_url(&self, provider_id: &str) -> String {
        format!(
            "{}/coins/{}/market_chart",
            self.base_url.trim_end_matches('/'),
            provider_id
        )
    }

    async fn try_fetch(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let url = self.market_chart_url(&self.provider_id(symbol));

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        debug!("CoinGecko: GET {} (days={})", url, lookback_days);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", "usd".to_string()),
                ("days", lookback_days.to_string()),
                ("interval", "daily".to_string()),
            ])
            .send()
            .await
            .map_err(|e| MarketDataError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| MarketDataError::Transport {
                reason: e.to_string(),
            })?;

        parse_market_chart(&body)
    }
}

#[async_trait]
impl HistoricalDataFetcher for CoinGeckoHistoricalDataFetcher {
    async fn fetch(&self, symbol: &str, lookback_days: u32) -> Option<Vec<PricePoint>> {
        match self.try_fetch(symbol, lookback_days).await {
            Ok(points) => {
                info!(
                    "CoinGecko: fetched {} daily closes for {}",
                    points.len(),
                    symbol
                );
                Some(points)
            }
            Err(e) => {
                error!("CoinGecko: error fetching data for {}: {}", symbol, e);
                None
            }
        }
    }
}

/// Decodes a `market_chart` body into chronologically ordered points.
pub fn parse_market_chart(body: &str) -> Result<Vec<PricePoint>, MarketDataError> {
    let response: MarketChartResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::MalformedPayload {
            reason: e.to_string(),
        })?;

    if response.prices.is_empty() {
        return Err(MarketDataError::EmptySeries);
    }

    let mut points = response
        .prices
        .into_iter()
        .map(|(ts, price)| {
            if !ts.is_finite() || !price.is_finite() {
                return Err(MarketDataError::MalformedPayload {
                    reason: format!("non-finite entry [{}, {}]", ts, price),
                });
            }
            PricePoint::from_millis(ts as i64, price).ok_or_else(|| {
                MarketDataError::MalformedPayload {
                    reason: format!("timestamp out of range: {}", ts),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    points.sort_by_key(|p| p.timestamp);
    Ok(points)
}

#[derive(Default)]
pub struct CoinGeckoHistoricalDataFetcherBuilder {
    base_url: Option<String>,
    request_delay: Option<Duration>,
    provider_ids: Option<HashMap<String, String>>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl CoinGeckoHistoricalDataFetcherBuilder {
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = Some(delay);
        self
    }

    pub fn provider_ids(mut self, provider_ids: HashMap<String, String>) -> Self {
        self.provider_ids = Some(provider_ids);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }

    pub fn build(self) -> CoinGeckoHistoricalDataFetcher {
        let client = HttpClientFactory::create_client(
            self.timeout.unwrap_or(Duration::from_secs(30)),
            self.connect_timeout.unwrap_or(Duration::from_secs(10)),
        );

        CoinGeckoHistoricalDataFetcher {
            client,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_delay: self.request_delay.unwrap_or(Duration::from_secs(1)),
            provider_ids: self
                .provider_ids
                .unwrap_or_default()
                .into_iter()
                .map(|(symbol, id)| (symbol.to_uppercase(), id))
                .collect(),
        }
    }
}
