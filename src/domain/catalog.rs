use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A supported asset: its reference USD price and the market-data provider's id for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetListing {
    pub symbol: String,
    pub base_price_usd: f64,
    #[serde(default)]
    pub provider_id: Option<String>,
}

impl AssetListing {
    pub fn new(symbol: &str, base_price_usd: f64, provider_id: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            base_price_usd,
            provider_id: Some(provider_id.to_string()),
        }
    }
}

/// Fixed, ordered catalog of forecastable assets.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetCatalog {
    assets: Vec<AssetListing>,
}

impl AssetCatalog {
    pub fn new(assets: Vec<AssetListing>) -> Self {
        Self { assets }
    }

    pub fn get(&self, symbol: &str) -> Option<&AssetListing> {
        self.assets.iter().find(|a| a.symbol == symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    pub fn base_price_usd(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).map(|a| a.base_price_usd)
    }

    /// Symbols in catalog order.
    pub fn symbols(&self) -> Vec<String> {
        self.assets.iter().map(|a| a.symbol.clone()).collect()
    }

    /// Symbol -> provider id for every listing that declares one.
    pub fn provider_ids(&self) -> HashMap<String, String> {
        self.assets
            .iter()
            .filter_map(|a| a.provider_id.clone().map(|id| (a.symbol.clone(), id)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new(vec![
            AssetListing::new("BTC", 30000.0, "bitcoin"),
            AssetListing::new("ETH", 2000.0, "ethereum"),
            AssetListing::new("FTT", 25.0, "ftx-token"),
            AssetListing::new("FXS", 8.0, "frax-share"),
            AssetListing::new("GALA", 0.02, "gala"),
            AssetListing::new("SOL", 120.0, "solana"),
            AssetListing::new("ADA", 0.4, "cardano"),
            AssetListing::new("DOT", 6.0, "polkadot"),
            AssetListing::new("AVAX", 30.0, "avalanche-2"),
            AssetListing::new("MATIC", 0.7, "matic-network"),
            AssetListing::new("LINK", 15.0, "chainlink"),
            AssetListing::new("XRP", 0.5, "ripple"),
            AssetListing::new("DOGE", 0.1, "dogecoin"),
            AssetListing::new("SHIB", 0.00001, "shiba-inu"),
            AssetListing::new("UNI", 7.0, "uniswap"),
            AssetListing::new("LTC", 70.0, "litecoin"),
            AssetListing::new("BCH", 250.0, "bitcoin-cash"),
            AssetListing::new("XLM", 0.1, "stellar"),
            AssetListing::new("ATOM", 9.0, "cosmos"),
            AssetListing::new("ALGO", 0.15, "algorand"),
        ])
    }
}

/// Units of currency per 1 USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub code: String,
    pub rate: f64,
}

/// Fixed, ordered currency-rate table used for linear price conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyTable {
    rates: Vec<CurrencyRate>,
}

impl CurrencyTable {
    pub fn new(rates: Vec<CurrencyRate>) -> Self {
        Self { rates }
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.iter().find(|r| r.code == code).map(|r| r.rate)
    }

    /// `price_usd × rate[code]`, or `None` for an unknown currency.
    pub fn convert(&self, price_usd: f64, code: &str) -> Option<f64> {
        self.rate(code).map(|rate| price_usd * rate)
    }

    pub fn codes(&self) -> Vec<String> {
        self.rates.iter().map(|r| r.code.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for CurrencyTable {
    fn default() -> Self {
        let rate = |code: &str, rate: f64| CurrencyRate {
            code: code.to_string(),
            rate,
        };
        Self::new(vec![
            rate("USD", 1.0),
            rate("EUR", 0.92),
            rate("GBP", 0.79),
            rate("JPY", 151.0),
            rate("INR", 83.5),
            rate("AUD", 1.52),
            rate("CAD", 1.37),
            rate("CHF", 0.90),
            rate("CNY", 7.23),
            rate("HKD", 7.82),
        ])
    }
}
