//! Configuration module for coinforecast.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Market Data, Forecasting, and the static Catalog.

mod catalog_config;
mod forecast_config;
mod market_data_config;

pub use catalog_config::{load_catalog_file, parse_catalog};
pub use forecast_config::ForecastEnvConfig;
pub use market_data_config::MarketDataEnvConfig;

use crate::application::forecast::SyntheticFallback;
use crate::application::ml::TrainerConfig;
use crate::application::service::ServiceLimits;
use crate::domain::catalog::{AssetCatalog, CurrencyTable};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Source of configuration values, keyed by environment variable name.
pub type EnvLookup = dyn Fn(&str) -> Option<String>;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub market_data: MarketDataEnvConfig,
    pub forecast: ForecastEnvConfig,
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    pub fn from_lookup(lookup: &EnvLookup) -> Result<Self> {
        let market_data =
            MarketDataEnvConfig::from_lookup(lookup).context("Failed to load market data config")?;
        let forecast =
            ForecastEnvConfig::from_lookup(lookup).context("Failed to load forecast config")?;
        let catalog_path = lookup("CATALOG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            market_data,
            forecast,
            catalog_path,
        })
    }

    /// Catalog and currency table from `CATALOG_PATH`, or the built-in ones.
    pub fn load_catalog(&self) -> Result<(AssetCatalog, CurrencyTable)> {
        match &self.catalog_path {
            Some(path) => load_catalog_file(path),
            None => Ok((AssetCatalog::default(), CurrencyTable::default())),
        }
    }

    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            lookback_days: self.forecast.lookback_days,
            min_training_rows: self.forecast.min_training_rows,
        }
    }

    pub fn fallback(&self) -> SyntheticFallback {
        SyntheticFallback::new(
            self.forecast.fallback_trend_end,
            self.forecast.fallback_noise_std,
        )
    }

    pub fn service_limits(&self) -> ServiceLimits {
        ServiceLimits {
            max_horizon_days: self.forecast.max_horizon_days,
            default_train_batch: self.forecast.default_train_batch,
        }
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.market_data.fetch_delay_ms)
    }
}

fn parse_u32(lookup: &EnvLookup, key: &str, default: u32) -> Result<u32> {
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<u32>()
        .context(format!("Failed to parse {}", key))
}

fn parse_u64(lookup: &EnvLookup, key: &str, default: u64) -> Result<u64> {
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<u64>()
        .context(format!("Failed to parse {}", key))
}

fn parse_usize(lookup: &EnvLookup, key: &str, default: usize) -> Result<usize> {
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<usize>()
        .context(format!("Failed to parse {}", key))
}

fn parse_f64(lookup: &EnvLookup, key: &str, default: f64) -> Result<f64> {
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<f64>()
        .context(format!("Failed to parse {}", key))
}
