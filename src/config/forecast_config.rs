//! Forecasting configuration parsing from environment variables.
//!
//! Covers the training window, the request horizon limit and the shape of
//! the synthetic fallback path.

use super::{EnvLookup, parse_f64, parse_u32, parse_usize};
use anyhow::Result;

/// Forecasting environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEnvConfig {
    // Training
    pub lookback_days: u32,
    pub min_training_rows: usize,

    // Requests
    pub max_horizon_days: usize,
    pub default_train_batch: usize,

    // Synthetic fallback
    pub fallback_trend_end: f64,
    pub fallback_noise_std: f64,
}

impl Default for ForecastEnvConfig {
    fn default() -> Self {
        Self {
            lookback_days: 60,
            min_training_rows: 30,
            max_horizon_days: 365,
            default_train_batch: 5,
            fallback_trend_end: 0.2,
            fallback_noise_std: 0.01,
        }
    }
}

impl ForecastEnvConfig {
    pub fn from_lookup(lookup: &EnvLookup) -> Result<Self> {
        let d = Self::default();

        let config = Self {
            lookback_days: parse_u32(lookup, "LOOKBACK_DAYS", d.lookback_days)?,
            min_training_rows: parse_usize(lookup, "MIN_TRAINING_ROWS", d.min_training_rows)?,
            max_horizon_days: parse_usize(lookup, "MAX_HORIZON_DAYS", d.max_horizon_days)?,
            default_train_batch: parse_usize(
                lookup,
                "DEFAULT_TRAIN_BATCH",
                d.default_train_batch,
            )?,
            fallback_trend_end: parse_f64(lookup, "FALLBACK_TREND_END", d.fallback_trend_end)?,
            fallback_noise_std: parse_f64(lookup, "FALLBACK_NOISE_STD", d.fallback_noise_std)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lookback_days == 0 {
            anyhow::bail!("LOOKBACK_DAYS must be greater than 0");
        }
        if self.max_horizon_days == 0 {
            anyhow::bail!("MAX_HORIZON_DAYS must be greater than 0");
        }
        if !self.fallback_trend_end.is_finite() {
            anyhow::bail!("FALLBACK_TREND_END must be finite");
        }
        if !(self.fallback_noise_std.is_finite() && self.fallback_noise_std >= 0.0) {
            anyhow::bail!(
                "FALLBACK_NOISE_STD must be a non-negative number, got {}",
                self.fallback_noise_std
            );
        }
        Ok(())
    }
}
