use crate::application::forecast::{ForecastEngine, ModelCache, SyntheticFallback};
use crate::application::ml::{ModelTrainer, TrainerConfig};
use crate::domain::catalog::{AssetCatalog, CurrencyTable};
use crate::domain::errors::RequestValidationError;
use crate::domain::forecast::{
    ForecastRequest, ForecastResponse, HealthReport, PredictionPoint, SupportedCoins,
    SupportedCurrencies, TrainReport, TrainRequest,
};
use crate::domain::ports::HistoricalDataFetcher;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceLimits {
    pub max_horizon_days: usize,
    /// Catalog prefix trained when a batch request names no symbols.
    pub default_train_batch: usize,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            max_horizon_days: 365,
            default_train_batch: 5,
        }
    }
}

/// A forecast request that passed validation.
#[derive(Debug, Clone, PartialEq)]
struct ValidatedRequest {
    symbol: String,
    currency: String,
    days: usize,
    base_price_usd: f64,
    rate: f64,
}

/// Boundary between callers and the forecasting pipeline.
///
/// Only request-shape problems come back as errors. Everything past
/// validation degrades to the fallback tier instead of failing.
pub struct ForecastService {
    catalog: AssetCatalog,
    currencies: CurrencyTable,
    engine: ForecastEngine,
    limits: ServiceLimits,
}

impl ForecastService {
    pub fn new(
        catalog: AssetCatalog,
        currencies: CurrencyTable,
        engine: ForecastEngine,
        limits: ServiceLimits,
    ) -> Self {
        Self {
            catalog,
            currencies,
            engine,
            limits,
        }
    }

    /// Wires a fresh cache, trainer and engine around `fetcher`.
    pub fn build(
        catalog: AssetCatalog,
        currencies: CurrencyTable,
        fetcher: Arc<dyn HistoricalDataFetcher>,
        trainer_config: TrainerConfig,
        fallback: SyntheticFallback,
        limits: ServiceLimits,
    ) -> Self {
        let trainer = Arc::new(ModelTrainer::new(fetcher, trainer_config));
        let engine = ForecastEngine::new(Arc::new(ModelCache::new()), trainer, fallback);
        Self::new(catalog, currencies, engine, limits)
    }

    pub fn cache(&self) -> &Arc<ModelCache> {
        self.engine.cache()
    }

    pub async fn forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResponse, RequestValidationError> {
        self.forecast_from(request, Utc::now().date_naive()).await
    }

    /// Forecast with the first predicted day pinned to `start`.
    pub async fn forecast_from(
        &self,
        request: &ForecastRequest,
        start: NaiveDate,
    ) -> Result<ForecastResponse, RequestValidationError> {
        let request = self.validate(request)?;

        info!(
            "Prediction request for {} for {} days in {}",
            request.symbol, request.days, request.currency
        );

        let base_price = request.base_price_usd * request.rate;
        info!(
            "Base price for {}: ${} USD, converted to {}: {}",
            request.symbol, request.base_price_usd, request.currency, base_price
        );

        let forecast = self
            .engine
            .predict(&request.symbol, request.days, request.base_price_usd)
            .await;

        let predictions = start
            .iter_days()
            .zip(forecast.values)
            .map(|(date, price_usd)| PredictionPoint {
                date,
                price: finite_or(price_usd * request.rate, base_price),
            })
            .collect();

        info!(
            "Made predictions for {} using {} model",
            request.symbol, forecast.model_type
        );

        Ok(ForecastResponse {
            symbol: request.symbol,
            currency: request.currency,
            predictions,
            model_type: forecast.model_type,
        })
    }

    /// Batch (re)training. With no symbol list, trains the first
    /// `default_train_batch` catalog entries.
    pub async fn train(
        &self,
        request: &TrainRequest,
    ) -> Result<TrainReport, RequestValidationError> {
        let symbols = match &request.symbols {
            Some(symbols) => symbols
                .iter()
                .map(|s| self.validate_symbol(s))
                .collect::<Result<Vec<_>, _>>()?,
            None => self
                .catalog
                .symbols()
                .into_iter()
                .take(self.limits.default_train_batch)
                .collect(),
        };

        if symbols.is_empty() {
            return Err(RequestValidationError::EmptySymbolList);
        }

        let results = self
            .engine
            .cache()
            .train_batch(&symbols, self.engine.trainer())
            .await;

        Ok(TrainReport {
            status: "success".to_string(),
            results,
        })
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "healthy".to_string(),
            trained_models: self.engine.cache().trained_count(),
        }
    }

    pub fn supported_coins(&self) -> SupportedCoins {
        SupportedCoins {
            supported_coins: self.catalog.symbols(),
        }
    }

    pub fn supported_currencies(&self) -> SupportedCurrencies {
        SupportedCurrencies {
            supported_currencies: self.currencies.codes(),
        }
    }

    fn validate(&self, request: &ForecastRequest) -> Result<ValidatedRequest, RequestValidationError> {
        let symbol = self.validate_symbol(&request.symbol)?;

        let currency = request.currency.trim().to_uppercase();
        let rate = self.currencies.rate(&currency).ok_or_else(|| {
            RequestValidationError::UnsupportedCurrency {
                currency: request.currency.clone(),
            }
        })?;

        let days = usize::try_from(request.days)
            .ok()
            .filter(|d| (1..=self.limits.max_horizon_days).contains(d))
            .ok_or(RequestValidationError::InvalidHorizon {
                days: request.days,
                max: self.limits.max_horizon_days,
            })?;

        let base_price_usd = self.catalog.base_price_usd(&symbol).ok_or_else(|| {
            RequestValidationError::UnsupportedSymbol {
                symbol: symbol.clone(),
            }
        })?;

        Ok(ValidatedRequest {
            symbol,
            currency,
            days,
            base_price_usd,
            rate,
        })
    }

    fn validate_symbol(&self, raw: &str) -> Result<String, RequestValidationError> {
        let symbol = raw.trim().to_uppercase();
        if self.catalog.contains(&symbol) {
            Ok(symbol)
        } else {
            Err(RequestValidationError::UnsupportedSymbol {
                symbol: raw.to_string(),
            })
        }
    }
}

/// `value` when finite, otherwise `replacement`.
fn finite_or(value: f64, replacement: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        warn!(
            "Non-finite prediction {} replaced with base price {}",
            value, replacement
        );
        replacement
    }
}
