use crate::domain::errors::RequestValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

fn default_symbol() -> String {
    "BTC".to_string()
}

fn default_days() -> i64 {
    30
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Forecast request as received from a front end. Missing fields take the
/// BTC / 30 days / USD defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_days")]
    pub days: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl ForecastRequest {
    pub fn new(symbol: impl Into<String>, days: i64, currency: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            days,
            currency: currency.into(),
        }
    }
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self::new(default_symbol(), default_days(), default_currency())
    }
}

/// Which tier produced a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    LinearRegression,
    Fallback,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinearRegression => write!(f, "linear_regression"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub symbol: String,
    pub currency: String,
    pub predictions: Vec<PredictionPoint>,
    pub model_type: ModelType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainRequest {
    #[serde(default)]
    pub symbols: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    pub status: String,
    pub results: BTreeMap<String, TrainingStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub trained_models: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportedCoins {
    pub supported_coins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportedCurrencies {
    pub supported_currencies: Vec<String>,
}

/// Body returned alongside a non-success status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&RequestValidationError> for ErrorResponse {
    fn from(err: &RequestValidationError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
