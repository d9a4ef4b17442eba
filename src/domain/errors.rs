use thiserror::Error;

/// Errors raised while pulling history from the market-data provider.
/// The fetcher logs these and reports "no data" to its caller.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Provider returned HTTP status {status}")]
    HttpStatus { status: u16 },

    #[error("Transport failure: {reason}")]
    Transport { reason: String },

    #[error("Malformed market chart payload: {reason}")]
    MalformedPayload { reason: String },

    #[error("Provider returned an empty price series")]
    EmptySeries,
}

/// Reasons a per-asset model could not be trained.
/// Each one downgrades the forecast to the synthetic tier.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("No historical data available for {symbol}")]
    DataUnavailable { symbol: String },

    #[error("Not enough history for {symbol}: {rows} feature rows < {required} required")]
    InsufficientHistory {
        symbol: String,
        rows: usize,
        required: usize,
    },

    #[error("Model fit failed for {symbol}: {reason}")]
    FitFailed { symbol: String, reason: String },
}

/// Failure of a single step of the iterative forecast.
#[derive(Debug, Error)]
pub enum ForecastStepError {
    #[error("Failed to build input matrix: {reason}")]
    Matrix { reason: String },

    #[error("Regression predict failed: {reason}")]
    Prediction { reason: String },

    #[error("Regression returned no prediction")]
    EmptyPrediction,
}

/// Malformed forecast or training request. These are the only errors
/// surfaced to the end caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestValidationError {
    #[error("Invalid horizon: {days} days (must be between 1 and {max})")]
    InvalidHorizon { days: i64, max: usize },

    #[error("Unsupported symbol: {symbol}")]
    UnsupportedSymbol { symbol: String },

    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    #[error("No symbols given for training")]
    EmptySymbolList,
}

impl RequestValidationError {
    /// HTTP status a front end should answer with.
    pub fn status_code(&self) -> u16 {
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_error_formatting() {
        let error = TrainingError::InsufficientHistory {
            symbol: "FTT".to_string(),
            rows: 12,
            required: 30,
        };

        let msg = error.to_string();
        assert!(msg.contains("FTT"));
        assert!(msg.contains("12"));
        assert!(msg.contains("30"));
    }

    #[test]
    fn test_validation_error_formatting() {
        let error = RequestValidationError::InvalidHorizon { days: 0, max: 365 };
        assert_eq!(
            error.to_string(),
            "Invalid horizon: 0 days (must be between 1 and 365)"
        );
        assert_eq!(error.status_code(), 400);
    }
}
