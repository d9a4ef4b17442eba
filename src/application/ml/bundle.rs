use crate::domain::errors::ForecastStepError;
use crate::domain::ml::{FeatureVector, MinMaxScaler};
use chrono::{DateTime, Utc};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::LinearRegression;
use std::fmt;

pub type RegressionModel = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Everything needed to forecast one asset: the fitted regression, the scaler
/// fitted on the same feature table, and the seed state for iteration.
///
/// Immutable once built. Retraining produces a new bundle.
pub struct TrainedBundle {
    symbol: String,
    model: RegressionModel,
    scaler: MinMaxScaler,
    last_features: FeatureVector,
    last_price: f64,
    training_rows: usize,
    trained_at: DateTime<Utc>,
}

impl TrainedBundle {
    pub fn new(
        symbol: impl Into<String>,
        model: RegressionModel,
        scaler: MinMaxScaler,
        last_features: FeatureVector,
        last_price: f64,
        training_rows: usize,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            model,
            scaler,
            last_features,
            last_price,
            training_rows,
            trained_at: Utc::now(),
        }
    }

    /// Scales `features` and returns the regression's next-price estimate.
    pub fn predict_next(&self, features: &FeatureVector) -> Result<f64, ForecastStepError> {
        let scaled = self.scaler.transform(features);
        let input = DenseMatrix::from_2d_vec(&vec![scaled.to_vec()]).map_err(|e| {
            ForecastStepError::Matrix {
                reason: e.to_string(),
            }
        })?;

        let predictions = self
            .model
            .predict(&input)
            .map_err(|e| ForecastStepError::Prediction {
                reason: e.to_string(),
            })?;

        predictions
            .first()
            .copied()
            .ok_or(ForecastStepError::EmptyPrediction)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }

    pub fn last_features(&self) -> &FeatureVector {
        &self.last_features
    }

    pub fn last_price(&self) -> f64 {
        self.last_price
    }

    pub fn training_rows(&self) -> usize {
        self.training_rows
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }
}

// Manual Debug: the regression internals are not useful in logs
impl fmt::Debug for TrainedBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedBundle")
            .field("symbol", &self.symbol)
            .field("last_price", &self.last_price)
            .field("training_rows", &self.training_rows)
            .field("trained_at", &self.trained_at)
            .finish()
    }
}
