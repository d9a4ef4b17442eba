use super::bundle::TrainedBundle;
use super::feature_builder::{FeatureBuilder, FeatureTable};
use crate::domain::errors::TrainingError;
use crate::domain::ml::MinMaxScaler;
use crate::domain::ports::HistoricalDataFetcher;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{
    LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerConfig {
    /// Days of history requested from the provider.
    pub lookback_days: u32,
    /// Minimum feature rows required to fit a model.
    pub min_training_rows: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            lookback_days: 60,
            min_training_rows: 30,
        }
    }
}

/// Fits one linear regression per asset on its own recent history.
pub struct ModelTrainer {
    fetcher: Arc<dyn HistoricalDataFetcher>,
    config: TrainerConfig,
}

impl ModelTrainer {
    pub fn new(fetcher: Arc<dyn HistoricalDataFetcher>, config: TrainerConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> TrainerConfig {
        self.config
    }

    /// Fetch → features → fit. Failures are logged here and returned to the
    /// caller, which records them and falls back.
    pub async fn train(&self, symbol: &str) -> Result<TrainedBundle, TrainingError> {
        let result = self.train_inner(symbol).await;

        match &result {
            Ok(bundle) => info!(
                "ModelTrainer: Trained linear regression for {} on {} rows (last price {:.6})",
                symbol,
                bundle.training_rows(),
                bundle.last_price()
            ),
            Err(e) => warn!("ModelTrainer: {}", e),
        }

        result
    }

    async fn train_inner(&self, symbol: &str) -> Result<TrainedBundle, TrainingError> {
        let series = self
            .fetcher
            .fetch(symbol, self.config.lookback_days)
            .await
            .ok_or_else(|| TrainingError::DataUnavailable {
                symbol: symbol.to_string(),
            })?;

        let table = FeatureBuilder::build(&series);
        Self::fit(symbol, &table, self.config.min_training_rows)
    }

    /// Fits scaler and regression on `table`.
    pub fn fit(
        symbol: &str,
        table: &FeatureTable,
        min_training_rows: usize,
    ) -> Result<TrainedBundle, TrainingError> {
        let insufficient = || TrainingError::InsufficientHistory {
            symbol: symbol.to_string(),
            rows: table.len(),
            required: min_training_rows,
        };

        if table.len() < min_training_rows {
            return Err(insufficient());
        }
        let last = table.last().ok_or_else(insufficient)?;

        let fit_failed = |reason: String| TrainingError::FitFailed {
            symbol: symbol.to_string(),
            reason,
        };

        let features = table.features();
        let scaler = MinMaxScaler::fit(&features).ok_or_else(insufficient)?;
        let scaled: Vec<Vec<f64>> = features
            .iter()
            .map(|row| scaler.transform(row).to_vec())
            .collect();
        let targets = table.targets();

        let x = DenseMatrix::from_2d_vec(&scaled)
            .map_err(|e| fit_failed(format!("Matrix error: {}", e)))?;

        // SVD tolerates the collinear lag / rolling-mean / momentum columns
        let params =
            LinearRegressionParameters::default().with_solver(LinearRegressionSolverName::SVD);
        let model = LinearRegression::fit(&x, &targets, params)
            .map_err(|e| fit_failed(format!("Training error: {}", e)))?;

        Ok(TrainedBundle::new(
            symbol,
            model,
            scaler,
            last.features,
            last.price,
            table.len(),
        ))
    }
}
