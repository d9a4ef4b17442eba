//! Tiered forecast engine.
//!
//! Tier 1 iterates the asset's trained regression one day at a time. Tier 2
//! is the synthetic trend-plus-noise path, used whenever tier 1 has no model
//! or fails mid-forecast. `predict` itself never fails.

use super::cache::ModelCache;
use super::fallback::SyntheticFallback;
use crate::application::ml::{ModelTrainer, TrainedBundle};
use crate::domain::errors::ForecastStepError;
use crate::domain::forecast::ModelType;
use crate::domain::ml::FeatureVector;
use crate::domain::ml::feature_registry::shift_lags;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// USD price path plus the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub values: Vec<f64>,
    pub model_type: ModelType,
}

/// Request-local iteration state, seeded from a bundle and never written back to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastState {
    pub features: FeatureVector,
    pub price: f64,
}

impl ForecastState {
    pub fn seed(bundle: &TrainedBundle) -> Self {
        Self {
            features: *bundle.last_features(),
            price: bundle.last_price(),
        }
    }

    /// Predicts the next close and shifts it into the lag slots.
    /// Rolling and momentum columns carry over unchanged.
    pub fn step(self, bundle: &TrainedBundle) -> Result<(f64, Self), ForecastStepError> {
        let next_price = bundle.predict_next(&self.features)?;
        let next = Self {
            features: shift_lags(&self.features, next_price),
            price: next_price,
        };
        Ok((next_price, next))
    }
}

/// `horizon` successive one-step predictions from the bundle's seed state.
/// The seed price itself is not part of the output.
pub fn iterate_forecast(
    bundle: &TrainedBundle,
    horizon: usize,
) -> Result<Vec<f64>, ForecastStepError> {
    let seed = (ForecastState::seed(bundle), Vec::with_capacity(horizon));

    (0..horizon)
        .try_fold(seed, |(state, mut values), _| {
            let (price, next) = state.step(bundle)?;
            values.push(price);
            Ok::<_, ForecastStepError>((next, values))
        })
        .map(|(_, values)| values)
}

pub struct ForecastEngine {
    cache: Arc<ModelCache>,
    trainer: Arc<ModelTrainer>,
    fallback: SyntheticFallback,
}

impl ForecastEngine {
    pub fn new(
        cache: Arc<ModelCache>,
        trainer: Arc<ModelTrainer>,
        fallback: SyntheticFallback,
    ) -> Self {
        Self {
            cache,
            trainer,
            fallback,
        }
    }

    pub fn cache(&self) -> &Arc<ModelCache> {
        &self.cache
    }

    pub fn trainer(&self) -> &Arc<ModelTrainer> {
        &self.trainer
    }

    /// `horizon_days` USD prices for `symbol`.
    pub async fn predict(&self, symbol: &str, horizon_days: usize, base_price_usd: f64) -> Forecast {
        let entry = self.cache.get_or_train(symbol, &self.trainer).await;

        match entry.bundle() {
            Some(bundle) => match iterate_forecast(bundle, horizon_days) {
                Ok(values) => {
                    debug!(
                        "ForecastEngine: {} day forecast for {} from trained model",
                        horizon_days, symbol
                    );
                    return Forecast {
                        values,
                        model_type: ModelType::LinearRegression,
                    };
                }
                Err(e) => warn!(
                    "ForecastEngine: Trained model for {} failed mid-forecast ({}). Using synthetic fallback.",
                    symbol, e
                ),
            },
            None => info!(
                "ForecastEngine: No trained model for {}. Using synthetic fallback.",
                symbol
            ),
        }

        Forecast {
            values: self.synthetic(base_price_usd, horizon_days),
            model_type: ModelType::Fallback,
        }
    }

    fn synthetic(&self, base_price_usd: f64, horizon_days: usize) -> Vec<f64> {
        let mut rng = rand::rng();
        self.fallback.generate(base_price_usd, horizon_days, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::TrainerConfig;
    use crate::infrastructure::mock::{MockHistoricalDataFetcher, daily_series};

    fn wavy(i: usize) -> f64 {
        100.0 + 0.5 * i as f64 + 5.0 * (i as f64 / 3.0).sin()
    }

    fn engine(fetcher: MockHistoricalDataFetcher) -> ForecastEngine {
        let trainer = ModelTrainer::new(Arc::new(fetcher), TrainerConfig::default());
        ForecastEngine::new(
            Arc::new(ModelCache::new()),
            Arc::new(trainer),
            SyntheticFallback::default(),
        )
    }

    #[tokio::test]
    async fn test_predict_without_data_uses_fallback() {
        let engine = engine(MockHistoricalDataFetcher::new());

        let forecast = engine.predict("FXS", 30, 8.0).await;

        assert_eq!(forecast.model_type, ModelType::Fallback);
        assert_eq!(forecast.values.len(), 30);
        assert!(forecast.values.iter().all(|v| *v > 7.0 && *v < 10.0));
    }

    #[tokio::test]
    async fn test_predict_with_model_is_deterministic() {
        let engine =
            engine(MockHistoricalDataFetcher::new().with_series("BTC", daily_series(90, wavy)));

        let first = engine.predict("BTC", 10, 30000.0).await;
        let second = engine.predict("BTC", 10, 30000.0).await;

        assert_eq!(first.model_type, ModelType::LinearRegression);
        assert_eq!(first.values.len(), 10);
        assert!(first.values.iter().all(|v| v.is_finite()));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_iteration_shifts_predictions_into_lags() {
        let engine =
            engine(MockHistoricalDataFetcher::new().with_series("ETH", daily_series(90, wavy)));
        let entry = engine.cache().get_or_train("ETH", engine.trainer()).await;
        let bundle = entry.bundle().unwrap();

        let seed = ForecastState::seed(bundle);
        let (p1, s1) = seed.step(bundle).unwrap();
        let (p2, s2) = s1.step(bundle).unwrap();

        assert_eq!(s1.features[0], p1);
        assert_eq!(s1.features[1], seed.features[0]);
        assert_eq!(s2.features[0], p2);
        assert_eq!(s2.features[1], p1);
        // Rolling and momentum columns stay frozen at the seed values
        assert_eq!(s2.features[7..], seed.features[7..]);
        // The bundle's seed is untouched by iteration
        assert_eq!(ForecastState::seed(bundle), seed);

        assert_eq!(iterate_forecast(bundle, 2).unwrap(), vec![p1, p2]);
        assert!(iterate_forecast(bundle, 0).unwrap().is_empty());
    }
}
