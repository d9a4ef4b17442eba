use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Trend-plus-noise path used when no trained model exists for an asset.
///
/// `base × (1 + trend[i] + noise[i])` where `trend` is linearly spaced from
/// 0 to `trend_end` inclusive and `noise ~ N(0, noise_std)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticFallback {
    trend_end: f64,
    noise_std: f64,
}

impl SyntheticFallback {
    pub fn new(trend_end: f64, noise_std: f64) -> Self {
        Self {
            trend_end,
            noise_std,
        }
    }

    pub fn trend_end(&self) -> f64 {
        self.trend_end
    }

    pub fn noise_std(&self) -> f64 {
        self.noise_std
    }

    /// Evenly spaced values from 0 to `trend_end`; a single step gets 0.
    pub fn trend(&self, horizon: usize) -> Vec<f64> {
        match horizon {
            0 => Vec::new(),
            1 => vec![0.0],
            _ => {
                let step = self.trend_end / (horizon - 1) as f64;
                (0..horizon).map(|i| i as f64 * step).collect()
            }
        }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        base_price_usd: f64,
        horizon: usize,
        rng: &mut R,
    ) -> Vec<f64> {
        // Only a negative or NaN std is rejected; config validation rules both out
        let noise = Normal::new(0.0, self.noise_std).ok();

        let mut values = Vec::with_capacity(horizon);
        for trend in self.trend(horizon) {
            let shock = match &noise {
                Some(dist) => dist.sample(rng),
                None => 0.0,
            };
            values.push(base_price_usd * (1.0 + trend + shock));
        }
        values
    }
}

impl Default for SyntheticFallback {
    fn default() -> Self {
        Self::new(0.2, 0.01)
    }
}
