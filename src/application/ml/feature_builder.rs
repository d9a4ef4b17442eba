use crate::domain::market::PricePoint;
use crate::domain::ml::feature_registry::{
    FEATURE_COUNT, FeatureVector, LAG_COUNT, MOMENTUM_OFFSETS, ROLLING_MEAN_WINDOWS,
    ROLLING_STD_WINDOWS, WARMUP_ROWS,
};
use chrono::{DateTime, Utc};
use statrs::statistics::{Data, Distribution};

/// One supervised-learning sample: the features observed at `timestamp` and
/// the close at that date as target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub features: FeatureVector,
}

/// Chronological feature rows for one asset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&FeatureRow> {
        self.rows.last()
    }

    pub fn features(&self) -> Vec<FeatureVector> {
        self.rows.iter().map(|r| r.features).collect()
    }

    pub fn targets(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.price).collect()
    }
}

/// Turns a raw close series into lag / rolling / momentum features.
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Builds one row per series index from `WARMUP_ROWS` onwards, so a
    /// series of length L yields `L - 14` rows. Rows with a non-finite value
    /// in any column are dropped.
    pub fn build(series: &[PricePoint]) -> FeatureTable {
        let prices: Vec<f64> = series.iter().map(|p| p.price).collect();

        let rows = (WARMUP_ROWS..prices.len())
            .filter_map(|i| {
                Self::features_at(&prices, i).map(|features| FeatureRow {
                    timestamp: series[i].timestamp,
                    price: prices[i],
                    features,
                })
            })
            .collect();

        FeatureTable { rows }
    }

    /// Features for index `i`; requires `i >= WARMUP_ROWS`.
    fn features_at(prices: &[f64], i: usize) -> Option<FeatureVector> {
        let mut features = [0.0; FEATURE_COUNT];
        let mut col = 0;

        for lag in 1..=LAG_COUNT {
            features[col] = prices[i - lag];
            col += 1;
        }

        for window in ROLLING_MEAN_WINDOWS {
            features[col] = Self::trailing(prices, i, window).mean()?;
            col += 1;
        }

        for window in ROLLING_STD_WINDOWS {
            // Sample standard deviation (n - 1)
            features[col] = Self::trailing(prices, i, window).std_dev()?;
            col += 1;
        }

        for offset in MOMENTUM_OFFSETS {
            features[col] = prices[i] - prices[i - offset];
            col += 1;
        }

        features.iter().all(|v| v.is_finite()).then_some(features)
    }

    /// The `window` closes ending at (and including) index `i`.
    fn trailing(prices: &[f64], i: usize, window: usize) -> Data<Vec<f64>> {
        Data::new(prices[i + 1 - window..=i].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| {
                let ts = DateTime::from_timestamp(1_704_067_200 + i as i64 * 86_400, 0).unwrap();
                PricePoint::new(ts, price)
            })
            .collect()
    }

    fn linear(len: usize) -> Vec<f64> {
        (0..len).map(|i| 100.0 + 2.0 * i as f64).collect()
    }

    #[test]
    fn test_row_count_drops_warmup() {
        for len in [0, 5, 14, 15, 30, 61] {
            let table = FeatureBuilder::build(&series(&linear(len)));
            assert_eq!(table.len(), len.saturating_sub(14), "series length {}", len);
        }
    }

    #[test]
    fn test_rows_are_chronological_and_finite() {
        let input = series(&linear(40));
        let table = FeatureBuilder::build(&input);

        assert_eq!(table.rows()[0].timestamp, input[14].timestamp);
        assert!(
            table
                .rows()
                .windows(2)
                .all(|w| w[0].timestamp < w[1].timestamp)
        );
        assert!(
            table
                .rows()
                .iter()
                .all(|r| r.features.iter().all(|v| v.is_finite()))
        );
    }

    #[test]
    fn test_feature_values() {
        let prices = linear(20);
        let table = FeatureBuilder::build(&series(&prices));
        // First row is series index 14, price 128
        let row = table.rows()[0];
        assert_eq!(row.price, 128.0);

        // Lags
        assert_eq!(row.features[0], 126.0);
        assert_eq!(row.features[6], 114.0);

        // Rolling means include the current close
        assert!((row.features[7] - 126.0).abs() < 1e-9);
        assert!((row.features[8] - 122.0).abs() < 1e-9);
        assert!((row.features[9] - 115.0).abs() < 1e-9);

        // Sample std of 7 consecutive steps of 2: 2 * sqrt(28 / 6)
        let expected_std_7 = 2.0 * (28.0_f64 / 6.0).sqrt();
        assert!((row.features[10] - expected_std_7).abs() < 1e-9);

        // Momentum
        assert_eq!(row.features[12], 6.0);
        assert_eq!(row.features[13], 14.0);
    }

    #[test]
    fn test_non_finite_rows_dropped() {
        let mut prices = linear(30);
        prices[20] = f64::NAN;
        let table = FeatureBuilder::build(&series(&prices));

        assert!(table.len() < 16);
        assert!(
            table
                .rows()
                .iter()
                .all(|r| r.price.is_finite() && r.features.iter().all(|v| v.is_finite()))
        );
    }

    #[test]
    fn test_last_row_matches_last_price() {
        let prices = linear(61);
        let table = FeatureBuilder::build(&series(&prices));
        assert_eq!(table.last().map(|r| r.price), prices.last().copied());
        assert_eq!(table.targets().len(), table.features().len());
    }
}
