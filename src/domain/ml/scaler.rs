use super::feature_registry::{FEATURE_COUNT, FeatureVector};
use serde::{Deserialize, Serialize};

/// Per-column min-max scaler onto [0, 1].
///
/// A column that is constant over the fitted rows gets a unit range, so it
/// scales to `x - min` instead of dividing by zero. Values outside the fitted
/// range are not clipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    data_min: FeatureVector,
    data_range: FeatureVector,
}

impl MinMaxScaler {
    /// Fits column bounds over `rows`. Returns `None` for an empty table.
    pub fn fit(rows: &[FeatureVector]) -> Option<Self> {
        let first = rows.first()?;
        let mut data_min = *first;
        let mut data_max = *first;

        for row in &rows[1..] {
            for col in 0..FEATURE_COUNT {
                data_min[col] = data_min[col].min(row[col]);
                data_max[col] = data_max[col].max(row[col]);
            }
        }

        let mut data_range = [1.0; FEATURE_COUNT];
        for col in 0..FEATURE_COUNT {
            let range = data_max[col] - data_min[col];
            if range > 0.0 {
                data_range[col] = range;
            }
        }

        Some(Self {
            data_min,
            data_range,
        })
    }

    pub fn transform(&self, row: &FeatureVector) -> FeatureVector {
        let mut scaled = [0.0; FEATURE_COUNT];
        for col in 0..FEATURE_COUNT {
            scaled[col] = (row[col] - self.data_min[col]) / self.data_range[col];
        }
        scaled
    }

    pub fn data_min(&self) -> &FeatureVector {
        &self.data_min
    }

    pub fn data_range(&self) -> &FeatureVector {
        &self.data_range
    }
}
