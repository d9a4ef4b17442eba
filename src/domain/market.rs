use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One daily close for an asset, USD-denominated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Builds a point from a unix timestamp in milliseconds.
    /// Returns `None` when the timestamp is outside chrono's range.
    pub fn from_millis(timestamp_ms: i64, price: f64) -> Option<Self> {
        DateTime::from_timestamp_millis(timestamp_ms).map(|timestamp| Self { timestamp, price })
    }
}
