use crate::domain::market::PricePoint;
use crate::domain::ports::HistoricalDataFetcher;
use async_trait::async_trait;
use chrono::DateTime;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// 2024-01-01T00:00:00Z
const SERIES_START_SECS: i64 = 1_704_067_200;

/// In-memory fetcher for tests and offline runs.
///
/// Symbols without a registered series behave like a provider failure.
#[derive(Debug, Default)]
pub struct MockHistoricalDataFetcher {
    series: RwLock<HashMap<String, Vec<PricePoint>>>,
    calls: AtomicUsize,
    latency: Option<Duration>,
}

impl MockHistoricalDataFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch sleeps for `latency` before answering.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn with_series(self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.set_series(symbol, points);
        self
    }

    pub fn set_series(&self, symbol: &str, points: Vec<PricePoint>) {
        let mut guard = match self.series.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.insert(symbol.to_uppercase(), points);
    }

    pub fn remove_series(&self, symbol: &str) {
        let mut guard = match self.series.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.remove(&symbol.to_uppercase());
    }

    /// Number of `fetch` calls so far, successful or not.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoricalDataFetcher for MockHistoricalDataFetcher {
    async fn fetch(&self, symbol: &str, lookback_days: u32) -> Option<Vec<PricePoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let guard = match self.series.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let points = guard.get(&symbol.to_uppercase())?;

        // market_chart answers with days + 1 closes
        let keep = (lookback_days as usize).saturating_add(1);
        let start = points.len().saturating_sub(keep);
        debug!(
            "MockHistoricalDataFetcher: serving {} points for {}",
            points.len() - start,
            symbol
        );
        Some(points[start..].to_vec())
    }
}

/// Daily points from 2024-01-01, priced by `price_at(day_index)`.
pub fn daily_series(len: usize, price_at: impl Fn(usize) -> f64) -> Vec<PricePoint> {
    (0..len)
        .filter_map(|i| {
            DateTime::from_timestamp(SERIES_START_SECS + i as i64 * 86_400, 0)
                .map(|ts| PricePoint::new(ts, price_at(i)))
        })
        .collect()
}
