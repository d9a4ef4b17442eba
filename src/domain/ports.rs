use crate::domain::market::PricePoint;
use async_trait::async_trait;

#[async_trait]
pub trait HistoricalDataFetcher: Send + Sync {
    /// Daily USD closes covering the last `lookback_days`, oldest first.
    /// Any failure is logged by the implementation and reported as `None`.
    async fn fetch(&self, symbol: &str, lookback_days: u32) -> Option<Vec<PricePoint>>;
}
