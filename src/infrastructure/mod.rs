pub mod coingecko;
pub mod core;
pub mod mock;

pub use coingecko::CoinGeckoHistoricalDataFetcher;
pub use mock::MockHistoricalDataFetcher;
