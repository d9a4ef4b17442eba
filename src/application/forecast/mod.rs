pub mod cache;
pub mod engine;
pub mod fallback;

pub use cache::{CacheEntry, ModelCache};
pub use engine::{Forecast, ForecastEngine, ForecastState};
pub use fallback::SyntheticFallback;
