pub mod feature_registry;
pub mod scaler;

pub use feature_registry::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
pub use scaler::MinMaxScaler;
