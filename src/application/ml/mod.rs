pub mod bundle;
pub mod feature_builder;
pub mod trainer;

pub use bundle::TrainedBundle;
pub use feature_builder::{FeatureBuilder, FeatureRow, FeatureTable};
pub use trainer::{ModelTrainer, TrainerConfig};
