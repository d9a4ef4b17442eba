// Tiered forecasting and the shared model cache
pub mod forecast;

// Feature construction and model training
pub mod ml;

// Request boundary
pub mod service;
