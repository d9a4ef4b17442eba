// Static asset and currency tables
pub mod catalog;

// Domain-specific error types
pub mod errors;

// Boundary request/response types
pub mod forecast;

// Market data primitives
pub mod market;

// Feature layout and scaling
pub mod ml;

// Port interfaces
pub mod ports;
