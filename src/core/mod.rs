//! Core abstractions: configuration, error taxonomy and the rate provider seam

pub mod config;
pub mod currency;
pub mod error;
pub mod log;

// Re-export main types for cleaner imports
pub use config::AppConfig;
pub use currency::{BaseCurrency, RateProvider, RateSnapshot};
pub use error::ProxyError;
