//! Shared handler state.

use std::sync::Arc;

use crate::core::RateProvider;

/// Cloned into every handler. Holds nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn RateProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self { provider }
    }
}
