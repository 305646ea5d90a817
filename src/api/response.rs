//! JSON bodies returned by the API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::RateSnapshot;

/// `GET /api/rates/{base}` success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateResponse {
    pub success: bool,
    pub base: String,
    pub date: String,
    pub rates: Map<String, Value>,
}

impl From<RateSnapshot> for RateResponse {
    fn from(snapshot: RateSnapshot) -> Self {
        RateResponse {
            success: true,
            base: snapshot.base,
            date: snapshot.date,
            rates: snapshot.rates,
        }
    }
}

/// Uniform failure body for every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}
