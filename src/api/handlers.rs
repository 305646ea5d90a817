//! Request handlers.

use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::response::{ErrorResponse, HealthResponse, RateResponse};
use super::state::AppState;
use crate::core::{BaseCurrency, ProxyError};

/// GET /api/rates/{base_currency}
pub async fn rates(
    State(state): State<AppState>,
    base_currency: Result<Path<String>, PathRejection>,
) -> Result<Json<RateResponse>, ProxyError> {
    // A segment that does not decode to UTF-8 cannot be a currency code.
    let Path(base_currency) = base_currency.map_err(|rejection| {
        warn!(error = %rejection, kind = "invalid_request", "Undecodable base currency");
        ProxyError::InvalidRequest
    })?;
    info!(currency = %base_currency, "Fetching exchange rates");

    let base = BaseCurrency::parse(&base_currency)
        .inspect_err(|e| log_failure(&base_currency, e))?;
    let snapshot = state
        .provider
        .latest_rates(&base)
        .await
        .inspect_err(|e| log_failure(base.as_str(), e))?;

    debug!(currency = %base, count = snapshot.rates.len(), "Returning rates");
    Ok(Json(snapshot.into()))
}

fn log_failure(currency: &str, err: &ProxyError) {
    match err {
        ProxyError::InvalidRequest => {
            warn!(currency, kind = err.kind(), "Invalid base currency requested");
        }
        ProxyError::UpstreamRejected(error_type) => {
            warn!(currency, kind = err.kind(), %error_type, "Upstream rejected request");
        }
        ProxyError::UpstreamError { status, .. } => {
            error!(
                currency,
                kind = err.kind(),
                status,
                error = %err,
                "Upstream returned an error status"
            );
        }
        ProxyError::Configuration(_)
        | ProxyError::UpstreamUnavailable(_)
        | ProxyError::MalformedUpstreamResponse => {
            error!(
                currency,
                kind = err.kind(),
                error = %err,
                "Exchange rate request failed"
            );
        }
    }
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Currency converter API is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Known API path, unsupported method.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
}

/// Fallback for anything neither routed nor on disk.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Endpoint not found")),
    )
}
