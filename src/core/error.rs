//! Error taxonomy for the rates endpoint.
//!
//! Every failure of a rates request maps to exactly one [`ProxyError`]
//! variant. The HTTP layer turns it into the uniform `{success, error}`
//! body; nothing below the handler knows about status codes.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProxyError {
    /// Caller sent something that is not a 3-character currency code.
    #[error("Invalid base currency code. Must be a 3-letter currency code (e.g. USD, EUR)")]
    InvalidRequest,

    /// Deployment is missing something the provider needs (an API key).
    #[error("Server configuration error: {0}")]
    Configuration(String),

    /// The upstream call never produced a response.
    #[error("Internal server error: {0}")]
    UpstreamUnavailable(String),

    /// Upstream answered with a non-success HTTP status.
    #[error("Failed to fetch exchange rates: {status} {status_text}")]
    UpstreamError { status: u16, status_text: String },

    /// Upstream answered 2xx but reported `result: "error"`.
    #[error("{0}")]
    UpstreamRejected(String),

    #[error("Invalid response format from exchange rate API")]
    MalformedUpstreamResponse,
}

impl ProxyError {
    /// Short machine-friendly name used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Configuration(_) => "configuration",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::UpstreamError { .. } => "upstream_error",
            Self::UpstreamRejected(_) => "upstream_rejected",
            Self::MalformedUpstreamResponse => "malformed_upstream_response",
        }
    }
}
