//! Exchange-rate abstractions

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use super::error::ProxyError;

/// A validated base currency code.
///
/// Only the length is checked; the code is not looked up in any registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseCurrency(String);

impl BaseCurrency {
    pub const LEN: usize = 3;

    pub fn parse(code: &str) -> Result<Self, ProxyError> {
        if code.chars().count() != Self::LEN {
            return Err(ProxyError::InvalidRequest);
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Latest rates for one base currency, already normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSnapshot {
    pub base: String,
    /// RFC 3339 timestamp of the upstream's last update.
    pub date: String,
    /// Upstream values, untouched.
    pub rates: Map<String, Value>,
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn latest_rates(&self, base: &BaseCurrency) -> Result<RateSnapshot, ProxyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_three_characters() {
        let base = BaseCurrency::parse("USD").unwrap();
        assert_eq!(base.as_str(), "USD");
    }

    #[test]
    fn test_parse_uppercases() {
        let base = BaseCurrency::parse("eur").unwrap();
        assert_eq!(base.to_string(), "EUR");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        for code in ["", "U", "US", "USDT", "DOLLAR"] {
            assert_eq!(
                BaseCurrency::parse(code),
                Err(ProxyError::InvalidRequest),
                "{code:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_counts_characters_not_bytes() {
        // Three characters, six bytes.
        assert!(BaseCurrency::parse("€€€").is_ok());
        assert!(BaseCurrency::parse("€€").is_err());
    }
}
