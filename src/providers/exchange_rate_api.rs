use anyhow::{Context, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::config::{ProviderConfig, ProviderFlavor};
use crate::core::{BaseCurrency, ProxyError, RateProvider, RateSnapshot};

const REJECTED_FALLBACK: &str = "Failed to fetch exchange rates";

/// Everything we read from an ExchangeRate-API body. All fields are optional
/// so that an error payload and a rates payload decode through the same type.
/// Metadata of an unexpected type reads as absent; only `rates` is required.
#[derive(Debug, Deserialize)]
struct UpstreamPayload {
    #[serde(default, deserialize_with = "lenient")]
    result: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    base_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    time_last_update_utc: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    time_last_update_unix: Option<f64>,
    #[serde(default)]
    rates: Option<Value>,
    #[serde(default, rename = "error-type", deserialize_with = "lenient")]
    error_type: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

impl UpstreamPayload {
    fn into_snapshot(self, requested: &BaseCurrency) -> Result<RateSnapshot, ProxyError> {
        if self.result.as_deref() == Some("error") {
            return Err(ProxyError::UpstreamRejected(
                self.error_type
                    .unwrap_or_else(|| REJECTED_FALLBACK.to_string()),
            ));
        }

        let rates = match self.rates {
            Some(Value::Object(rates)) => rates,
            _ => return Err(ProxyError::MalformedUpstreamResponse),
        };
        let date = last_update(
            self.time_last_update_utc.as_deref(),
            self.time_last_update_unix,
        )
        .unwrap_or_else(|| Utc::now().to_rfc3339());
        let base = self
            .base_code
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| requested.to_string());

        Ok(RateSnapshot { base, date, rates })
    }
}

/// Upstream sends RFC 2822 (`Fri, 27 Mar 2020 00:02:31 +0000`); we answer in
/// RFC 3339. Unparseable strings pass through as-is.
fn last_update(utc: Option<&str>, unix: Option<f64>) -> Option<String> {
    if let Some(raw) = utc.filter(|s| !s.trim().is_empty()) {
        return Some(
            DateTime::parse_from_rfc2822(raw)
                .map(|dt| dt.with_timezone(&Utc).to_rfc3339())
                .unwrap_or_else(|_| raw.to_string()),
        );
    }
    unix.filter(|ts| ts.is_finite())
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts.trunc() as i64, 0))
        .map(|dt| dt.to_rfc3339())
}

/// Client for ExchangeRate-API's latest-rates endpoint, in either the
/// keyless (`open.er-api.com`) or keyed (`v6.exchangerate-api.com`) shape.
pub struct ExchangeRateApiProvider {
    client: Client,
    base_url: Url,
    flavor: ProviderFlavor,
    api_key: Option<String>,
}

impl ExchangeRateApiProvider {
    pub fn new(config: &ProviderConfig, api_key: Option<String>) -> anyhow::Result<Self> {
        let base_url = Url::parse(config.base_url())
            .with_context(|| format!("Invalid provider base URL: {}", config.base_url()))?;
        if base_url.cannot_be_a_base() {
            bail!("Provider base URL cannot carry a path: {base_url}");
        }

        let client = Client::builder()
            .user_agent(concat!("fxproxy/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ExchangeRateApiProvider {
            client,
            base_url,
            flavor: config.flavor,
            api_key,
        })
    }

    fn latest_url(&self, base: &BaseCurrency) -> Result<Url, ProxyError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ProxyError::Configuration("provider base URL cannot carry a path".to_string())
            })?;
            segments.pop_if_empty().push("v6");
            if self.flavor == ProviderFlavor::Keyed {
                let key = self.api_key.as_deref().ok_or_else(|| {
                    ProxyError::Configuration("API key not configured".to_string())
                })?;
                segments.push(key);
            }
            segments.push("latest").push(base.as_str());
        }
        Ok(url)
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateFetch",
        skip(self, base),
        fields(base = %base)
    )]
    async fn latest_rates(&self, base: &BaseCurrency) -> Result<RateSnapshot, ProxyError> {
        // The keyed URL contains the secret, so it is never logged.
        let url = self.latest_url(base)?;
        debug!(flavor = ?self.flavor, "Requesting latest rates");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ProxyError::UpstreamUnavailable(e.without_url().to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Received upstream response");
        if !status.is_success() {
            return Err(ProxyError::UpstreamError {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or("Unknown Status")
                    .to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProxyError::UpstreamUnavailable(e.without_url().to_string()))?;

        let payload: UpstreamPayload = serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "Failed to parse upstream response");
            ProxyError::MalformedUpstreamResponse
        })?;

        payload.into_snapshot(base)
    }
}
