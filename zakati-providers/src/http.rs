//! Shared HTTP plumbing for the rate sources.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};
use zakati_core::ZakatError;

use crate::config::NetworkConfig;

const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Body shape shared by both sources: `{"rates": {"KEY": number, ...}}`.
///
/// Metals-api reports failures as `{"success": false, "error": {...}}` with a
/// 200 status, so those fields are kept for logging. Entries are kept raw and
/// only the requested one is converted.
#[derive(Debug, Default, Deserialize)]
pub struct RatesResponse {
    #[serde(skip)]
    source: String,
    #[serde(default)]
    pub rates: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl RatesResponse {
    pub fn parse(body: &str, source: &str) -> Result<Self, ZakatError> {
        let mut response: Self = serde_json::from_str(body)
            .map_err(|e| ZakatError::UpstreamFormat(format!("{} returned an unreadable body: {}", source, e)))?;
        response.source = source.to_string();
        Ok(response)
    }

    /// The rate for `key`, or `None` when the body has no `rates` map, the map
    /// has no such key, or the entry is `null`.
    ///
    /// An entry that is present but not a number is an error.
    pub fn rate(&self, key: &str) -> Result<Option<Decimal>, ZakatError> {
        let Some(value) = self.rates.as_ref().and_then(|rates| rates.get(key)) else {
            return Ok(None);
        };
        let parsed = match value {
            serde_json::Value::Null => return Ok(None),
            serde_json::Value::Number(n) => parse_number(&n.to_string()),
            serde_json::Value::String(s) => parse_number(s.trim()),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| {
            ZakatError::UpstreamFormat(format!("{} returned a non-numeric rate for {}: {}", self.source, key, value))
        })
    }

    /// Upstream's own description of why it returned no data, if any.
    pub fn upstream_error(&self) -> Option<String> {
        if self.success == Some(false) || self.error.is_some() {
            Some(self.error.as_ref().map(|e| e.to_string()).unwrap_or_else(|| "success=false".to_string()))
        } else {
            None
        }
    }
}

fn parse_number(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)).ok()
}

pub fn build_client(config: &NetworkConfig) -> Result<reqwest::Client, ZakatError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(concat!("zakati/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ZakatError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Sends the request built by `make_request` and returns the body text.
///
/// Transport failures and 5xx answers are retried up to `config.retries()`
/// times. Other non-success statuses fail immediately. Error messages never
/// contain the request URL, which may carry credentials.
pub async fn fetch_body<F>(config: &NetworkConfig, source: &str, make_request: F) -> Result<String, ZakatError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let attempts = u32::from(config.retries()) + 1;
    let mut last_error = None;

    for attempt in 1..=attempts {
        if attempt > 1 {
            tokio::time::sleep(RETRY_DELAY).await;
        }
        debug!(source, attempt, "Requesting rates");

        match send_once(source, make_request()).await {
            Ok(body) => return Ok(body),
            Err(err) if err.is_retryable() && attempt < attempts => {
                warn!(source, attempt, error = %err, "Rate request failed; retrying");
                last_error = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_error.unwrap_or_else(|| ZakatError::Network(format!("{} could not be reached", source))))
}

async fn send_once(source: &str, request: reqwest::RequestBuilder) -> Result<String, ZakatError> {
    let response = request
        .send()
        .await
        .map_err(|e| ZakatError::Network(format!("{} request failed: {}", source, e.without_url())))?;

    let status = response.status();
    if status.is_server_error() {
        return Err(ZakatError::Network(format!("{} answered with status {}", source, status)));
    }
    if !status.is_success() {
        return Err(ZakatError::UpstreamFormat(format!("{} rejected the request with status {}", source, status)));
    }

    response
        .text()
        .await
        .map_err(|e| ZakatError::Network(format!("{} response could not be read: {}", source, e.without_url())))
}
