//! Configuration for the live rate sources.
//!
//! Everything a provider needs is passed in explicitly through
//! [`ProviderConfig`]; nothing is read from the process environment unless
//! the caller asks for it with [`ProviderConfig::from_env`].

use serde::{Deserialize, Serialize};
use zakati_core::ZakatError;

pub const DEFAULT_METAL_API_URL: &str = "https://metals-api.com/api";
pub const DEFAULT_EXCHANGE_API_URL: &str = "https://api.exchangerate-api.com/v4";

pub const ENV_METAL_API_KEY: &str = "METAL_API_KEY";
pub const ENV_EXCHANGE_API_KEY: &str = "EXCHANGE_API_KEY";
pub const ENV_METAL_API_URL: &str = "ZAKATI_METAL_API_URL";
pub const ENV_EXCHANGE_API_URL: &str = "ZAKATI_EXCHANGE_API_URL";
pub const ENV_TIMEOUT_SECONDS: &str = "ZAKATI_TIMEOUT_SECONDS";

/// Upper bound on retries per request.
pub const MAX_RETRIES_CAP: u8 = 1;

/// An access credential for a rate source.
///
/// `Debug` and `Display` never print the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() { None } else { Some(Self(key)) }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("****")
    }
}

/// Network configuration for live rate providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub timeout_seconds: u64,
    /// Retries after a transport failure or 5xx answer. Capped at 1.
    pub max_retries: u8,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            max_retries: 1,
        }
    }
}

impl NetworkConfig {
    pub fn retries(&self) -> u8 {
        self.max_retries.min(MAX_RETRIES_CAP)
    }
}

/// Credentials and endpoints for both rate sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub metal_api_key: Option<ApiKey>,
    pub exchange_api_key: Option<ApiKey>,
    pub metal_base_url: String,
    pub exchange_base_url: String,
    pub network: NetworkConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            metal_api_key: None,
            exchange_api_key: None,
            metal_base_url: DEFAULT_METAL_API_URL.to_string(),
            exchange_base_url: DEFAULT_EXCHANGE_API_URL.to_string(),
            network: NetworkConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Reads credentials and overrides from the process environment.
    pub fn from_env() -> Result<Self, ZakatError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ZakatError> {
        Self::default().overlay(lookup)
    }

    /// Applies any variables `lookup` knows about on top of `self`.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ZakatError> {
        if let Some(key) = lookup(ENV_METAL_API_KEY).and_then(ApiKey::new) {
            self.metal_api_key = Some(key);
        }
        if let Some(key) = lookup(ENV_EXCHANGE_API_KEY).and_then(ApiKey::new) {
            self.exchange_api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_METAL_API_URL) {
            self.metal_base_url = url;
        }
        if let Some(url) = lookup(ENV_EXCHANGE_API_URL) {
            self.exchange_base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECONDS) {
            self.network.timeout_seconds = raw.trim().parse().map_err(|_| {
                ZakatError::Configuration(format!("{} must be a whole number of seconds, got '{}'", ENV_TIMEOUT_SECONDS, raw))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn with_metal_api_key(mut self, key: impl Into<String>) -> Self {
        self.metal_api_key = ApiKey::new(key);
        self
    }

    pub fn with_exchange_api_key(mut self, key: impl Into<String>) -> Self {
        self.exchange_api_key = ApiKey::new(key);
        self
    }

    pub fn with_metal_base_url(mut self, url: impl Into<String>) -> Self {
        self.metal_base_url = url.into();
        self
    }

    pub fn with_exchange_base_url(mut self, url: impl Into<String>) -> Self {
        self.exchange_base_url = url.into();
        self
    }

    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    /// Checks that both endpoints are valid http(s) URLs and the timeout is non-zero.
    pub fn validate(&self) -> Result<(), ZakatError> {
        for (name, url) in [("metal", &self.metal_base_url), ("exchange", &self.exchange_base_url)] {
            let parsed = reqwest::Url::parse(url)
                .map_err(|e| ZakatError::Configuration(format!("Invalid {} API URL '{}': {}", name, url, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ZakatError::Configuration(format!(
                    "{} API URL must use http or https, got '{}'",
                    name,
                    parsed.scheme()
                )));
            }
        }
        if self.network.timeout_seconds == 0 {
            return Err(ZakatError::Configuration("Timeout must be at least 1 second".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_api_key_is_redacted() {
        let key = ApiKey::new("super-secret-token").unwrap();
        assert_eq!(format!("{:?}", key), "ApiKey(****)");
        assert_eq!(key.to_string(), "****");
        assert_eq!(key.expose(), "super-secret-token");

        let config = ProviderConfig::default().with_metal_api_key("super-secret-token");
        assert!(!format!("{:?}", config).contains("super-secret-token"));
    }

    #[test]
    fn test_blank_key_is_none() {
        assert!(ApiKey::new("   ").is_none());
    }

    #[test]
    fn test_lookup_overrides_defaults() {
        let config = ProviderConfig::from_lookup(lookup(&[
            (ENV_METAL_API_KEY, "m-key"),
            (ENV_EXCHANGE_API_URL, "http://127.0.0.1:9000/v4"),
            (ENV_TIMEOUT_SECONDS, "3"),
        ]))
        .unwrap();

        assert_eq!(config.metal_api_key.as_ref().map(ApiKey::expose), Some("m-key"));
        assert!(config.exchange_api_key.is_none());
        assert_eq!(config.metal_base_url, DEFAULT_METAL_API_URL);
        assert_eq!(config.exchange_base_url, "http://127.0.0.1:9000/v4");
        assert_eq!(config.network.timeout_seconds, 3);
    }

    #[test]
    fn test_invalid_values_are_configuration_errors() {
        let err = ProviderConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECONDS, "soon")])).unwrap_err();
        assert!(matches!(err, ZakatError::Configuration(_)));

        let err = ProviderConfig::from_lookup(lookup(&[(ENV_METAL_API_URL, "not a url")])).unwrap_err();
        assert!(matches!(err, ZakatError::Configuration(_)));

        let err = ProviderConfig::default().with_exchange_base_url("ftp://rates.example").validate().unwrap_err();
        assert!(matches!(err, ZakatError::Configuration(ref msg) if msg.contains("ftp")));
    }

    #[test]
    fn test_retries_are_capped() {
        let network = NetworkConfig { timeout_seconds: 5, max_retries: 7 };
        assert_eq!(network.retries(), 1);
        assert_eq!(NetworkConfig { max_retries: 0, ..network }.retries(), 0);
    }
}
