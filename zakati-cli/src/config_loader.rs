//! Persistent CLI Configuration Loader
//!
//! Configuration is loaded from `~/.config/zakati/config.toml` on Linux,
//! `~/Library/Application Support/zakati/config.toml` on macOS
//! or `%APPDATA%\zakati\config.toml` on Windows.
//!
//! Values resolve in this order, later winning: built-in defaults, this
//! file, environment variables, command-line flags.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use zakati_core::{Currency, ZakatError};
use zakati_providers::config::ApiKey;
use zakati_providers::ProviderConfig;

/// CLI Configuration structure loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    /// Access key for the metal price service.
    pub metal_api_key: Option<ApiKey>,
    /// Access key for the exchange rate service, if it needs one.
    pub exchange_api_key: Option<ApiKey>,
    pub metal_api_url: Option<String>,
    pub exchange_api_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// Default currency the declared amounts are in.
    pub base_currency: Option<Currency>,
    /// Default currency the results are reported in.
    pub output_currency: Option<Currency>,
    /// Where the PDF report is written.
    pub report_dir: Option<PathBuf>,
    /// Gold price per gram used by `--offline` when no flag is given.
    pub gold_price: Option<Decimal>,
    /// Silver price per gram used by `--offline` when no flag is given.
    pub silver_price: Option<Decimal>,
    /// Enable file logging by default.
    pub enable_logging: Option<bool>,
}

const SAMPLE_HEADER: &str = "\
# Zakati configuration
#
# API keys may also come from the METAL_API_KEY and EXCHANGE_API_KEY
# environment variables, which take precedence over this file.
#
# metal-api-key = \"your-metals-api-access-key\"
# exchange-api-key = \"your-exchange-rate-api-key\"

";

impl CliConfig {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("zakati"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Loads the default config file.
    ///
    /// A missing file yields `CliConfig::default()`. A file that cannot be
    /// read or parsed is a `Configuration` error.
    pub fn load() -> Result<Self, ZakatError> {
        let Some(path) = Self::config_path() else {
            debug!("Could not determine config directory");
            return Ok(Self::default());
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ZakatError> {
        if !path.exists() {
            debug!("No config file found at {:?}", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ZakatError::Configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        // The parser's own Display quotes the offending line, which may hold a key.
        let config = Self::parse(&content).map_err(|e| {
            let line = e
                .span()
                .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);
            let location = line.map(|l| format!(" (line {})", l)).unwrap_or_default();
            ZakatError::Configuration(format!(
                "Invalid config file {}{}: {}",
                path.display(),
                location,
                e.message().trim()
            ))
        })?;

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(path, format!("{}{}", SAMPLE_HEADER, content))?;
        debug!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Creates a sample configuration file at the default location.
    ///
    /// Refuses to overwrite an existing file.
    pub fn create_sample() -> Result<PathBuf, std::io::Error> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "Could not determine config directory")
        })?;
        if path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            ));
        }
        Self::sample().save_to(&path)?;
        Ok(path)
    }

    fn sample() -> Self {
        CliConfig {
            timeout_seconds: Some(10),
            base_currency: Some(Currency::Sar),
            output_currency: Some(Currency::Sar),
            enable_logging: Some(false),
            ..Default::default()
        }
    }

    /// Provider settings from this file, then environment variables, then `flags`.
    pub fn provider_config(
        &self,
        env: impl Fn(&str) -> Option<String>,
        flags: &ProviderFlags,
    ) -> Result<ProviderConfig, ZakatError> {
        let mut config = ProviderConfig::default();
        // Blank keys in the file count as unset.
        config.metal_api_key = self.metal_api_key.as_ref().and_then(|k| ApiKey::new(k.expose()));
        config.exchange_api_key = self.exchange_api_key.as_ref().and_then(|k| ApiKey::new(k.expose()));
        if let Some(url) = &self.metal_api_url {
            config.metal_base_url = url.clone();
        }
        if let Some(url) = &self.exchange_api_url {
            config.exchange_base_url = url.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.network.timeout_seconds = timeout;
        }
        flags.apply(config.overlay(env)?)
    }
}

/// Command-line overrides for the rate services.
///
/// Keys are deliberately absent: command lines end up in shell history.
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct ProviderFlags {
    /// Base URL of the metal price service
    #[arg(long)]
    pub metal_api_url: Option<String>,

    /// Base URL of the exchange rate service
    #[arg(long)]
    pub exchange_api_url: Option<String>,

    /// Request timeout for the rate services, in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,
}

impl ProviderFlags {
    pub fn apply(&self, mut config: ProviderConfig) -> Result<ProviderConfig, ZakatError> {
        if let Some(url) = &self.metal_api_url {
            config.metal_base_url = url.clone();
        }
        if let Some(url) = &self.exchange_api_url {
            config.exchange_base_url = url.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.network.timeout_seconds = timeout;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CliConfig::default();
        assert!(config.metal_api_key.is_none());
        assert!(config.base_currency.is_none());
    }

    #[test]
    fn test_config_parses_kebab_case() {
        let config = CliConfig::parse(
            r#"
            metal-api-key = "abc123"
            base-currency = "USD"
            output-currency = "PKR"
            timeout-seconds = 4
            gold-price = "250.5"
            "#,
        )
        .unwrap();
        assert_eq!(config.metal_api_key.as_ref().map(ApiKey::expose), Some("abc123"));
        assert_eq!(config.base_currency, Some(Currency::Usd));
        assert_eq!(config.output_currency, Some(Currency::Pkr));
        assert_eq!(config.timeout_seconds, Some(4));
        assert_eq!(config.gold_price, Some(Decimal::new(2505, 1)));
    }

    #[test]
    fn test_unknown_currency_is_a_parse_error() {
        assert!(CliConfig::parse(r#"base-currency = "JPY""#).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let config = CliConfig::parse(
            r#"
            metal-api-key = "from-file"
            timeout-seconds = 4
            "#,
        )
        .unwrap();

        let provider = config
            .provider_config(|name| (name == "METAL_API_KEY").then(|| "from-env".to_string()), &ProviderFlags::default())
            .unwrap();
        assert_eq!(provider.metal_api_key.as_ref().map(ApiKey::expose), Some("from-env"));
        assert_eq!(provider.network.timeout_seconds, 4);

        let provider = config.provider_config(|_| None, &ProviderFlags::default()).unwrap();
        assert_eq!(provider.metal_api_key.as_ref().map(ApiKey::expose), Some("from-file"));
    }

    #[test]
    fn test_flags_override_env_and_file() {
        let config = CliConfig::parse(
            r#"
            metal-api-url = "http://file.example/api"
            exchange-api-url = "http://file.example/v4"
            timeout-seconds = 4
            "#,
        )
        .unwrap();
        let env = |name: &str| match name {
            "ZAKATI_METAL_API_URL" => Some("http://env.example/api".to_string()),
            "ZAKATI_TIMEOUT_SECONDS" => Some("6".to_string()),
            _ => None,
        };
        let flags = ProviderFlags {
            metal_api_url: Some("http://127.0.0.1:8080/api".to_string()),
            timeout_seconds: Some(2),
            ..Default::default()
        };

        let provider = config.provider_config(env, &flags).unwrap();
        assert_eq!(provider.metal_base_url, "http://127.0.0.1:8080/api");
        assert_eq!(provider.exchange_base_url, "http://file.example/v4");
        assert_eq!(provider.network.timeout_seconds, 2);

        let provider = config.provider_config(env, &ProviderFlags::default()).unwrap();
        assert_eq!(provider.metal_base_url, "http://env.example/api");
        assert_eq!(provider.network.timeout_seconds, 6);
    }

    #[test]
    fn test_invalid_flag_values_are_rejected() {
        let flags = ProviderFlags { exchange_api_url: Some("ftp://rates".to_string()), ..Default::default() };
        let err = CliConfig::default().provider_config(|_| None, &flags).unwrap_err();
        assert!(matches!(err, ZakatError::Configuration(_)));

        let flags = ProviderFlags { timeout_seconds: Some(0), ..Default::default() };
        assert!(CliConfig::default().provider_config(|_| None, &flags).is_err());
    }

    #[test]
    fn test_blank_key_in_file_is_unset() {
        let config = CliConfig::parse(r#"metal-api-key = "  ""#).unwrap();
        let provider = config.provider_config(|_| None, &ProviderFlags::default()).unwrap();
        assert!(provider.metal_api_key.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("zakati-cli-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let sample = CliConfig::sample();
        sample.save_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Zakati configuration"));
        assert!(written.contains("base-currency = \"SAR\""));
        assert_eq!(CliConfig::load_from(&path).unwrap(), sample);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = CliConfig::load_from(Path::new("/definitely/not/here/config.toml")).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_malformed_file_is_a_configuration_error() {
        let dir = std::env::temp_dir().join(format!("zakati-cli-bad-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "base-currency = \"USD\"\nmetal-api-key = abc123\n").unwrap();

        let err = CliConfig::load_from(&path).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, ZakatError::Configuration(_)));
        assert!(message.contains("line 2"), "{}", message);
        assert!(!message.contains("abc123"), "{}", message);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
