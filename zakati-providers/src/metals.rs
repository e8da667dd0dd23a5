use tracing::warn;
use zakati_core::pricing::{RatePair, RateProvider, RateQuote};
use zakati_core::{Currency, MetalSymbol, ZakatError};

use crate::config::{ApiKey, NetworkConfig, ProviderConfig};
use crate::http::{build_client, fetch_body, RatesResponse};

const SOURCE: &str = "metal price service";

/// Metal prices from a metals-api compatible endpoint.
///
/// Requests `GET {base_url}/latest?access_key=..&base={currency}&symbols={XAU|XAG}`
/// and reads `rates[symbol]`. A body without that entry yields a price of `0`.
#[derive(Debug, Clone)]
pub struct MetalsApiProvider {
    client: reqwest::Client,
    base_url: String,
    access_key: ApiKey,
    network: NetworkConfig,
}

impl MetalsApiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ZakatError> {
        config.validate()?;
        let access_key = config.metal_api_key.clone().ok_or_else(|| {
            ZakatError::Configuration("A metal price API key is required (set METAL_API_KEY)".to_string())
        })?;

        Ok(Self {
            client: build_client(&config.network)?,
            base_url: config.metal_base_url.trim_end_matches('/').to_string(),
            access_key,
            network: config.network.clone(),
        })
    }

    fn latest_url(&self) -> String {
        format!("{}/latest", self.base_url)
    }

    /// Fetches the price, or `None` when the response has no entry for `metal`.
    pub async fn fetch_price(&self, metal: MetalSymbol, currency: Currency) -> Result<Option<rust_decimal::Decimal>, ZakatError> {
        let url = self.latest_url();
        let body = fetch_body(&self.network, SOURCE, || {
            self.client.get(&url).query(&[
                ("access_key", self.access_key.expose()),
                ("base", currency.code()),
                ("symbols", metal.symbol()),
            ])
        })
        .await?;

        let response = RatesResponse::parse(&body, SOURCE)?;
        if let Some(reason) = response.upstream_error() {
            warn!(metal = %metal, currency = %currency, reason = %reason, "Metal price service reported an error");
        }
        response.rate(metal.symbol())
    }
}

#[async_trait::async_trait]
impl RateProvider for MetalsApiProvider {
    async fn get_metal_unit_price(&self, metal: MetalSymbol, currency: Currency) -> Result<RateQuote, ZakatError> {
        match self.fetch_price(metal, currency).await? {
            Some(price) => RateQuote::metal(metal, currency, price),
            None => Ok(RateQuote::fallback(RatePair::Metal { metal, currency })),
        }
    }

    async fn get_exchange_rate(&self, base: Currency, target: Currency) -> Result<RateQuote, ZakatError> {
        Err(ZakatError::Configuration(format!(
            "{} does not provide exchange rates ({} -> {})",
            SOURCE, base, target
        )))
    }
}
