use rust_decimal::Decimal;
use zakati_core::pricing::{RatePair, RateProvider, RateQuote};
use zakati_core::{Currency, MetalSymbol, ZakatError};

use crate::config::{ApiKey, NetworkConfig, ProviderConfig};
use crate::http::{build_client, fetch_body, RatesResponse};

const SOURCE: &str = "exchange rate service";

/// Exchange rates from an exchangerate-api compatible endpoint.
///
/// Requests `GET {base_url}/latest/{BASE}` and reads `rates[TARGET]`. A body
/// without that entry yields a rate of `1`.
#[derive(Debug, Clone)]
pub struct ExchangeRateApiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
    network: NetworkConfig,
}

impl ExchangeRateApiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ZakatError> {
        config.validate()?;
        Ok(Self {
            client: build_client(&config.network)?,
            base_url: config.exchange_base_url.trim_end_matches('/').to_string(),
            api_key: config.exchange_api_key.clone(),
            network: config.network.clone(),
        })
    }

    fn latest_url(&self, base: Currency) -> String {
        format!("{}/latest/{}", self.base_url, base.code())
    }

    /// Fetches the rate, or `None` when the response has no entry for `target`.
    pub async fn fetch_rate(&self, base: Currency, target: Currency) -> Result<Option<Decimal>, ZakatError> {
        let url = self.latest_url(base);
        let body = fetch_body(&self.network, SOURCE, || {
            let request = self.client.get(&url);
            match &self.api_key {
                Some(key) => request.bearer_auth(key.expose()),
                None => request,
            }
        })
        .await?;

        RatesResponse::parse(&body, SOURCE)?.rate(target.code())
    }
}

#[async_trait::async_trait]
impl RateProvider for ExchangeRateApiProvider {
    async fn get_metal_unit_price(&self, metal: MetalSymbol, currency: Currency) -> Result<RateQuote, ZakatError> {
        Err(ZakatError::Configuration(format!(
            "{} does not provide metal prices ({}/{})",
            SOURCE, metal, currency
        )))
    }

    async fn get_exchange_rate(&self, base: Currency, target: Currency) -> Result<RateQuote, ZakatError> {
        match self.fetch_rate(base, target).await? {
            Some(rate) => RateQuote::exchange(base, target, rate),
            None => Ok(RateQuote::fallback(RatePair::Exchange { base, target })),
        }
    }
}
