use zakati_core::pricing::{RateProvider, RateQuote};
use zakati_core::{Currency, MetalSymbol, ZakatError};

use crate::config::ProviderConfig;
use crate::exchange::ExchangeRateApiProvider;
use crate::metals::MetalsApiProvider;

/// Both live sources behind one [`RateProvider`].
#[derive(Debug, Clone)]
pub struct LiveRateProvider {
    metals: MetalsApiProvider,
    exchange: ExchangeRateApiProvider,
}

impl LiveRateProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ZakatError> {
        Ok(Self {
            metals: MetalsApiProvider::new(config)?,
            exchange: ExchangeRateApiProvider::new(config)?,
        })
    }

    pub fn from_parts(metals: MetalsApiProvider, exchange: ExchangeRateApiProvider) -> Self {
        Self { metals, exchange }
    }
}

#[async_trait::async_trait]
impl RateProvider for LiveRateProvider {
    async fn get_metal_unit_price(&self, metal: MetalSymbol, currency: Currency) -> Result<RateQuote, ZakatError> {
        self.metals.get_metal_unit_price(metal, currency).await
    }

    async fn get_exchange_rate(&self, base: Currency, target: Currency) -> Result<RateQuote, ZakatError> {
        self.exchange.get_exchange_rate(base, target).await
    }
}
