//! Pricing module for Zakat calculations.
//!
//! The `RateProvider` trait is the seam between the calculator and the
//! outside world: live HTTP sources live in `zakati-providers`, while
//! `StaticRateProvider` serves fixed values for tests and manual entry.
//!
//! Quotes are never cached; every call asks the provider again.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::inputs::{non_negative, IntoZakatDecimal};
use crate::types::{Currency, MetalSymbol, ZakatError};

/// Value used when a well-formed metal price response has no entry.
pub const METAL_PRICE_FALLBACK: Decimal = Decimal::ZERO;
/// Value used when a well-formed exchange response has no entry.
pub const EXCHANGE_RATE_FALLBACK: Decimal = Decimal::ONE;

/// What a quote is a price of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RatePair {
    /// Price of one unit of `metal`, in `currency`.
    Metal { metal: MetalSymbol, currency: Currency },
    /// Multiplier converting an amount in `base` into `target`.
    Exchange { base: Currency, target: Currency },
}

impl std::fmt::Display for RatePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatePair::Metal { metal, currency } => write!(f, "{}/{}", metal, currency),
            RatePair::Exchange { base, target } => write!(f, "{}->{}", base, target),
        }
    }
}

/// A single price or rate, tagged with the pair it applies to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateQuote {
    pub pair: RatePair,
    pub value: Decimal,
    /// True when the source had no entry and the documented fallback was used.
    pub is_fallback: bool,
}

impl RateQuote {
    pub fn new(pair: RatePair, value: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        let field = match pair {
            RatePair::Metal { .. } => "metal_price",
            RatePair::Exchange { .. } => "exchange_rate",
        };
        Ok(Self {
            pair,
            value: non_negative(field, value)?,
            is_fallback: false,
        })
    }

    /// The degraded value for `pair`: `0` for a metal price, `1` for an
    /// exchange rate.
    pub fn fallback(pair: RatePair) -> Self {
        let value = match pair {
            RatePair::Metal { .. } => METAL_PRICE_FALLBACK,
            RatePair::Exchange { .. } => EXCHANGE_RATE_FALLBACK,
        };
        Self {
            pair,
            value,
            is_fallback: true,
        }
    }

    pub fn metal(metal: MetalSymbol, currency: Currency, value: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        Self::new(RatePair::Metal { metal, currency }, value)
    }

    pub fn exchange(base: Currency, target: Currency, value: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        Self::new(RatePair::Exchange { base, target }, value)
    }
}

/// Trait for fetching current metal prices and exchange rates.
///
/// Implementors must return the fallback quote (see [`RateQuote::fallback`])
/// when an otherwise well-formed response has no entry for the pair, and an
/// error when the request itself fails.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// Price of one unit of `metal` denominated in `currency`.
    async fn get_metal_unit_price(&self, metal: MetalSymbol, currency: Currency) -> Result<RateQuote, ZakatError>;

    /// Multiplier converting an amount in `base` into `target`.
    async fn get_exchange_rate(&self, base: Currency, target: Currency) -> Result<RateQuote, ZakatError>;
}

#[async_trait::async_trait]
impl<P: RateProvider + ?Sized> RateProvider for Box<P> {
    async fn get_metal_unit_price(&self, metal: MetalSymbol, currency: Currency) -> Result<RateQuote, ZakatError> {
        (**self).get_metal_unit_price(metal, currency).await
    }

    async fn get_exchange_rate(&self, base: Currency, target: Currency) -> Result<RateQuote, ZakatError> {
        (**self).get_exchange_rate(base, target).await
    }
}

/// The three quotes one calculation is based on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSnapshot {
    pub base: Currency,
    pub output: Currency,
    pub gold: RateQuote,
    pub silver: RateQuote,
    pub exchange: RateQuote,
}

impl RateSnapshot {
    /// Requests all three quotes concurrently. Any failure fails the snapshot.
    pub async fn fetch<P: RateProvider + ?Sized>(
        provider: &P,
        base: Currency,
        output: Currency,
    ) -> Result<Self, ZakatError> {
        let (gold, silver, exchange) = futures::try_join!(
            provider.get_metal_unit_price(MetalSymbol::Gold, base),
            provider.get_metal_unit_price(MetalSymbol::Silver, base),
            provider.get_exchange_rate(base, output),
        )?;

        for quote in [&gold, &silver, &exchange] {
            if quote.is_fallback {
                tracing::warn!(pair = %quote.pair, value = %quote.value, "Rate unavailable; using fallback value");
            }
        }

        Ok(Self { base, output, gold, silver, exchange })
    }

    /// Builds a snapshot from known values.
    pub fn from_values(
        base: Currency,
        output: Currency,
        gold_price: impl IntoZakatDecimal,
        silver_price: impl IntoZakatDecimal,
        exchange_rate: impl IntoZakatDecimal,
    ) -> Result<Self, ZakatError> {
        Ok(Self {
            base,
            output,
            gold: RateQuote::metal(MetalSymbol::Gold, base, gold_price)?,
            silver: RateQuote::metal(MetalSymbol::Silver, base, silver_price)?,
            exchange: RateQuote::exchange(base, output, exchange_rate)?,
        })
    }

    pub fn uses_fallback(&self) -> bool {
        self.gold.is_fallback || self.silver.is_fallback || self.exchange.is_fallback
    }
}

/// A static rate provider for testing and manual price entry.
///
/// Prices are per unit in whatever currency is asked for. A metal without a
/// configured price behaves like a feed with no entry for it.
#[derive(Debug, Clone, Default)]
pub struct StaticRateProvider {
    gold: Option<Decimal>,
    silver: Option<Decimal>,
    exchange_rate: Option<Decimal>,
}

impl StaticRateProvider {
    pub fn new(
        gold_per_unit: impl IntoZakatDecimal,
        silver_per_unit: impl IntoZakatDecimal,
    ) -> Result<Self, ZakatError> {
        Ok(Self {
            gold: Some(non_negative("gold_price", gold_per_unit)?),
            silver: Some(non_negative("silver_price", silver_per_unit)?),
            exchange_rate: None,
        })
    }

    /// A provider whose metal feed has no entries at all.
    pub fn without_metal_prices() -> Self {
        Self::default()
    }

    /// Uses `rate` for every exchange request.
    pub fn with_exchange_rate(mut self, rate: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        self.exchange_rate = Some(non_negative("exchange_rate", rate)?);
        Ok(self)
    }
}

#[async_trait::async_trait]
impl RateProvider for StaticRateProvider {
    async fn get_metal_unit_price(&self, metal: MetalSymbol, currency: Currency) -> Result<RateQuote, ZakatError> {
        let price = match metal {
            MetalSymbol::Gold => self.gold,
            MetalSymbol::Silver => self.silver,
        };
        match price {
            Some(p) => RateQuote::metal(metal, currency, p),
            None => Ok(RateQuote::fallback(RatePair::Metal { metal, currency })),
        }
    }

    async fn get_exchange_rate(&self, base: Currency, target: Currency) -> Result<RateQuote, ZakatError> {
        match self.exchange_rate {
            Some(rate) => RateQuote::exchange(base, target, rate),
            None if base == target => RateQuote::exchange(base, target, Decimal::ONE),
            None => Ok(RateQuote::fallback(RatePair::Exchange { base, target })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_rejects_negative() {
        assert!(RateQuote::metal(MetalSymbol::Gold, Currency::Usd, -10).is_err());
        assert!(RateQuote::exchange(Currency::Usd, Currency::Sar, dec!(-3.75)).is_err());
    }

    #[test]
    fn test_fallback_values() {
        let gold = RateQuote::fallback(RatePair::Metal { metal: MetalSymbol::Gold, currency: Currency::Sar });
        assert_eq!(gold.value, Decimal::ZERO);
        assert!(gold.is_fallback);

        let fx = RateQuote::fallback(RatePair::Exchange { base: Currency::Sar, target: Currency::Usd });
        assert_eq!(fx.value, Decimal::ONE);
        assert!(fx.is_fallback);
    }

    #[test]
    fn test_pair_display() {
        let pair = RatePair::Metal { metal: MetalSymbol::Silver, currency: Currency::Pkr };
        assert_eq!(pair.to_string(), "XAG/PKR");
        let pair = RatePair::Exchange { base: Currency::Usd, target: Currency::Gbp };
        assert_eq!(pair.to_string(), "USD->GBP");
    }

    #[tokio::test]
    async fn test_static_provider_quotes() {
        let provider = StaticRateProvider::new(250, 3).unwrap().with_exchange_rate(dec!(3.75)).unwrap();
        let gold = provider.get_metal_unit_price(MetalSymbol::Gold, Currency::Sar).await.unwrap();
        assert_eq!(gold.value, dec!(250));
        assert_eq!(gold.pair, RatePair::Metal { metal: MetalSymbol::Gold, currency: Currency::Sar });

        let fx = provider.get_exchange_rate(Currency::Usd, Currency::Sar).await.unwrap();
        assert_eq!(fx.value, dec!(3.75));
        assert!(!fx.is_fallback);
    }

    #[tokio::test]
    async fn test_static_provider_identity_and_fallback() {
        let provider = StaticRateProvider::without_metal_prices();
        let silver = provider.get_metal_unit_price(MetalSymbol::Silver, Currency::Eur).await.unwrap();
        assert!(silver.is_fallback);
        assert_eq!(silver.value, Decimal::ZERO);

        let same = provider.get_exchange_rate(Currency::Eur, Currency::Eur).await.unwrap();
        assert_eq!(same.value, Decimal::ONE);
        assert!(!same.is_fallback);

        let unknown = provider.get_exchange_rate(Currency::Eur, Currency::Inr).await.unwrap();
        assert!(unknown.is_fallback);
    }

    #[tokio::test]
    async fn test_snapshot_fetch_collects_all_three() {
        let provider = StaticRateProvider::new(250, 3).unwrap();
        let snapshot = RateSnapshot::fetch(&provider, Currency::Sar, Currency::Sar).await.unwrap();
        assert_eq!(snapshot.gold.value, dec!(250));
        assert_eq!(snapshot.silver.value, dec!(3));
        assert_eq!(snapshot.exchange.value, Decimal::ONE);
        assert!(!snapshot.uses_fallback());
    }
}
