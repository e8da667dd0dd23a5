use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::inputs::{non_negative, IntoZakatDecimal};
use crate::types::ZakatError;

/// Portion of qualifying net wealth due as Zakat (2.5%).
pub const ZAKAT_RATE: Decimal = dec!(0.025);
/// Grams of gold that make up the gold nisab.
pub const NISAB_GOLD_GRAMS: Decimal = dec!(85);
/// Grams of silver that make up the silver nisab.
pub const NISAB_SILVER_GRAMS: Decimal = dec!(595);

/// Thresholds and rate used by the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NisabConfig {
    pub gold_grams: Decimal,
    pub silver_grams: Decimal,
    pub zakat_rate: Decimal,
}

impl Default for NisabConfig {
    fn default() -> Self {
        Self {
            gold_grams: NISAB_GOLD_GRAMS,
            silver_grams: NISAB_SILVER_GRAMS,
            zakat_rate: ZAKAT_RATE,
        }
    }
}

impl NisabConfig {
    pub fn with_gold_grams(mut self, grams: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        self.gold_grams = non_negative("nisab_gold_grams", grams)?;
        Ok(self)
    }

    pub fn with_silver_grams(mut self, grams: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        self.silver_grams = non_negative("nisab_silver_grams", grams)?;
        Ok(self)
    }

    /// Monetary nisab for the given per-unit metal prices.
    ///
    /// Takes the larger of the gold and silver thresholds.
    // NOTE: the usual convention for cash is the lower of the two. Kept as max
    // until the rule is confirmed.
    pub fn threshold(&self, gold_price: Decimal, silver_price: Decimal) -> Result<Decimal, ZakatError> {
        let gold = self
            .gold_grams
            .checked_mul(gold_price)
            .ok_or_else(|| ZakatError::overflow("gold nisab value"))?;
        let silver = self
            .silver_grams
            .checked_mul(silver_price)
            .ok_or_else(|| ZakatError::overflow("silver nisab value"))?;
        Ok(gold.max(silver))
    }
}
