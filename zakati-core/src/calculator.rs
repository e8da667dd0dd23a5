//! Zakat arithmetic.
//!
//! `ZakatCalculator::compute` is a pure function of the declarations and a
//! [`RateSnapshot`]; `ZakatCalculator::calculate` first collects the snapshot
//! from a [`RateProvider`] and then delegates to it.
//!
//! All intermediate figures stay in the base currency. Only the four reported
//! quantities are converted and rounded, half away from zero, to 2 decimals.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::NisabConfig;
use crate::declarations::{checked_sum, AssetDeclaration, LiabilityDeclaration};
use crate::pricing::{RateProvider, RateQuote, RateSnapshot};
use crate::types::{CalculationStep, Currency, ZakatError};

/// Outcome of one calculation, in the output currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZakatResult {
    pub zakat_due: Decimal,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub nisab_threshold: Decimal,
    /// Currency all four figures above are reported in.
    pub currency: Currency,
    /// Whether net assets reached the nisab.
    pub is_payable: bool,
    /// Quotes the figures were derived from.
    pub rates: RateSnapshot,
    /// Step-by-step trace in the base currency.
    pub calculation_trace: Vec<CalculationStep>,
}

impl ZakatResult {
    /// Formats a reported figure with its currency, e.g. `"750.00 SAR"`.
    pub fn format_money(&self, value: Decimal) -> String {
        format!("{:.2} {}", value, self.currency)
    }

    /// Returns the Zakat due formatted with 2 decimal places.
    pub fn format_amount(&self) -> String {
        format!("{:.2}", self.zakat_due)
    }

    /// Generates a human-readable explanation of the calculation.
    pub fn explain(&self) -> String {
        use std::fmt::Write;
        let mut output = String::new();

        let width = self
            .calculation_trace
            .iter()
            .map(|step| step.description.len())
            .max()
            .unwrap_or(20)
            .max(20);

        let _ = writeln!(output, "Calculation in {} (reported in {}):", self.rates.base, self.currency);
        let _ = writeln!(output, "{:-<50}", "");
        for step in &self.calculation_trace {
            let _ = writeln!(output, "{}", step.render(width));
        }
        let _ = writeln!(output, "{:-<50}", "");
        let _ = writeln!(output, "Status: {}", if self.is_payable { "PAYABLE" } else { "EXEMPT" });
        let _ = writeln!(output, "Amount Due: {}", self.format_money(self.zakat_due));
        output
    }
}

impl std::fmt::Display for ZakatResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total Assets: {}", self.format_money(self.total_assets))?;
        writeln!(f, "Total Liabilities: {}", self.format_money(self.total_liabilities))?;
        writeln!(f, "Nisab Threshold: {}", self.format_money(self.nisab_threshold))?;
        write!(f, "Zakat Due: {}", self.format_money(self.zakat_due))
    }
}

/// Computes Zakat from declarations and rates.
#[derive(Debug, Clone, Default)]
pub struct ZakatCalculator {
    config: NisabConfig,
}

impl ZakatCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NisabConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NisabConfig {
        &self.config
    }

    /// Fetches gold, silver and exchange quotes from `provider`, then computes.
    ///
    /// Provider errors abort the calculation; fallback quotes flow through.
    #[instrument(skip_all, fields(base = %base, output = %output))]
    pub async fn calculate<P: RateProvider + ?Sized>(
        &self,
        provider: &P,
        assets: &AssetDeclaration,
        liabilities: &LiabilityDeclaration,
        base: Currency,
        output: Currency,
    ) -> Result<ZakatResult, ZakatError> {
        let rates = RateSnapshot::fetch(provider, base, output).await?;
        self.compute(assets, liabilities, &rates)
    }

    /// Pure computation against an already collected snapshot.
    pub fn compute(
        &self,
        assets: &AssetDeclaration,
        liabilities: &LiabilityDeclaration,
        rates: &RateSnapshot,
    ) -> Result<ZakatResult, ZakatError> {
        let gold_price = rates.gold.value;
        let silver_price = rates.silver.value;
        let mut trace = Vec::new();

        for (i, (category, amount)) in assets.entries().enumerate() {
            if i == 0 {
                trace.push(CalculationStep::initial(category.label(), amount));
            } else {
                trace.push(CalculationStep::add(category.label(), amount));
            }
        }

        let gold_value = metal_value(assets.gold_grams(), &rates.gold, "gold value")?;
        let silver_value = metal_value(assets.silver_grams(), &rates.silver, "silver value")?;
        trace.push(CalculationStep::add(
            format!("Gold ({}g x {})", assets.gold_grams(), gold_price),
            gold_value,
        ));
        trace.push(CalculationStep::add(
            format!("Silver ({}g x {})", assets.silver_grams(), silver_price),
            silver_value,
        ));

        let total_assets = checked_sum(
            [assets.monetary_total()?, gold_value, silver_value],
            "total assets",
        )?;
        trace.push(CalculationStep::result("Total Assets", total_assets));

        let total_liabilities = liabilities.total()?;
        trace.push(CalculationStep::subtract("Total Liabilities", total_liabilities));

        let net_assets = total_assets
            .checked_sub(total_liabilities)
            .ok_or_else(|| ZakatError::overflow("net assets"))?;
        trace.push(CalculationStep::result("Net Assets", net_assets));

        let nisab = self.config.threshold(gold_price, silver_price)?;
        trace.push(CalculationStep::compare("Nisab Threshold", nisab));
        for quote in [&rates.gold, &rates.silver] {
            if quote.is_fallback {
                trace.push(CalculationStep::info(format!("{} price unavailable; using {}", quote.pair, quote.value)));
            }
        }

        // Negative net wealth is never payable, even against a zero nisab.
        let is_payable = net_assets >= nisab && net_assets > Decimal::ZERO;
        let zakat_due = if is_payable {
            let due = net_assets
                .checked_mul(self.config.zakat_rate)
                .ok_or_else(|| ZakatError::overflow("zakat due"))?;
            trace.push(CalculationStep::rate("Zakat Rate", self.config.zakat_rate));
            trace.push(CalculationStep::result("Zakat Due", due));
            due
        } else {
            trace.push(CalculationStep::info("Net Assets below Nisab - No Zakat Due"));
            Decimal::ZERO
        };

        let multiplier = rates.exchange.value;
        trace.push(CalculationStep::rate(format!("Exchange Rate {}", rates.exchange.pair), multiplier));
        if rates.exchange.is_fallback {
            trace.push(CalculationStep::info(format!("{} rate unavailable; using 1", rates.exchange.pair)));
        }

        let result = ZakatResult {
            zakat_due: convert(zakat_due, multiplier, "zakat due conversion")?,
            total_assets: convert(total_assets, multiplier, "total assets conversion")?,
            total_liabilities: convert(total_liabilities, multiplier, "total liabilities conversion")?,
            nisab_threshold: convert(nisab, multiplier, "nisab conversion")?,
            currency: rates.output,
            is_payable,
            rates: rates.clone(),
            calculation_trace: trace,
        };

        debug!(net_assets = %net_assets, nisab = %nisab, "Computed base-currency figures");
        info!(
            zakat_due = %result.zakat_due,
            currency = %result.currency,
            payable = result.is_payable,
            "Zakat calculation complete"
        );
        Ok(result)
    }
}

/// Convenience wrapper using the default nisab configuration.
pub async fn calculate<P: RateProvider + ?Sized>(
    provider: &P,
    assets: &AssetDeclaration,
    liabilities: &LiabilityDeclaration,
    base: Currency,
    output: Currency,
) -> Result<ZakatResult, ZakatError> {
    ZakatCalculator::new().calculate(provider, assets, liabilities, base, output).await
}

fn metal_value(grams: Decimal, quote: &RateQuote, operation: &str) -> Result<Decimal, ZakatError> {
    grams
        .checked_mul(quote.value)
        .ok_or_else(|| ZakatError::overflow(operation))
}

/// Converts a base-currency figure and rounds it to exactly 2 decimal places.
fn convert(value: Decimal, multiplier: Decimal, operation: &str) -> Result<Decimal, ZakatError> {
    let converted = value
        .checked_mul(multiplier)
        .ok_or_else(|| ZakatError::overflow(operation))?;
    Ok(round_money(converted))
}

/// Rounds half away from zero and pads to a scale of 2.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::AssetCategory;
    use crate::types::Operation;
    use rust_decimal_macros::dec;

    fn snapshot(gold: Decimal, silver: Decimal, rate: Decimal) -> RateSnapshot {
        RateSnapshot::from_values(Currency::Sar, Currency::Usd, gold, silver, rate).unwrap()
    }

    fn cash(amount: i64) -> AssetDeclaration {
        AssetDeclaration::new().with(AssetCategory::Cash, amount).unwrap()
    }

    #[test]
    fn test_round_money_half_up_and_scale() {
        assert_eq!(round_money(dec!(2.345)).to_string(), "2.35");
        assert_eq!(round_money(dec!(2.344)).to_string(), "2.34");
        assert_eq!(round_money(dec!(-2.345)).to_string(), "-2.35");
        assert_eq!(round_money(dec!(1000)).to_string(), "1000.00");
        assert_eq!(round_money(Decimal::ZERO).scale(), 2);
    }

    #[test]
    fn test_metals_are_valued_by_weight() {
        let assets = AssetDeclaration::new().with_gold_grams(100).unwrap().with_silver_grams(1000).unwrap();
        let result = ZakatCalculator::new()
            .compute(&assets, &LiabilityDeclaration::new(), &snapshot(dec!(250), dec!(3), Decimal::ONE))
            .unwrap();
        // 100 * 250 + 1000 * 3
        assert_eq!(result.total_assets, dec!(28000.00));
        assert!(result.is_payable);
        assert_eq!(result.zakat_due, dec!(700.00));
    }

    #[test]
    fn test_liabilities_reduce_net_below_nisab() {
        let liabilities = LiabilityDeclaration::debts(10000).unwrap();
        let result = ZakatCalculator::new()
            .compute(&cash(30000), &liabilities, &snapshot(dec!(250), dec!(3), Decimal::ONE))
            .unwrap();
        // net 20000 < nisab 21250
        assert_eq!(result.total_liabilities, dec!(10000.00));
        assert!(!result.is_payable);
        assert_eq!(result.zakat_due, dec!(0.00));
    }

    #[test]
    fn test_net_exactly_at_nisab_is_payable() {
        let result = ZakatCalculator::new()
            .compute(&cash(21250), &LiabilityDeclaration::new(), &snapshot(dec!(250), dec!(3), Decimal::ONE))
            .unwrap();
        assert!(result.is_payable);
        assert_eq!(result.zakat_due, dec!(531.25));
    }

    #[test]
    fn test_negative_net_with_zero_nisab_is_not_payable() {
        let liabilities = LiabilityDeclaration::debts(500).unwrap();
        let result = ZakatCalculator::new()
            .compute(&cash(100), &liabilities, &snapshot(Decimal::ZERO, Decimal::ZERO, Decimal::ONE))
            .unwrap();
        assert!(!result.is_payable);
        assert_eq!(result.zakat_due, Decimal::ZERO);
        assert_eq!(result.nisab_threshold, Decimal::ZERO);
    }

    #[test]
    fn test_zero_net_with_zero_nisab_owes_nothing() {
        let result = ZakatCalculator::new()
            .compute(&AssetDeclaration::new(), &LiabilityDeclaration::new(), &snapshot(Decimal::ZERO, Decimal::ZERO, Decimal::ONE))
            .unwrap();
        assert_eq!(result.zakat_due, dec!(0.00));
    }

    #[test]
    fn test_conversion_rounds_each_field() {
        // 30000 * 0.333333 = 9999.99, nisab 21250 * 0.333333 = 7083.326...
        let result = ZakatCalculator::new()
            .compute(&cash(30000), &LiabilityDeclaration::new(), &snapshot(dec!(250), dec!(3), dec!(0.333333)))
            .unwrap();
        assert_eq!(result.total_assets, dec!(9999.99));
        assert_eq!(result.nisab_threshold, dec!(7083.33));
        assert_eq!(result.zakat_due, dec!(250.00));
        for value in [result.zakat_due, result.total_assets, result.total_liabilities, result.nisab_threshold] {
            assert_eq!(value.scale(), 2);
        }
    }

    #[test]
    fn test_trace_mentions_fallback_prices() {
        let rates = RateSnapshot {
            gold: RateQuote::fallback(crate::pricing::RatePair::Metal {
                metal: crate::types::MetalSymbol::Gold,
                currency: Currency::Sar,
            }),
            ..snapshot(dec!(250), dec!(3), Decimal::ONE)
        };
        let result = ZakatCalculator::new()
            .compute(&cash(100), &LiabilityDeclaration::new(), &rates)
            .unwrap();
        assert!(result
            .calculation_trace
            .iter()
            .any(|s| s.operation == Operation::Info && s.description.contains("XAU/SAR price unavailable")));
    }

    #[test]
    fn test_explain_and_display() {
        let result = ZakatCalculator::new()
            .compute(&cash(30000), &LiabilityDeclaration::new(), &snapshot(dec!(250), dec!(3), Decimal::ONE))
            .unwrap();
        let explanation = result.explain();
        assert!(explanation.contains("Calculation in SAR (reported in USD)"));
        assert!(explanation.contains("Nisab Threshold"));
        assert!(explanation.contains("Status: PAYABLE"));
        assert!(explanation.contains("Amount Due: 750.00 USD"));

        let display = result.to_string();
        assert_eq!(display.lines().count(), 4);
        assert!(display.starts_with("Total Assets: 30000.00 USD"));
        assert!(display.ends_with("Zakat Due: 750.00 USD"));
    }
}
