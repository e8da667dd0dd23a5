//! Holdings entered on the command line or through the wizard.

use clap::Args;
use rust_decimal::Decimal;
use zakati_core::prelude::*;

/// The six monetary categories, metal weights and debts, all in the base currency.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct HoldingsInput {
    /// Cash on hand
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub cash: Decimal,

    /// Bank savings
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub bank_savings: Decimal,

    /// Investments (stocks, funds)
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub investments: Decimal,

    /// Value of livestock
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub livestock: Decimal,

    /// Value of crops
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub crops: Decimal,

    /// Value of business inventory
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub business_inventory: Decimal,

    /// Gold held, in grams
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub gold_grams: Decimal,

    /// Silver held, in grams
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub silver_grams: Decimal,

    /// Outstanding debts
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub debts: Decimal,
}

impl HoldingsInput {
    /// Amounts in `AssetCategory` order.
    pub fn amounts(&self) -> [Decimal; 6] {
        [
            self.cash,
            self.bank_savings,
            self.investments,
            self.livestock,
            self.crops,
            self.business_inventory,
        ]
    }

    pub fn set_amount(&mut self, category: AssetCategory, amount: Decimal) {
        let slot = match category {
            AssetCategory::Cash => &mut self.cash,
            AssetCategory::BankSavings => &mut self.bank_savings,
            AssetCategory::Investments => &mut self.investments,
            AssetCategory::Livestock => &mut self.livestock,
            AssetCategory::Crops => &mut self.crops,
            AssetCategory::BusinessInventory => &mut self.business_inventory,
        };
        *slot = amount;
    }

    /// Validates every value and builds the declarations the calculator takes.
    pub fn to_declarations(&self) -> Result<(AssetDeclaration, LiabilityDeclaration), ZakatError> {
        let assets = AssetDeclaration::from_amounts(self.amounts(), self.gold_grams, self.silver_grams)?;
        let liabilities = if self.debts.is_zero() {
            LiabilityDeclaration::new()
        } else {
            LiabilityDeclaration::debts(self.debts)?
        };
        Ok((assets, liabilities))
    }
}

/// `clap` value parser for currency codes.
pub fn parse_currency(code: &str) -> Result<Currency, String> {
    Currency::parse_code(code).map_err(|e| e.to_string())
}
