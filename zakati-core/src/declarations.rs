//! User declarations: what is owned and what is owed.
//!
//! Declarations are validated on construction (every amount and weight must
//! be non-negative) and are read-only afterwards.

use rust_decimal::Decimal;
use serde::Serialize;
use strum::{EnumIter, IntoEnumIterator};

use crate::inputs::{non_negative, IntoZakatDecimal};
use crate::types::ZakatError;

/// Monetary asset categories, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Cash,
    BankSavings,
    Investments,
    Livestock,
    Crops,
    BusinessInventory,
}

impl AssetCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AssetCategory::Cash => "Cash in Hand",
            AssetCategory::BankSavings => "Bank Savings",
            AssetCategory::Investments => "Investments",
            AssetCategory::Livestock => "Livestock Value",
            AssetCategory::Crops => "Agricultural Produce Value",
            AssetCategory::BusinessInventory => "Business Inventory Value",
        }
    }

    fn field(&self) -> &'static str {
        match self {
            AssetCategory::Cash => "cash",
            AssetCategory::BankSavings => "bank_savings",
            AssetCategory::Investments => "investments",
            AssetCategory::Livestock => "livestock",
            AssetCategory::Crops => "crops",
            AssetCategory::BusinessInventory => "business_inventory",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

const CATEGORY_COUNT: usize = 6;

/// Declared assets in the base currency plus metal holdings in grams.
///
/// ```rust
/// use zakati_core::prelude::*;
///
/// let assets = AssetDeclaration::new()
///     .with(AssetCategory::Cash, 1000)?
///     .with(AssetCategory::BankSavings, "2500.50")?
///     .with_gold_grams(20)?;
/// assert_eq!(assets.monetary_total()?, rust_decimal_macros::dec!(3500.50));
/// # Ok::<(), ZakatError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetDeclaration {
    amounts: [Decimal; CATEGORY_COUNT],
    gold_grams: Decimal,
    silver_grams: Decimal,
}

impl AssetDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a declaration from the six amounts in `AssetCategory` order.
    pub fn from_amounts<T: IntoZakatDecimal>(
        amounts: [T; CATEGORY_COUNT],
        gold_grams: impl IntoZakatDecimal,
        silver_grams: impl IntoZakatDecimal,
    ) -> Result<Self, ZakatError> {
        let mut declaration = Self::new();
        for (category, amount) in AssetCategory::iter().zip(amounts) {
            declaration = declaration.with(category, amount)?;
        }
        declaration.with_gold_grams(gold_grams)?.with_silver_grams(silver_grams)
    }

    pub fn with(mut self, category: AssetCategory, amount: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        self.amounts[category.index()] = non_negative(category.field(), amount)?;
        Ok(self)
    }

    pub fn with_gold_grams(mut self, grams: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        self.gold_grams = non_negative("gold_grams", grams)?;
        Ok(self)
    }

    pub fn with_silver_grams(mut self, grams: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        self.silver_grams = non_negative("silver_grams", grams)?;
        Ok(self)
    }

    pub fn amount(&self, category: AssetCategory) -> Decimal {
        self.amounts[category.index()]
    }

    /// Every monetary amount paired with its category, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (AssetCategory, Decimal)> + '_ {
        AssetCategory::iter().map(|c| (c, self.amount(c)))
    }

    pub fn gold_grams(&self) -> Decimal {
        self.gold_grams
    }

    pub fn silver_grams(&self) -> Decimal {
        self.silver_grams
    }

    /// Sum of the monetary amounts, excluding metals.
    pub fn monetary_total(&self) -> Result<Decimal, ZakatError> {
        checked_sum(self.amounts.iter().copied(), "sum of declared assets")
    }
}

/// A single named debt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Liability {
    pub label: String,
    pub amount: Decimal,
}

/// Declared liabilities in the base currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiabilityDeclaration {
    entries: Vec<Liability>,
}

impl LiabilityDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// A declaration holding one "Outstanding Debts" entry.
    pub fn debts(amount: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        Self::new().with_debt("Outstanding Debts", amount)
    }

    pub fn with_debt(mut self, label: impl Into<String>, amount: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        let label = label.into();
        let amount = non_negative("debts", amount)?;
        self.entries.push(Liability { label, amount });
        Ok(self)
    }

    pub fn entries(&self) -> &[Liability] {
        &self.entries
    }

    pub fn total(&self) -> Result<Decimal, ZakatError> {
        checked_sum(self.entries.iter().map(|l| l.amount), "sum of liabilities")
    }
}

pub(crate) fn checked_sum(values: impl IntoIterator<Item = Decimal>, operation: &str) -> Result<Decimal, ZakatError> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(|| ZakatError::overflow(operation))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_amounts_keeps_order() {
        let assets = AssetDeclaration::from_amounts([1, 2, 3, 4, 5, 6], 10, 20).unwrap();
        let amounts: Vec<Decimal> = assets.entries().map(|(_, v)| v).collect();
        assert_eq!(amounts, vec![dec!(1), dec!(2), dec!(3), dec!(4), dec!(5), dec!(6)]);
        assert_eq!(assets.amount(AssetCategory::BusinessInventory), dec!(6));
        assert_eq!(assets.gold_grams(), dec!(10));
        assert_eq!(assets.silver_grams(), dec!(20));
        assert_eq!(assets.monetary_total().unwrap(), dec!(21));
    }

    #[test]
    fn test_negative_amount_rejected_with_field_name() {
        let err = AssetDeclaration::new().with(AssetCategory::Livestock, -1).unwrap_err();
        assert_eq!(err, ZakatError::invalid_input("livestock", "must be non-negative"));

        let err = AssetDeclaration::new().with_silver_grams(-0.5).unwrap_err();
        assert!(matches!(err, ZakatError::InvalidInput { ref field, .. } if field == "silver_grams"));
    }

    #[test]
    fn test_liabilities_total() {
        let liabilities = LiabilityDeclaration::new()
            .with_debt("Car Loan", 1200)
            .unwrap()
            .with_debt("Credit Card", "300.25")
            .unwrap();
        assert_eq!(liabilities.entries().len(), 2);
        assert_eq!(liabilities.total().unwrap(), dec!(1500.25));
        assert_eq!(LiabilityDeclaration::new().total().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_negative_debt_rejected() {
        let err = LiabilityDeclaration::debts(-10).unwrap_err();
        assert_eq!(err, ZakatError::invalid_input("debts", "must be non-negative"));

        let err = LiabilityDeclaration::new().with_debt("Car Loan", "-0.01").unwrap_err();
        assert!(matches!(err, ZakatError::InvalidInput { ref field, .. } if field == "debts"));
    }

    #[test]
    fn test_overflow_is_reported() {
        let assets = AssetDeclaration::new()
            .with(AssetCategory::Cash, Decimal::MAX)
            .unwrap()
            .with(AssetCategory::Crops, Decimal::MAX)
            .unwrap();
        assert!(matches!(assets.monetary_total(), Err(ZakatError::Overflow { .. })));
    }
}
