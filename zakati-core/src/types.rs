use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

/// Currencies a declaration may be denominated in, or reported in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Sar,
    Usd,
    Eur,
    Pkr,
    Inr,
    Gbp,
}

impl Currency {
    /// Three-letter ISO code, e.g. `"SAR"`.
    pub fn code(&self) -> &'static str {
        self.into()
    }

    /// Parses a three-letter code (case-insensitive).
    pub fn parse_code(code: &str) -> Result<Self, ZakatError> {
        code.trim().parse::<Currency>().map_err(|_| {
            ZakatError::invalid_input(
                "currency",
                format!(
                    "'{}' is not supported (expected one of {})",
                    code,
                    Currency::supported_codes().join(", ")
                ),
            )
        })
    }

    pub fn supported_codes() -> Vec<&'static str> {
        Currency::iter().map(|c| c.code()).collect()
    }
}

/// The two metals a nisab can be pegged to, keyed by their market symbols.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum MetalSymbol {
    #[strum(serialize = "XAU")]
    #[serde(rename = "XAU")]
    Gold,
    #[strum(serialize = "XAG")]
    #[serde(rename = "XAG")]
    Silver,
}

impl MetalSymbol {
    /// Market symbol used by price feeds (`XAU` / `XAG`).
    pub fn symbol(&self) -> &'static str {
        self.into()
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetalSymbol::Gold => "Gold",
            MetalSymbol::Silver => "Silver",
        }
    }
}

/// Kind of step in a calculation trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Initial,
    Add,
    Subtract,
    Compare,
    Rate,
    Result,
    Info,
}

impl Operation {
    fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Rate => "x",
            Operation::Result => "=",
            Operation::Compare => "?",
            Operation::Initial | Operation::Info => " ",
        }
    }
}

/// Represents a single step in the Zakat calculation process.
///
/// Steps are recorded in the base currency, before conversion, so a user can
/// follow every figure back to their own inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationStep {
    /// Human-readable description of what this step does.
    pub description: String,
    /// The value at this step (if applicable).
    pub amount: Option<Decimal>,
    pub operation: Operation,
}

impl CalculationStep {
    fn with(operation: Operation, description: impl Into<String>, amount: Option<Decimal>) -> Self {
        Self {
            description: description.into(),
            amount,
            operation,
        }
    }

    pub fn initial(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Initial, description, Some(amount))
    }

    pub fn add(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Add, description, Some(amount))
    }

    pub fn subtract(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Subtract, description, Some(amount))
    }

    pub fn compare(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Compare, description, Some(amount))
    }

    pub fn rate(description: impl Into<String>, rate: Decimal) -> Self {
        Self::with(Operation::Rate, description, Some(rate))
    }

    pub fn result(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Result, description, Some(amount))
    }

    pub fn info(description: impl Into<String>) -> Self {
        Self::with(Operation::Info, description, None)
    }

    /// Renders the step as one aligned line of an explanation.
    pub fn render(&self, width: usize) -> String {
        match (self.operation, self.amount) {
            (Operation::Info, _) | (_, None) => format!("  INFO: {}", self.description),
            (Operation::Rate, Some(amount)) => format!(
                "  {:<width$} : {} {:>14}",
                self.description,
                self.operation.symbol(),
                format!("{:.4}", amount),
                width = width
            ),
            (_, Some(amount)) => format!(
                "  {:<width$} : {} {:>14}",
                self.description,
                self.operation.symbol(),
                format!("{:.2}", amount),
                width = width
            ),
        }
    }
}

/// Errors produced while collecting rates or computing a result.
///
/// A calculation either yields a complete result or one of these; partial
/// results are never returned.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ZakatError {
    #[error("Invalid Input [{field}]: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Transport failure or non-success status from a rate source.
    #[error("Network Error: {0}")]
    Network(String),

    /// A rate source answered with a body that could not be parsed.
    #[error("Upstream Format Error: {0}")]
    UpstreamFormat(String),

    #[error("Configuration Error: {0}")]
    Configuration(String),

    #[error("Arithmetic Overflow: Operation '{operation}' failed")]
    Overflow { operation: String },
}

impl ZakatError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ZakatError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn overflow(operation: impl Into<String>) -> Self {
        ZakatError::Overflow {
            operation: operation.into(),
        }
    }

    /// Whether repeating the same request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ZakatError::Network(_))
    }

    /// Message suitable for showing to the person running the calculation.
    pub fn user_message(&self) -> String {
        match self {
            ZakatError::Network(_) | ZakatError::UpstreamFormat(_) => {
                "Price service unavailable, please retry.".to_string()
            }
            other => other.to_string(),
        }
    }
}
