//! Prelude module for zakati-core.
//!
//! ```rust
//! use zakati_core::prelude::*;
//! ```

pub use crate::calculator::{calculate, round_money, ZakatCalculator, ZakatResult};
pub use crate::config::{NisabConfig, NISAB_GOLD_GRAMS, NISAB_SILVER_GRAMS, ZAKAT_RATE};
pub use crate::declarations::{AssetCategory, AssetDeclaration, Liability, LiabilityDeclaration};
pub use crate::inputs::IntoZakatDecimal;
pub use crate::pricing::{RatePair, RateProvider, RateQuote, RateSnapshot, StaticRateProvider};
pub use crate::types::{CalculationStep, Currency, MetalSymbol, Operation, ZakatError};
