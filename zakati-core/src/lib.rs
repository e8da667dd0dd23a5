//! # zakati-core
//!
//! Data model, rate-provider contract and arithmetic for computing Zakat on
//! cash, commodity and precious-metal holdings.
//!
//! ```rust
//! use zakati_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let assets = AssetDeclaration::new().with(AssetCategory::Cash, 30000)?;
//! let rates = RateSnapshot::from_values(Currency::Sar, Currency::Sar, 250, 3, 1)?;
//! let result = ZakatCalculator::new().compute(&assets, &LiabilityDeclaration::new(), &rates)?;
//! assert_eq!(result.zakat_due, dec!(750.00));
//! # Ok::<(), ZakatError>(())
//! ```

pub mod calculator;
pub mod config;
pub mod declarations;
pub mod inputs;
pub mod prelude;
pub mod pricing;
pub mod types;

pub use calculator::{calculate, ZakatCalculator, ZakatResult};
pub use config::NisabConfig;
pub use pricing::{RateProvider, RateQuote, RateSnapshot};
pub use types::{Currency, MetalSymbol, ZakatError};
