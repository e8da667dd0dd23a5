//! # zakati-providers
//!
//! Live implementations of [`zakati_core::RateProvider`]:
//!
//! - [`MetalsApiProvider`]: gold and silver prices (`XAU`, `XAG`).
//! - [`ExchangeRateApiProvider`]: currency conversion multipliers.
//! - [`LiveRateProvider`]: both of the above behind one provider.
//!
//! Every call performs a fresh request. A request that fails or returns an
//! unreadable body is an error; a readable body without the requested entry
//! yields the documented fallback (`0` for prices, `1` for exchange rates).

pub mod config;
pub mod exchange;
pub mod http;
pub mod live;
pub mod metals;

pub use config::{ApiKey, NetworkConfig, ProviderConfig};
pub use exchange::ExchangeRateApiProvider;
pub use live::LiveRateProvider;
pub use metals::MetalsApiProvider;
pub use zakati_core::pricing::{RateProvider, RateQuote, StaticRateProvider};
