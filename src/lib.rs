//! # money-engine
//!
//! Exact money arithmetic over integer minor units.
//!
//! Amounts are stored as whole cents (or the currency's smallest unit), so
//! addition, splitting and allocation never lose or invent a minor unit.
//! Conversion goes through a pluggable exchange bank and rendering through
//! a currency- and locale-aware formatter.
//!
//! ## Architecture
//!
//! - **core**: Currencies, the static currency table, the `Money` value type
//! - **bank**: Exchange capability and the in-memory `VariableExchange`
//! - **allocation**: Even splits and ratio allocation (Largest Remainder)
//! - **format**: Decorated rendering with locale overrides
//! - **config**: Settings loaded from JSON

pub mod allocation;
pub mod bank;
pub mod config;
pub mod core;
pub mod error;
pub mod format;

pub use error::{MoneyError, Result};

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::bank::{ExchangeBank, VariableExchange};
    pub use crate::core::currency::{Currency, ToCurrency};
    pub use crate::core::iso;
    pub use crate::core::money::Money;
    pub use crate::error::{MoneyError, Result};
    pub use crate::format::{FormatOptions, Formatter, LocaleTable, NumberField};
}
