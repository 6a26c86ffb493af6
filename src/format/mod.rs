//! Currency- and locale-aware rendering of money values.
//!
//! Option values are resolved in this order: explicit [`FormatOptions`],
//! the locale override for the formatter's locale, the currency's own
//! metadata, and finally the global defaults.

pub mod formatter;
pub mod locale;
pub mod options;

pub use formatter::Formatter;
pub use locale::{LocaleOverrides, LocaleTable, NumberField};
pub use options::{FormatOptions, SymbolOption};
