//! Error types for money operations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for money operations.
pub type Result<T> = std::result::Result<T, MoneyError>;

/// Errors that can occur while resolving currencies, doing arithmetic,
/// converting, allocating or loading settings.
#[derive(Debug, Error)]
pub enum MoneyError {
    /// The code is not present in the currency table.
    #[error("unknown currency: {code}")]
    UnknownCurrency { code: String },

    /// Arithmetic or comparison between two different currencies.
    #[error("currency mismatch: cannot combine {left} with {right}")]
    CurrencyMismatch { left: String, right: String },

    /// No rate is stored for the requested direction.
    #[error("no exchange rate available for {from} -> {to}")]
    UnknownRate { from: String, to: String },

    /// Rates must be strictly positive.
    #[error("exchange rate must be positive, got {rate} for {from} -> {to}")]
    InvalidRate {
        from: String,
        to: String,
        rate: Decimal,
    },

    /// Bad input to split or allocate.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The result does not fit in 64-bit minor units.
    #[error("arithmetic overflow")]
    Overflow,

    /// Rate table or settings could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Settings file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MoneyError {
    pub(crate) fn mismatch(left: &str, right: &str) -> Self {
        MoneyError::CurrencyMismatch {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}
