//! Exchange banks: sources of currency conversion.

pub mod variable_exchange;

pub use variable_exchange::{RateEntry, VariableExchange};

use crate::core::currency::Currency;
use crate::core::money::Money;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// The capability every exchange source provides: turn an amount in one
/// currency into an amount in another.
///
/// Implementations must not mutate `from` and must return a value
/// denominated in `to`.
pub trait ExchangeBank: fmt::Debug + Send + Sync {
    fn exchange_with(&self, from: &Money, to: Currency) -> Result<Money>;
}

/// Whether two handles point at the same bank instance.
pub fn same_bank(a: &Arc<dyn ExchangeBank>, b: &Arc<dyn ExchangeBank>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
