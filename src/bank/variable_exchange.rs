use crate::bank::ExchangeBank;
use crate::core::currency::{Currency, CurrencyPair, ToCurrency};
use crate::core::money::Money;
use crate::error::{MoneyError, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

static INSTANCE: Lazy<Arc<VariableExchange>> = Lazy::new(|| Arc::new(VariableExchange::new()));

/// One stored rate: 1 unit of `from` = `rate` units of `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    pub from: String,
    pub to: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
}

/// Exchange bank backed by a table of directional rates.
///
/// Rates are stored per direction: adding USD -> EUR says nothing about
/// EUR -> USD. Conversions round to whole minor units of the target
/// currency, halves away from zero unless built with another strategy.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use money_engine::bank::VariableExchange;
/// use money_engine::core::iso;
/// use money_engine::core::money::Money;
/// use rust_decimal_macros::dec;
///
/// let bank = Arc::new(VariableExchange::new());
/// bank.add_rate("BRL", "USD", dec!(0.20)).unwrap();
///
/// let reais = Money::new(1000_00, iso::BRL).with_bank(bank);
/// assert_eq!(reais.exchange_to("USD").unwrap(), Money::new(200_00, iso::USD));
/// assert!(reais.exchange_to(iso::EUR).is_err());
/// ```
#[derive(Debug)]
pub struct VariableExchange {
    rates: RwLock<HashMap<CurrencyPair, Decimal>>,
    rounding: RoundingStrategy,
}

impl Default for VariableExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableExchange {
    /// An empty, isolated bank.
    pub fn new() -> Self {
        Self::with_rounding(RoundingStrategy::MidpointAwayFromZero)
    }

    /// An empty bank that rounds converted amounts with `rounding`.
    pub fn with_rounding(rounding: RoundingStrategy) -> Self {
        Self {
            rates: RwLock::new(HashMap::new()),
            rounding,
        }
    }

    /// The process-wide shared bank, created on first use.
    pub fn instance() -> Arc<VariableExchange> {
        Arc::clone(&INSTANCE)
    }

    /// Store or overwrite the rate for one direction.
    pub fn add_rate(&self, from: impl ToCurrency, to: impl ToCurrency, rate: Decimal) -> Result<()> {
        let from = Currency::wrap(from)?;
        let to = Currency::wrap(to)?;
        if rate <= Decimal::ZERO {
            return Err(MoneyError::InvalidRate {
                from: from.code().to_string(),
                to: to.code().to_string(),
                rate,
            });
        }
        let pair = CurrencyPair::new(from, to);
        debug!("storing rate {} = {}", pair, rate);
        self.rates.write().insert(pair, rate);
        Ok(())
    }

    /// Alias of [`VariableExchange::add_rate`].
    pub fn set_rate(&self, from: impl ToCurrency, to: impl ToCurrency, rate: Decimal) -> Result<()> {
        self.add_rate(from, to, rate)
    }

    pub fn get_rate(&self, from: Currency, to: Currency) -> Option<Decimal> {
        self.rates.read().get(&CurrencyPair::new(from, to)).copied()
    }

    /// Number of stored directional rates.
    pub fn len(&self) -> usize {
        self.rates.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.read().is_empty()
    }

    /// All rates as JSON, sorted by pair.
    pub fn export_rates(&self) -> Result<String> {
        let mut entries: Vec<RateEntry> = self
            .rates
            .read()
            .iter()
            .map(|(pair, rate)| RateEntry {
                from: pair.from.code().to_string(),
                to: pair.to.code().to_string(),
                rate: *rate,
            })
            .collect();
        entries.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));
        Ok(serde_json::to_string(&entries)?)
    }

    /// Load rates exported by [`VariableExchange::export_rates`].
    ///
    /// Entries naming unknown currencies or non-positive rates are skipped.
    /// Returns how many rates were stored.
    pub fn import_rates(&self, json: &str) -> Result<usize> {
        let entries: Vec<RateEntry> = serde_json::from_str(json)?;
        let mut stored = 0;
        for entry in entries {
            match self.add_rate(entry.from.as_str(), entry.to.as_str(), entry.rate) {
                Ok(()) => stored += 1,
                Err(e) => warn!("skipping rate {} -> {}: {}", entry.from, entry.to, e),
            }
        }
        Ok(stored)
    }
}

impl ExchangeBank for VariableExchange {
    fn exchange_with(&self, from: &Money, to: Currency) -> Result<Money> {
        let source = from.currency();
        if source == to {
            return Ok(from.clone());
        }
        let rate = self
            .get_rate(source, to)
            .ok_or_else(|| MoneyError::UnknownRate {
                from: source.code().to_string(),
                to: to.code().to_string(),
            })?;

        // cents / from_subunit * rate * to_subunit, dividing last to stay exact
        let raw = Decimal::from(from.cents())
            .checked_mul(rate)
            .and_then(|v| v.checked_mul(Decimal::from(to.subunit_to_unit())))
            .and_then(|v| v.checked_div(Decimal::from(source.subunit_to_unit())))
            .ok_or(MoneyError::Overflow)?;
        let cents = raw
            .round_dp_with_strategy(0, self.rounding)
            .to_i64()
            .ok_or(MoneyError::Overflow)?;

        debug!("converted {} {} to {} {} at {}", from.cents(), source, cents, to, rate);
        Ok(Money::from_parts(cents, to, Arc::clone(from.bank())))
    }
}
