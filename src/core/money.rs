use crate::allocation::allocator;
use crate::bank::{ExchangeBank, VariableExchange};
use crate::core::currency::{Currency, ToCurrency};
use crate::core::iso;
use crate::error::{MoneyError, Result};
use crate::format::formatter::{self, Formatter};
use crate::format::options::FormatOptions;
use log::debug;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

static DEFAULT_CURRENCY: RwLock<Currency> = parking_lot::const_rwlock(iso::USD);

static DEFAULT_BANK: Lazy<RwLock<Arc<dyn ExchangeBank>>> = Lazy::new(|| {
    let shared: Arc<dyn ExchangeBank> = VariableExchange::instance();
    RwLock::new(shared)
});

/// Round to a whole number of minor units, halves away from zero.
pub(crate) fn round_to_cents(amount: Decimal) -> Result<i64> {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(MoneyError::Overflow)
}

/// An exact amount of money: an integer count of minor units in a currency.
///
/// Every value is attached to an [`ExchangeBank`] used by
/// [`Money::exchange_to`]. The bank takes no part in equality or hashing.
///
/// # Examples
///
/// ```
/// use money_engine::core::iso;
/// use money_engine::core::money::Money;
///
/// let price = Money::new(10_00, iso::USD);
/// assert_eq!(price.to_string(), "10.00");
///
/// let shares = Money::us_dollar(100).split(3).unwrap();
/// let cents: Vec<i64> = shares.iter().map(Money::cents).collect();
/// assert_eq!(cents, vec![34, 33, 33]);
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "MoneyRecord", into = "MoneyRecord")]
pub struct Money {
    cents: i64,
    currency: Currency,
    bank: Arc<dyn ExchangeBank>,
}

/// Wire form of [`Money`]: the bank is not serialized.
#[derive(Serialize, Deserialize)]
struct MoneyRecord {
    cents: i64,
    currency: Currency,
}

impl From<MoneyRecord> for Money {
    fn from(record: MoneyRecord) -> Self {
        Money::new(record.cents, record.currency)
    }
}

impl From<Money> for MoneyRecord {
    fn from(money: Money) -> Self {
        MoneyRecord {
            cents: money.cents,
            currency: money.currency,
        }
    }
}

impl Money {
    /// Create money from a whole number of minor units, attached to the default bank.
    pub fn new(cents: i64, currency: Currency) -> Self {
        Self::from_parts(cents, currency, Money::default_bank())
    }

    /// Create money from a fractional count of minor units.
    ///
    /// The amount is rounded to the nearest minor unit; it is not scaled by
    /// the currency's subunit ratio.
    ///
    /// ```
    /// use money_engine::core::iso;
    /// use money_engine::core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Money::from_decimal_cents(dec!(1.01), iso::USD).unwrap().cents(), 1);
    /// assert_eq!(Money::from_decimal_cents(dec!(1.50), iso::USD).unwrap().cents(), 2);
    /// ```
    pub fn from_decimal_cents(amount: Decimal, currency: Currency) -> Result<Self> {
        Ok(Self::new(round_to_cents(amount)?, currency))
    }

    /// Create money from an amount in major units (dollars, euros...).
    pub fn from_major(amount: Decimal, currency: Currency) -> Result<Self> {
        let scaled = amount
            .checked_mul(Decimal::from(currency.subunit_to_unit()))
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(round_to_cents(scaled)?, currency))
    }

    /// Minor units in the default currency.
    pub fn from_cents(cents: i64) -> Self {
        Self::new(cents, Money::default_currency())
    }

    /// Major units in the default currency.
    pub fn from_major_default(amount: Decimal) -> Result<Self> {
        Self::from_major(amount, Money::default_currency())
    }

    /// Zero in the given currency.
    pub fn empty(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn us_dollar(cents: i64) -> Self {
        Self::new(cents, iso::USD)
    }

    pub fn ca_dollar(cents: i64) -> Self {
        Self::new(cents, iso::CAD)
    }

    pub fn euro(cents: i64) -> Self {
        Self::new(cents, iso::EUR)
    }

    pub(crate) fn from_parts(cents: i64, currency: Currency, bank: Arc<dyn ExchangeBank>) -> Self {
        Self {
            cents,
            currency,
            bank,
        }
    }

    /// Same currency and bank, different amount.
    fn with_cents(&self, cents: i64) -> Self {
        Self::from_parts(cents, self.currency, Arc::clone(&self.bank))
    }

    /// Copy of this value attached to another bank.
    pub fn with_bank(&self, bank: Arc<dyn ExchangeBank>) -> Self {
        Self::from_parts(self.cents, self.currency, bank)
    }

    /// Re-denominate: the same minor-unit count in another currency.
    ///
    /// This is not a conversion; use [`Money::exchange_to`] for that.
    pub fn with_currency(&self, currency: impl ToCurrency) -> Result<Self> {
        let currency = Currency::wrap(currency)?;
        Ok(Self::from_parts(self.cents, currency, Arc::clone(&self.bank)))
    }

    // --- Process-wide defaults ---

    /// Currency assumed by callers that do not name one (USD unless changed).
    pub fn default_currency() -> Currency {
        *DEFAULT_CURRENCY.read()
    }

    pub fn set_default_currency(currency: Currency) {
        debug!("default currency set to {}", currency);
        *DEFAULT_CURRENCY.write() = currency;
    }

    /// Bank attached to newly created values (the shared `VariableExchange` unless changed).
    pub fn default_bank() -> Arc<dyn ExchangeBank> {
        DEFAULT_BANK.read().clone()
    }

    pub fn set_default_bank(bank: Arc<dyn ExchangeBank>) {
        *DEFAULT_BANK.write() = bank;
    }

    /// Store a rate in the shared [`VariableExchange`] instance.
    pub fn add_rate(from: impl ToCurrency, to: impl ToCurrency, rate: Decimal) -> Result<()> {
        VariableExchange::instance().add_rate(from, to, rate)
    }

    // --- Accessors ---

    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn currency_code(&self) -> &'static str {
        self.currency.code()
    }

    pub fn bank(&self) -> &Arc<dyn ExchangeBank> {
        &self.bank
    }

    /// The amount in major units, exactly.
    pub fn dollars(&self) -> Decimal {
        Decimal::from(self.cents) / Decimal::from(self.currency.subunit_to_unit())
    }

    /// The amount in major units as a float. For display and charting only.
    pub fn to_f64(&self) -> f64 {
        self.dollars().to_f64().unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Magnitude of the amount. `i64::MIN` minor units has no positive
    /// counterpart and fails with [`MoneyError::Overflow`].
    pub fn abs(&self) -> Result<Money> {
        let cents = self.cents.checked_abs().ok_or(MoneyError::Overflow)?;
        Ok(self.with_cents(cents))
    }

    /// The amount with its sign flipped.
    pub fn try_neg(&self) -> Result<Money> {
        let cents = self.cents.checked_neg().ok_or(MoneyError::Overflow)?;
        Ok(self.with_cents(cents))
    }

    // --- Arithmetic ---

    fn ensure_same_currency(&self, other: &Money) -> Result<()> {
        if self.currency != other.currency {
            return Err(MoneyError::mismatch(self.currency.code(), other.currency.code()));
        }
        Ok(())
    }

    pub fn try_add(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        let cents = self.cents.checked_add(other.cents).ok_or(MoneyError::Overflow)?;
        Ok(self.with_cents(cents))
    }

    pub fn try_sub(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        let cents = self.cents.checked_sub(other.cents).ok_or(MoneyError::Overflow)?;
        Ok(self.with_cents(cents))
    }

    /// Compare two amounts of the same currency.
    pub fn try_cmp(&self, other: &Money) -> Result<Ordering> {
        self.ensure_same_currency(other)?;
        Ok(self.cents.cmp(&other.cents))
    }

    /// Scale by a factor, rounding halves away from zero.
    pub fn multiply(&self, factor: Decimal) -> Result<Money> {
        let product = Decimal::from(self.cents)
            .checked_mul(factor)
            .ok_or(MoneyError::Overflow)?;
        Ok(self.with_cents(round_to_cents(product)?))
    }

    /// Sum amounts that all share `currency`.
    pub fn sum<'a>(currency: Currency, items: impl IntoIterator<Item = &'a Money>) -> Result<Money> {
        items
            .into_iter()
            .try_fold(Money::empty(currency), |total, item| total.try_add(item))
    }

    // --- Conversion ---

    /// Convert through the attached bank. `self` is left untouched.
    pub fn exchange_to(&self, target: impl ToCurrency) -> Result<Money> {
        let target = Currency::wrap(target)?;
        debug!("exchanging {} {} to {}", self, self.currency, target);
        self.bank.exchange_with(self, target)
    }

    // --- Allocation ---

    /// Divide into `parts` amounts that differ by at most one minor unit.
    pub fn split(&self, parts: usize) -> Result<Vec<Money>> {
        Ok(allocator::split(self.cents, parts)?
            .into_iter()
            .map(|cents| self.with_cents(cents))
            .collect())
    }

    /// Divide according to `ratios` (summing to at most 1) without losing a minor unit.
    pub fn allocate(&self, ratios: &[Decimal]) -> Result<Vec<Money>> {
        Ok(allocator::allocate(self.cents, ratios)?
            .into_iter()
            .map(|cents| self.with_cents(cents))
            .collect())
    }

    // --- Formatting ---

    /// Decorated, currency-aware rendering. See [`FormatOptions`].
    pub fn format(&self, options: &FormatOptions) -> String {
        Formatter::new().format(self, options)
    }

    /// The currency symbol, or `¤` when the currency has none.
    pub fn symbol(&self) -> &'static str {
        Formatter::new().symbol(&self.currency)
    }

    /// Decimal mark for this currency, without locale overrides.
    pub fn separator(&self) -> String {
        Formatter::new().separator(&self.currency)
    }

    /// Thousands separator for this currency, without locale overrides.
    pub fn delimiter(&self) -> String {
        Formatter::new().delimiter(&self.currency)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::empty(Money::default_currency())
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.cents == other.cents && self.currency == other.currency
    }
}

impl Eq for Money {}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cents.hash(state);
        self.currency.hash(state);
    }
}

impl PartialOrd for Money {
    /// `None` when the currencies differ.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl fmt::Debug for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Money")
            .field("cents", &self.cents)
            .field("currency", &self.currency.code())
            .finish_non_exhaustive()
    }
}

/// Bare numeric form: currency decimal mark, no grouping, no symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let currency = &self.currency;
        let digits = formatter::render_digits(
            self.cents.unsigned_abs(),
            currency.subunit_to_unit(),
            currency.decimal_mark(),
            "",
            false,
        );
        if self.cents < 0 {
            f.write_str("-")?;
        }
        f.write_str(&digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::same_bank;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::collections::hash_map::DefaultHasher;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    fn hash_of(money: &Money) -> u64 {
        let mut hasher = DefaultHasher::new();
        money.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_new_takes_minor_units() {
        assert_eq!(Money::new(200_00, iso::USD).cents(), 200_00);
    }

    #[test]
    fn test_decimal_cents_are_rounded_not_scaled() {
        let cents = |amount| Money::from_decimal_cents(amount, iso::USD).unwrap().cents();
        assert_eq!(cents(dec!(1.00)), 1);
        assert_eq!(cents(dec!(1.01)), 1);
        assert_eq!(cents(dec!(1.50)), 2);
        assert_eq!(cents(dec!(-1.50)), -2);
    }

    #[test]
    fn test_from_major_respects_subunit() {
        assert_eq!(Money::from_major(dec!(1), iso::USD).unwrap(), Money::new(1_00, iso::USD));
        assert_eq!(Money::from_major(dec!(1), iso::TND).unwrap(), Money::new(1_000, iso::TND));
        assert_eq!(Money::from_major(dec!(1), iso::CLP).unwrap(), Money::new(1, iso::CLP));
        assert_eq!(Money::from_major(dec!(100.37), iso::USD).unwrap().cents(), 100_37);
        assert_eq!(Money::from_major(dec!(1234), iso::USD).unwrap().cents(), 1234_00);
    }

    #[test]
    fn test_from_major_overflow() {
        let result = Money::from_major(Decimal::MAX, iso::USD);
        assert!(matches!(result, Err(MoneyError::Overflow)));
    }

    #[test]
    fn test_dollars_is_exact() {
        assert_eq!(Money::new(1_00, iso::USD).dollars(), dec!(1));
        assert_eq!(Money::new(1_000, iso::TND).dollars(), dec!(1));
        assert_eq!(Money::new(1, iso::CLP).dollars(), dec!(1));
        assert_eq!(Money::new(100_37, iso::USD).dollars(), dec!(100.37));
        assert_eq!(Money::from_major(dec!(100.37), iso::USD).unwrap().dollars(), dec!(100.37));
    }

    #[test]
    fn test_default_bank_is_shared_instance() {
        let shared: Arc<dyn ExchangeBank> = VariableExchange::instance();
        assert!(same_bank(Money::new(0, iso::USD).bank(), &shared));
        assert!(same_bank(Money::from_major(dec!(0), iso::USD).unwrap().bank(), &shared));
    }

    #[test]
    fn test_with_bank_keeps_value() {
        let isolated: Arc<dyn ExchangeBank> = Arc::new(VariableExchange::new());
        let money = Money::new(5_00, iso::EUR).with_bank(Arc::clone(&isolated));
        assert!(same_bank(money.bank(), &isolated));
        assert_eq!(money, Money::euro(5_00));
    }

    #[test]
    fn test_currency_code_and_redenomination() {
        let money = Money::new(200_00, iso::USD);
        assert_eq!(money.currency_code(), "USD");
        let euros = money.with_currency("EUR").unwrap();
        assert_eq!(euros.currency(), iso::EUR);
        assert_eq!(euros.cents(), 200_00);
        assert_eq!(money.currency(), iso::USD);
        assert!(money.with_currency("NOPE").is_err());
    }

    #[test]
    fn test_hash_consistent_with_equality() {
        let a = Money::new(1_00, iso::EUR);
        let b = Money::new(1_00, iso::EUR);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(hash_of(&a), hash_of(&Money::new(2_00, iso::EUR)));
        assert_ne!(hash_of(&a), hash_of(&Money::new(1_00, iso::USD)));
        assert_ne!(a, Money::new(1_00, iso::USD));
    }

    #[test]
    fn test_set_intersection() {
        let left: HashSet<Money> = [Money::new(1_00, iso::EUR), Money::new(1_00, iso::USD)]
            .into_iter()
            .collect();
        let right: HashSet<Money> = [Money::new(1_00, iso::EUR)].into_iter().collect();
        let both: Vec<&Money> = left.intersection(&right).collect();
        assert_eq!(both, vec![&Money::new(1_00, iso::EUR)]);
    }

    #[test]
    fn test_arithmetic_same_currency() {
        let a = Money::us_dollar(1_50);
        let b = Money::us_dollar(25);
        assert_eq!(a.try_add(&b).unwrap(), Money::us_dollar(1_75));
        assert_eq!(a.try_sub(&b).unwrap(), Money::us_dollar(1_25));
        assert_eq!(a.try_cmp(&b).unwrap(), Ordering::Greater);
        assert!(b < a);
    }

    #[test]
    fn test_arithmetic_currency_mismatch() {
        let usd = Money::us_dollar(100);
        let eur = Money::euro(100);
        assert!(matches!(usd.try_add(&eur), Err(MoneyError::CurrencyMismatch { .. })));
        assert!(matches!(usd.try_sub(&eur), Err(MoneyError::CurrencyMismatch { .. })));
        assert!(usd.partial_cmp(&eur).is_none());
    }

    #[test]
    fn test_add_overflow() {
        let max = Money::us_dollar(i64::MAX);
        assert!(matches!(max.try_add(&Money::us_dollar(1)), Err(MoneyError::Overflow)));
    }

    #[test]
    fn test_multiply_and_sign_helpers() {
        let money = Money::us_dollar(-1_05);
        assert_eq!(money.multiply(dec!(0.5)).unwrap().cents(), -53);
        assert_eq!(money.abs().unwrap().cents(), 1_05);
        assert_eq!(money.try_neg().unwrap().cents(), 1_05);
        assert_eq!(Money::us_dollar(7).try_neg().unwrap().cents(), -7);
        assert!(money.is_negative());
        assert!(Money::empty(iso::USD).is_zero());
    }

    #[test]
    fn test_sign_flips_at_the_limits() {
        let min = Money::us_dollar(i64::MIN);
        assert!(matches!(min.abs(), Err(MoneyError::Overflow)));
        assert!(matches!(min.try_neg(), Err(MoneyError::Overflow)));
        assert_eq!(min.cents(), i64::MIN);

        let max = Money::us_dollar(i64::MAX);
        assert_eq!(max.try_neg().unwrap().cents(), -i64::MAX);
        assert_eq!(max.try_neg().unwrap().abs().unwrap(), max);
    }

    #[test]
    fn test_sum() {
        let items = vec![Money::euro(1), Money::euro(2), Money::euro(3)];
        assert_eq!(Money::sum(iso::EUR, &items).unwrap(), Money::euro(6));
        assert!(Money::sum(iso::USD, &items).is_err());
    }

    #[test]
    fn test_named_constructors() {
        assert_eq!(Money::ca_dollar(50), Money::new(50, iso::CAD));
        assert_eq!(Money::us_dollar(50), Money::new(50, iso::USD));
        assert_eq!(Money::euro(50), Money::new(50, iso::EUR));
        assert_eq!(Money::empty(iso::GBP), Money::new(0, iso::GBP));
    }

    #[derive(Debug, Default)]
    struct CountingBank {
        calls: AtomicUsize,
    }

    impl ExchangeBank for CountingBank {
        fn exchange_with(&self, from: &Money, to: Currency) -> Result<Money> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            assert_eq!(from, &Money::new(100_00, iso::USD));
            assert_eq!(to, iso::EUR);
            Ok(Money::new(200_00, iso::EUR))
        }
    }

    #[test]
    fn test_exchange_to_delegates_once() {
        let bank = Arc::new(CountingBank::default());
        let money = Money::new(100_00, iso::USD).with_bank(bank.clone());
        let converted = money.exchange_to("EUR").unwrap();
        assert_eq!(converted, Money::new(200_00, iso::EUR));
        assert_eq!(bank.calls.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(money, Money::new(100_00, iso::USD));
    }

    #[test]
    fn test_exchange_to_unknown_currency() {
        let bank = Arc::new(CountingBank::default());
        let money = Money::new(100_00, iso::USD).with_bank(bank.clone());
        assert!(matches!(money.exchange_to("QQQ"), Err(MoneyError::UnknownCurrency { .. })));
        assert_eq!(bank.calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn test_display_bare_form() {
        assert_eq!(Money::new(10_00, iso::USD).to_string(), "10.00");
        assert_eq!(Money::new(400_08, iso::USD).to_string(), "400.08");
        assert_eq!(Money::new(-237_43, iso::USD).to_string(), "-237.43");
        assert_eq!(Money::new(10_00, iso::BHD).to_string(), "1.000");
        assert_eq!(Money::new(10_00, iso::CNY).to_string(), "10.00");
        assert_eq!(Money::new(10_00, iso::CLP).to_string(), "1000");
        assert_eq!(Money::new(10_00, iso::MGA).to_string(), "200.0");
        assert_eq!(Money::new(10_00, iso::BRL).to_string(), "10,00");
    }

    #[test]
    fn test_serde_round_trip() {
        let money = Money::new(12_34, iso::EUR);
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, r#"{"cents":1234,"currency":"EUR"}"#);
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, money);
    }
}
