use crate::core::iso;
use crate::error::{MoneyError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Decimal mark used when a currency does not define one.
pub const DEFAULT_DECIMAL_MARK: &str = ".";

/// Thousands separator used when a currency does not define one.
pub const DEFAULT_THOUSANDS_SEPARATOR: &str = ",";

/// Metadata for one currency: minor-unit granularity, symbol and separators.
///
/// Values come from the static table in [`crate::core::iso`] and are cheap
/// `Copy` handles. Two currencies are equal when their codes are equal,
/// whatever the rest of the metadata says.
///
/// # Examples
///
/// ```
/// use money_engine::core::currency::Currency;
/// use money_engine::core::iso;
///
/// let usd = Currency::wrap("usd").unwrap();
/// assert_eq!(usd, iso::USD);
/// assert_eq!(usd.subunit_to_unit(), 100);
/// assert!(Currency::wrap("XYZ").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Currency {
    code: &'static str,
    name: &'static str,
    subunit_to_unit: u32,
    display_subunit_to_unit: u32,
    symbol: Option<&'static str>,
    symbol_first: bool,
    symbol_spacing: bool,
    decimal_mark: Option<&'static str>,
    thousands_separator: Option<&'static str>,
}

impl Currency {
    pub(crate) const fn new(code: &'static str, name: &'static str, subunit_to_unit: u32) -> Self {
        assert!(subunit_to_unit >= 1, "subunit_to_unit must be at least 1");
        Self {
            code,
            name,
            subunit_to_unit,
            display_subunit_to_unit: subunit_to_unit,
            symbol: None,
            symbol_first: true,
            symbol_spacing: false,
            decimal_mark: None,
            thousands_separator: None,
        }
    }

    pub(crate) const fn symbol_after(mut self) -> Self {
        self.symbol_first = false;
        self
    }

    pub(crate) const fn spaced(mut self) -> Self {
        self.symbol_spacing = true;
        self
    }

    pub(crate) const fn marks(mut self, decimal_mark: &'static str, thousands: &'static str) -> Self {
        self.decimal_mark = Some(decimal_mark);
        self.thousands_separator = Some(thousands);
        self
    }

    pub(crate) const fn displayed_in(mut self, display_subunit_to_unit: u32) -> Self {
        assert!(display_subunit_to_unit >= 1);
        self.display_subunit_to_unit = display_subunit_to_unit;
        self
    }

    /// Copy of this currency reporting a different symbol.
    ///
    /// The copy still compares equal to the original. `None` means the
    /// currency has no symbol, which formatting renders as `¤`.
    pub const fn with_symbol(mut self, symbol: Option<&'static str>) -> Self {
        self.symbol = symbol;
        self
    }

    /// Look up a currency by code, ignoring case and surrounding whitespace.
    pub fn find(code: &str) -> Result<Currency> {
        let wanted = code.trim();
        iso::TABLE
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| MoneyError::UnknownCurrency {
                code: wanted.to_string(),
            })
    }

    /// Normalize a currency-like value (a `Currency` or a code) into a `Currency`.
    pub fn wrap(identifier: impl ToCurrency) -> Result<Currency> {
        identifier.to_currency()
    }

    /// Every currency in the static table.
    pub fn all() -> impl Iterator<Item = Currency> {
        iso::TABLE.iter().copied()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of minor units in one major unit.
    pub fn subunit_to_unit(&self) -> u32 {
        self.subunit_to_unit
    }

    /// Number of minor units in one unit as shown by `format`.
    pub fn display_subunit_to_unit(&self) -> u32 {
        self.display_subunit_to_unit
    }

    /// Digits after the decimal mark in the bare numeric form.
    pub fn decimal_places(&self) -> u32 {
        decimal_places_for(self.subunit_to_unit)
    }

    pub fn symbol(&self) -> Option<&'static str> {
        self.symbol
    }

    pub fn symbol_first(&self) -> bool {
        self.symbol_first
    }

    /// Whether a leading symbol is separated from the digits by a space.
    pub fn symbol_spacing(&self) -> bool {
        self.symbol_spacing
    }

    pub fn decimal_mark(&self) -> &'static str {
        self.decimal_mark.unwrap_or(DEFAULT_DECIMAL_MARK)
    }

    pub fn thousands_separator(&self) -> &'static str {
        self.thousands_separator.unwrap_or(DEFAULT_THOUSANDS_SEPARATOR)
    }
}

/// Fraction digits needed to show `subunit` minor units per unit.
///
/// Powers of ten get `log10(subunit)` digits; other granularities get one
/// more digit than `floor(log10(subunit))`, and a subunit of 1 gets none.
pub fn decimal_places_for(subunit: u32) -> u32 {
    if subunit <= 1 {
        return 0;
    }
    let mut rest = subunit - 1;
    let mut places = 0;
    while rest > 0 {
        rest /= 10;
        places += 1;
    }
    places
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self> {
        Currency::find(s)
    }
}

impl TryFrom<&str> for Currency {
    type Error = MoneyError;

    fn try_from(s: &str) -> Result<Self> {
        Currency::find(s)
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Currency::find(&code).map_err(serde::de::Error::custom)
    }
}

/// Anything that can be resolved to a [`Currency`]: the currency itself or
/// a currency code.
pub trait ToCurrency {
    fn to_currency(&self) -> Result<Currency>;
}

impl ToCurrency for Currency {
    fn to_currency(&self) -> Result<Currency> {
        Ok(*self)
    }
}

impl ToCurrency for &Currency {
    fn to_currency(&self) -> Result<Currency> {
        Ok(**self)
    }
}

impl ToCurrency for &str {
    fn to_currency(&self) -> Result<Currency> {
        Currency::find(self)
    }
}

impl ToCurrency for String {
    fn to_currency(&self) -> Result<Currency> {
        Currency::find(self)
    }
}

impl ToCurrency for &String {
    fn to_currency(&self) -> Result<Currency> {
        Currency::find(self)
    }
}

/// A directed currency pair, the key of an exchange-rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub from: Currency,
    pub to: Currency,
}

impl CurrencyPair {
    pub fn new(from: Currency, to: Currency) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(Currency::find("eur").unwrap(), iso::EUR);
        assert_eq!(Currency::find(" Usd ").unwrap().code(), "USD");
    }

    #[test]
    fn test_unknown_currency() {
        let err = Currency::find("XXQ").unwrap_err();
        assert!(matches!(err, MoneyError::UnknownCurrency { ref code } if code == "XXQ"));
    }

    #[test]
    fn test_wrap_accepts_currency_and_codes() {
        assert_eq!(Currency::wrap(iso::EUR).unwrap(), iso::EUR);
        assert_eq!(Currency::wrap(&iso::EUR).unwrap(), iso::EUR);
        assert_eq!(Currency::wrap("EUR").unwrap(), iso::EUR);
        assert_eq!(Currency::wrap(String::from("eur")).unwrap(), iso::EUR);
    }

    #[test]
    fn test_equality_ignores_metadata() {
        let plain = iso::EUR.with_symbol(None);
        assert_eq!(plain, iso::EUR);
        assert_eq!(plain.symbol(), None);

        let mut set = HashSet::new();
        set.insert(iso::EUR);
        assert!(set.contains(&plain));
    }

    #[test]
    fn test_separator_defaults() {
        assert_eq!(iso::USD.decimal_mark(), ".");
        assert_eq!(iso::USD.thousands_separator(), ",");
        assert_eq!(iso::BRL.decimal_mark(), ",");
        assert_eq!(iso::BRL.thousands_separator(), ".");
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(decimal_places_for(1), 0);
        assert_eq!(decimal_places_for(5), 1);
        assert_eq!(decimal_places_for(10), 1);
        assert_eq!(decimal_places_for(100), 2);
        assert_eq!(decimal_places_for(1000), 3);
        assert_eq!(iso::MGA.decimal_places(), 1);
        assert_eq!(iso::CLP.decimal_places(), 0);
    }

    #[test]
    fn test_table_invariants() {
        let mut codes = HashSet::new();
        for currency in Currency::all() {
            assert!(currency.subunit_to_unit() >= 1);
            assert_eq!(currency.code(), currency.code().to_ascii_uppercase());
            assert!(codes.insert(currency.code()), "duplicate {}", currency);
        }
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&iso::NOK).unwrap();
        assert_eq!(json, "\"NOK\"");
        let back: Currency = serde_json::from_str("\"nok\"").unwrap();
        assert_eq!(back, iso::NOK);
        assert!(serde_json::from_str::<Currency>("\"ABC\"").is_err());
    }

    #[test]
    fn test_pair_display() {
        let pair = CurrencyPair::new(iso::BRL, iso::USD);
        assert_eq!(pair.to_string(), "BRL/USD");
    }
}
