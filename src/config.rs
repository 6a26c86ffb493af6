//! Settings loaded from a JSON file.
//!
//! ```json
//! {
//!   "default_currency": "EUR",
//!   "locale": "de",
//!   "rates": [{ "from": "EUR", "to": "USD", "rate": "1.08" }],
//!   "locale_overrides": [
//!     { "locale": "de", "field": "delimiter", "value": "." },
//!     { "locale": "de", "field": "separator", "value": "," }
//!   ]
//! }
//! ```

use crate::bank::{RateEntry, VariableExchange};
use crate::core::currency::Currency;
use crate::core::money::Money;
use crate::error::{MoneyError, Result};
use crate::format::{Formatter, LocaleTable, NumberField};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "MONEY_ENGINE_CONFIG";

/// One locale override entry. Without `currency` it applies to every
/// currency shown in `locale`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleOverride {
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub field: NumberField,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_currency: String,
    pub locale: Option<String>,
    pub rates: Vec<RateEntry>,
    pub locale_overrides: Vec<LocaleOverride>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
            locale: None,
            rates: Vec::new(),
            locale_overrides: Vec::new(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading settings from {}", path.display());
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Settings from the file named by [`CONFIG_ENV`], or the defaults when
    /// the variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn default_currency(&self) -> Result<Currency> {
        Currency::find(&self.default_currency)
    }

    /// Locale overrides as a lookup table.
    pub fn locale_table(&self) -> Result<LocaleTable> {
        let mut table = LocaleTable::new();
        for entry in &self.locale_overrides {
            match &entry.currency {
                Some(code) => {
                    let currency = Currency::find(code)?;
                    table.insert_for_currency(
                        &entry.locale,
                        currency.code(),
                        entry.field,
                        entry.value.as_str(),
                    );
                }
                None => table.insert(&entry.locale, entry.field, entry.value.as_str()),
            }
        }
        Ok(table)
    }

    /// Formatter for the configured locale and overrides.
    pub fn formatter(&self) -> Result<Formatter> {
        let table = self.locale_table()?;
        let mut formatter = Formatter::new();
        if !table.is_empty() {
            formatter = formatter.with_overrides(Arc::new(table));
        }
        if let Some(locale) = &self.locale {
            formatter = formatter.with_locale(locale.as_str());
        }
        Ok(formatter)
    }

    /// Install these settings: set the default currency, store every rate in
    /// `bank` and return the configured formatter.
    ///
    /// Everything is validated before anything is changed, so a bad entry
    /// leaves the defaults and the bank untouched.
    pub fn apply(&self, bank: &VariableExchange) -> Result<Formatter> {
        let currency = self.default_currency()?;
        let formatter = self.formatter()?;

        let mut rates = Vec::with_capacity(self.rates.len());
        for entry in &self.rates {
            let from = Currency::find(&entry.from)?;
            let to = Currency::find(&entry.to)?;
            if entry.rate <= Decimal::ZERO {
                return Err(MoneyError::InvalidRate {
                    from: from.code().to_string(),
                    to: to.code().to_string(),
                    rate: entry.rate,
                });
            }
            rates.push((from, to, entry.rate));
        }

        for (from, to, rate) in rates {
            bank.add_rate(from, to, rate)?;
        }
        Money::set_default_currency(currency);
        info!(
            "settings applied: default currency {}, {} rate(s), locale {}",
            currency,
            self.rates.len(),
            self.locale.as_deref().unwrap_or("none")
        );
        Ok(formatter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::iso;
    use crate::format::FormatOptions;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"{
        "default_currency": "usd",
        "locale": "de",
        "rates": [
            {"from": "EUR", "to": "USD", "rate": "1.08"},
            {"from": "USD", "to": "EUR", "rate": "0.92"}
        ],
        "locale_overrides": [
            {"locale": "de", "field": "delimiter", "value": "."},
            {"locale": "de", "field": "separator", "value": ","},
            {"locale": "de", "currency": "chf", "field": "delimiter", "value": "'"}
        ]
    }"#;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_currency().unwrap(), iso::USD);
        assert!(settings.rates.is_empty());
        assert_eq!(Settings::from_json("{}").unwrap(), settings);
    }

    #[test]
    fn test_parse_sample() {
        let settings = Settings::from_json(SAMPLE).unwrap();
        assert_eq!(settings.locale.as_deref(), Some("de"));
        assert_eq!(settings.rates.len(), 2);
        assert_eq!(settings.rates[0].rate, dec!(1.08));
        assert_eq!(settings.locale_overrides[2].currency.as_deref(), Some("chf"));
        assert_eq!(settings.locale_table().unwrap().len(), 3);
    }

    #[test]
    fn test_apply_stores_rates_and_builds_formatter() {
        let settings = Settings::from_json(SAMPLE).unwrap();
        let bank = VariableExchange::new();
        let formatter = settings.apply(&bank).unwrap();

        assert_eq!(bank.get_rate(iso::EUR, iso::USD), Some(dec!(1.08)));
        assert_eq!(bank.len(), 2);
        assert_eq!(formatter.locale(), Some("de"));
        let money = Money::us_dollar(1_234_56);
        assert_eq!(formatter.format(&money, &FormatOptions::new()), "$1.234,56");
        assert_eq!(formatter.delimiter(&iso::CHF), "'");
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let json = r#"{
            "rates": [
                {"from": "EUR", "to": "USD", "rate": "1.08"},
                {"from": "EUR", "to": "QQQ", "rate": "2"}
            ]
        }"#;
        let bank = VariableExchange::new();
        let result = Settings::from_json(json).unwrap().apply(&bank);
        assert!(matches!(result, Err(MoneyError::UnknownCurrency { .. })));
        assert!(bank.is_empty());

        let json = r#"{"rates": [{"from": "EUR", "to": "USD", "rate": "0"}]}"#;
        let result = Settings::from_json(json).unwrap().apply(&bank);
        assert!(matches!(result, Err(MoneyError::InvalidRate { .. })));
        assert!(bank.is_empty());
    }

    #[test]
    fn test_unknown_default_currency() {
        let settings = Settings::from_json(r#"{"default_currency": "XYZ"}"#).unwrap();
        assert!(settings.apply(&VariableExchange::new()).is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ nope"),
            Err(MoneyError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Settings::load("/definitely/not/here/settings.json");
        assert!(matches!(result, Err(MoneyError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("money-engine-settings-{}.json", std::process::id()));
        fs::write(&path, SAMPLE).unwrap();
        let settings = Settings::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(settings.default_currency().unwrap(), iso::USD);
    }
}
