use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Number-format fields a locale may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberField {
    /// Decimal mark.
    Separator,
    /// Thousands separator.
    Delimiter,
}

impl fmt::Display for NumberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberField::Separator => f.write_str("separator"),
            NumberField::Delimiter => f.write_str("delimiter"),
        }
    }
}

/// Source of locale-specific number formats.
///
/// `None` means the locale has nothing to say and the currency default
/// applies.
pub trait LocaleOverrides: fmt::Debug + Send + Sync {
    fn lookup(&self, locale: &str, currency_code: &str, field: NumberField) -> Option<String>;
}

/// In-memory locale overrides.
///
/// Entries can target one currency or every currency of a locale; the
/// currency-specific entry wins. Locale names and codes are matched
/// case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct LocaleTable {
    entries: HashMap<(String, Option<String>, NumberField), String>,
}

impl LocaleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override `field` for every currency shown in `locale`.
    pub fn insert(&mut self, locale: &str, field: NumberField, value: impl Into<String>) {
        self.entries
            .insert((locale.to_lowercase(), None, field), value.into());
    }

    /// Override `field` for one currency shown in `locale`.
    pub fn insert_for_currency(
        &mut self,
        locale: &str,
        currency_code: &str,
        field: NumberField,
        value: impl Into<String>,
    ) {
        self.entries.insert(
            (locale.to_lowercase(), Some(currency_code.to_uppercase()), field),
            value.into(),
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LocaleOverrides for LocaleTable {
    fn lookup(&self, locale: &str, currency_code: &str, field: NumberField) -> Option<String> {
        let locale = locale.to_lowercase();
        let code = currency_code.to_uppercase();
        self.entries
            .get(&(locale.clone(), Some(code), field))
            .or_else(|| self.entries.get(&(locale, None, field)))
            .cloned()
    }
}
