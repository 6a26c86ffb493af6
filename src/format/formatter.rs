use crate::core::currency::{decimal_places_for, Currency};
use crate::core::money::Money;
use crate::format::locale::{LocaleOverrides, NumberField};
use crate::format::options::{FormatOptions, SymbolOption};
use std::fmt;
use std::sync::Arc;

/// Symbol shown for currencies that have none.
pub const GENERIC_SYMBOL: &str = "¤";

/// Renders money values, optionally consulting locale overrides.
///
/// Without a locale the formatter uses currency metadata only, which is what
/// [`Money::format`] does.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use money_engine::core::iso;
/// use money_engine::core::money::Money;
/// use money_engine::format::{FormatOptions, Formatter, LocaleTable, NumberField};
///
/// let mut table = LocaleTable::new();
/// table.insert("de", NumberField::Delimiter, ".");
/// table.insert("de", NumberField::Separator, ",");
///
/// let german = Formatter::new().with_overrides(Arc::new(table)).with_locale("de");
/// let money = Money::new(1_234_56, iso::USD);
/// assert_eq!(german.format(&money, &FormatOptions::new()), "$1.234,56");
/// assert_eq!(money.format(&FormatOptions::new()), "$1,234.56");
/// ```
#[derive(Clone, Default)]
pub struct Formatter {
    overrides: Option<Arc<dyn LocaleOverrides>>,
    locale: Option<String>,
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("locale", &self.locale)
            .field("has_overrides", &self.overrides.is_some())
            .finish()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `overrides` as the locale lookup.
    pub fn with_overrides(mut self, overrides: Arc<dyn LocaleOverrides>) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Set the current locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    fn locale_value(&self, currency: &Currency, field: NumberField) -> Option<String> {
        let overrides = self.overrides.as_ref()?;
        let locale = self.locale.as_deref()?;
        overrides.lookup(locale, currency.code(), field)
    }

    /// Decimal mark: locale override, then the currency's, then `"."`.
    pub fn separator(&self, currency: &Currency) -> String {
        self.locale_value(currency, NumberField::Separator)
            .unwrap_or_else(|| currency.decimal_mark().to_string())
    }

    /// Thousands separator: locale override, then the currency's, then `","`.
    pub fn delimiter(&self, currency: &Currency) -> String {
        self.locale_value(currency, NumberField::Delimiter)
            .unwrap_or_else(|| currency.thousands_separator().to_string())
    }

    /// The currency's symbol, or [`GENERIC_SYMBOL`].
    pub fn symbol(&self, currency: &Currency) -> &'static str {
        currency.symbol().unwrap_or(GENERIC_SYMBOL)
    }

    /// Render `money` with symbol, grouping and the requested decorations.
    pub fn format(&self, money: &Money, options: &FormatOptions) -> String {
        if money.is_zero() {
            if let Some(free) = &options.display_free {
                return free.clone();
            }
        }

        let currency = money.currency();
        let separator = match &options.separator {
            Some(separator) => separator.clone(),
            None => self.separator(&currency),
        };
        let delimiter = match &options.delimiter {
            Some(delimiter) => delimiter.clone(),
            None => self.delimiter(&currency),
        };

        let magnitude = money.cents().unsigned_abs();
        let subunit = currency.display_subunit_to_unit();
        // a negative amount truncated to zero units prints unsigned
        let shown = if options.no_cents {
            magnitude / u64::from(subunit.max(1))
        } else {
            magnitude
        };
        let number = render_digits(
            magnitude,
            subunit,
            &separator,
            &delimiter,
            options.no_cents,
        );

        let symbol = match &options.symbol {
            SymbolOption::Currency => Some(self.symbol(&currency)),
            SymbolOption::Custom(text) if !text.is_empty() => Some(text.as_str()),
            SymbolOption::Custom(_) | SymbolOption::Hidden => None,
        };

        let mut out = String::new();
        if money.is_negative() && shown != 0 {
            out.push('-');
        }
        match symbol {
            Some(symbol) if currency.symbol_first() => {
                out.push_str(symbol);
                if currency.symbol_spacing() {
                    out.push(' ');
                }
                out.push_str(&number);
            }
            Some(symbol) => {
                out.push_str(&number);
                out.push(' ');
                out.push_str(symbol);
            }
            None => out.push_str(&number),
        }

        if options.with_currency {
            out.push(' ');
            if options.html {
                out.push_str(&format!("<span class=\"currency\">{}</span>", currency.code()));
            } else {
                out.push_str(currency.code());
            }
        }
        out
    }
}

/// Render an unsigned minor-unit amount as digits.
///
/// `subunit` minor units make one unit. The integer part is grouped by
/// `delimiter` every three digits (no grouping when empty). The fraction has
/// [`decimal_places_for`] digits, scaled so that non-decimal subunits show
/// the true fraction of a unit. `no_cents` drops the fraction.
pub fn render_digits(
    magnitude: u64,
    subunit: u32,
    separator: &str,
    delimiter: &str,
    no_cents: bool,
) -> String {
    let subunit = u64::from(subunit.max(1));
    let units = magnitude / subunit;
    let rest = magnitude % subunit;

    let mut out = group_thousands(&units.to_string(), delimiter);
    let places = decimal_places_for(subunit as u32);
    if places == 0 || no_cents {
        return out;
    }

    let scale = 10u128.pow(places);
    let fraction = u128::from(rest) * scale / u128::from(subunit);
    out.push_str(separator);
    out.push_str(&format!("{:0width$}", fraction, width = places as usize));
    out
}

fn group_thousands(digits: &str, delimiter: &str) -> String {
    if delimiter.is_empty() || digits.len() <= 3 {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * delimiter.len());
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push_str(delimiter);
        }
        out.push(ch);
    }
    out
}
