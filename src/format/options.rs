/// Text shown for zero amounts by [`FormatOptions::display_free`].
pub const FREE: &str = "free";

/// How the currency symbol is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SymbolOption {
    /// The currency's own symbol, or `¤` when it has none.
    #[default]
    Currency,
    /// This exact text. An empty string hides the symbol.
    Custom(String),
    /// No symbol and no space reserved for it.
    Hidden,
}

/// Call-site options for [`crate::format::Formatter::format`].
///
/// Every field defaults to "not set", letting the locale, the currency and
/// the global defaults decide.
///
/// # Examples
///
/// ```
/// use money_engine::core::money::Money;
/// use money_engine::format::FormatOptions;
///
/// let options = FormatOptions::new().no_cents().with_currency();
/// assert_eq!(Money::ca_dollar(570).format(&options), "$5 CAD");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Replacement text for zero amounts.
    pub display_free: Option<String>,
    /// Append the currency code.
    pub with_currency: bool,
    /// Drop the fraction digits, truncating toward zero.
    pub no_cents: bool,
    pub symbol: SymbolOption,
    /// Decimal mark override.
    pub separator: Option<String>,
    /// Thousands separator override; an empty string disables grouping.
    pub delimiter: Option<String>,
    /// Wrap the appended currency code in a `<span class="currency">`.
    pub html: bool,
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render zero as `"free"`.
    pub fn display_free(self) -> Self {
        self.display_free_as(FREE)
    }

    /// Render zero as `text`.
    pub fn display_free_as(mut self, text: impl Into<String>) -> Self {
        self.display_free = Some(text.into());
        self
    }

    pub fn with_currency(mut self) -> Self {
        self.with_currency = true;
        self
    }

    pub fn no_cents(mut self) -> Self {
        self.no_cents = true;
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = SymbolOption::Custom(symbol.into());
        self
    }

    pub fn no_symbol(mut self) -> Self {
        self.symbol = SymbolOption::Hidden;
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Disable thousands grouping.
    pub fn no_delimiter(self) -> Self {
        self.delimiter("")
    }

    pub fn html(mut self) -> Self {
        self.html = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unset() {
        let options = FormatOptions::new();
        assert_eq!(options.display_free, None);
        assert_eq!(options.symbol, SymbolOption::Currency);
        assert!(!options.no_cents && !options.with_currency && !options.html);
    }

    #[test]
    fn test_builders() {
        let options = FormatOptions::new()
            .display_free()
            .symbol("£")
            .no_delimiter()
            .separator(",");
        assert_eq!(options.display_free.as_deref(), Some("free"));
        assert_eq!(options.symbol, SymbolOption::Custom("£".to_string()));
        assert_eq!(options.delimiter.as_deref(), Some(""));
        assert_eq!(options.separator.as_deref(), Some(","));
    }
}
