//! Static currency table.
//!
//! Every entry is `const` data; lookups go through [`Currency::find`].
//! Subunit ratios follow the money library's historical table, which is why
//! JPY carries 100 subunits and CNY is displayed in tenths. The legacy
//! `YEN` code is kept alongside `JPY`.

use crate::core::currency::Currency;

pub const AUD: Currency = Currency::new("AUD", "Australian Dollar", 100).with_symbol(Some("$"));
pub const BHD: Currency = Currency::new("BHD", "Bahraini Dinar", 1000).with_symbol(Some("ب.د"));
pub const BRL: Currency = Currency::new("BRL", "Brazilian Real", 100)
    .with_symbol(Some("R$"))
    .spaced()
    .marks(",", ".");
pub const CAD: Currency = Currency::new("CAD", "Canadian Dollar", 100).with_symbol(Some("$"));
pub const CHF: Currency = Currency::new("CHF", "Swiss Franc", 100)
    .with_symbol(Some("Fr"))
    .marks(".", "'");
pub const CLP: Currency = Currency::new("CLP", "Chilean Peso", 1)
    .with_symbol(Some("$"))
    .marks(",", ".");
pub const CNY: Currency = Currency::new("CNY", "Chinese Renminbi Yuan", 100)
    .with_symbol(Some("¥"))
    .displayed_in(10);
pub const CZK: Currency = Currency::new("CZK", "Czech Koruna", 100)
    .with_symbol(Some("Kč"))
    .symbol_after()
    .marks(",", ".");
pub const DKK: Currency = Currency::new("DKK", "Danish Krone", 100)
    .with_symbol(Some("kr"))
    .symbol_after()
    .marks(",", ".");
pub const EUR: Currency = Currency::new("EUR", "Euro", 100).with_symbol(Some("€"));
pub const GBP: Currency = Currency::new("GBP", "British Pound", 100).with_symbol(Some("£"));
pub const GHC: Currency = Currency::new("GHC", "Ghanaian Cedi", 100).with_symbol(Some("₵"));
pub const HKD: Currency = Currency::new("HKD", "Hong Kong Dollar", 100).with_symbol(Some("$"));
pub const INR: Currency = Currency::new("INR", "Indian Rupee", 100).with_symbol(Some("₨"));
pub const JPY: Currency = Currency::new("JPY", "Japanese Yen", 100).with_symbol(Some("¥"));
pub const KWD: Currency = Currency::new("KWD", "Kuwaiti Dinar", 1000).with_symbol(Some("د.ك"));
pub const LKR: Currency = Currency::new("LKR", "Sri Lankan Rupee", 100).with_symbol(Some("₨"));
pub const MGA: Currency = Currency::new("MGA", "Malagasy Ariary", 5).with_symbol(Some("Ar"));
pub const MRO: Currency = Currency::new("MRO", "Mauritanian Ouguiya", 5).with_symbol(Some("UM"));
pub const MXN: Currency = Currency::new("MXN", "Mexican Peso", 100).with_symbol(Some("$"));
pub const NOK: Currency = Currency::new("NOK", "Norwegian Krone", 100)
    .with_symbol(Some("kr"))
    .symbol_after();
pub const NPR: Currency = Currency::new("NPR", "Nepalese Rupee", 100).with_symbol(Some("₨"));
pub const NZD: Currency = Currency::new("NZD", "New Zealand Dollar", 100).with_symbol(Some("$"));
pub const PLN: Currency = Currency::new("PLN", "Polish Złoty", 100)
    .with_symbol(Some("zł"))
    .symbol_after()
    .marks(",", " ");
pub const SCR: Currency = Currency::new("SCR", "Seychellois Rupee", 100).with_symbol(Some("₨"));
pub const SEK: Currency = Currency::new("SEK", "Swedish Krona", 100).with_symbol(Some("kr"));
pub const SGD: Currency = Currency::new("SGD", "Singapore Dollar", 100).with_symbol(Some("$"));
pub const TND: Currency = Currency::new("TND", "Tunisian Dinar", 1000).with_symbol(Some("د.ت"));
pub const USD: Currency = Currency::new("USD", "United States Dollar", 100).with_symbol(Some("$"));
pub const XAU: Currency = Currency::new("XAU", "Gold (Troy Ounce)", 1);
pub const YEN: Currency = Currency::new("YEN", "Japanese Yen", 100).with_symbol(Some("¥"));
pub const ZAR: Currency = Currency::new("ZAR", "South African Rand", 100).with_symbol(Some("R"));
pub const ZWD: Currency = Currency::new("ZWD", "Zimbabwean Dollar", 100).with_symbol(Some("$"));

pub(crate) const TABLE: &[Currency] = &[
    AUD, BHD, BRL, CAD, CHF, CLP, CNY, CZK, DKK, EUR, GBP, GHC, HKD, INR, JPY, KWD, LKR, MGA,
    MRO, MXN, NOK, NPR, NZD, PLN, SCR, SEK, SGD, TND, USD, XAU, YEN, ZAR, ZWD,
];
