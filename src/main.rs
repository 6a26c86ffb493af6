//! money-engine CLI
//!
//! Format, split, allocate and convert amounts from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Render 1234.56 EUR
//! money-engine format --cents 123456 --currency EUR --with-currency
//!
//! # Split $100 three ways, as JSON
//! money-engine split --cents 10000 --currency USD --parts 3 --format json
//!
//! # Allocate by ratio
//! money-engine allocate --cents 5 --currency USD --ratios 0.3,0.7
//!
//! # Convert with an ad-hoc rate
//! money-engine exchange --cents 1000 --from EUR --to USD --rate 1.08
//! ```
//!
//! Settings (default currency, rates, locale overrides) are read from the
//! JSON file named by `MONEY_ENGINE_CONFIG`. Set `RUST_LOG=debug` for logs.

use money_engine::bank::VariableExchange;
use money_engine::config::Settings;
use money_engine::core::currency::Currency;
use money_engine::core::money::Money;
use money_engine::format::{FormatOptions, Formatter};
use money_engine::{MoneyError, Result};
use rust_decimal::Decimal;
use std::env;
use std::process;

fn print_usage() {
    eprintln!(
        r#"money-engine: exact money arithmetic over minor units

USAGE:
    money-engine <COMMAND> [OPTIONS]

COMMANDS:
    format       Render an amount
    split        Split an amount into equal parts
    allocate     Allocate an amount by ratios
    exchange     Convert an amount to another currency
    currencies   List known currencies
    help         Show this message

COMMON OPTIONS:
    --cents <N>          Amount in minor units
    --currency <CODE>    Currency code (default: configured default currency)
    --format <FORMAT>    Output format: text (default) or json

OPTIONS (format):
    --no-cents --with-currency --no-symbol --html
    --locale <LOCALE>    Locale for separator/delimiter overrides

OPTIONS (split):
    --parts <N>          Number of parts

OPTIONS (allocate):
    --ratios <LIST>      Comma-separated ratios summing to at most 1

OPTIONS (exchange):
    --from <CODE> --to <CODE>
    --rate <R>           Store this rate before converting

ENVIRONMENT:
    MONEY_ENGINE_CONFIG  Path to a JSON settings file
    RUST_LOG             Log filter (e.g. debug)"#
    );
}

/// Parsed command-line options shared by every command.
#[derive(Debug, Default)]
struct Options {
    cents: Option<i64>,
    currency: Option<String>,
    format: String,
    parts: Option<usize>,
    ratios: Vec<Decimal>,
    from: Option<String>,
    to: Option<String>,
    rate: Option<Decimal>,
    locale: Option<String>,
    no_cents: bool,
    with_currency: bool,
    no_symbol: bool,
    html: bool,
}

fn invalid(message: impl Into<String>) -> MoneyError {
    MoneyError::InvalidArgument(message.into())
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| invalid(format!("{} requires a value", flag)))
}

fn parse_decimal(text: &str) -> Result<Decimal> {
    text.trim()
        .parse()
        .map_err(|e| invalid(format!("invalid number '{}': {}", text, e)))
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut options = Options {
        format: "text".to_string(),
        ..Default::default()
    };
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--cents" => {
                i += 1;
                let text = value(args, i, flag)?;
                options.cents = Some(
                    text.parse()
                        .map_err(|_| invalid(format!("--cents requires an integer, got '{}'", text)))?,
                );
            }
            "--currency" => {
                i += 1;
                options.currency = Some(value(args, i, flag)?.to_string());
            }
            "--format" => {
                i += 1;
                options.format = value(args, i, flag)?.to_string();
            }
            "--parts" => {
                i += 1;
                let text = value(args, i, flag)?;
                options.parts = Some(
                    text.parse()
                        .map_err(|_| invalid(format!("--parts requires a number, got '{}'", text)))?,
                );
            }
            "--ratios" => {
                i += 1;
                options.ratios = value(args, i, flag)?
                    .split(',')
                    .map(parse_decimal)
                    .collect::<Result<Vec<_>>>()?;
            }
            "--from" => {
                i += 1;
                options.from = Some(value(args, i, flag)?.to_string());
            }
            "--to" => {
                i += 1;
                options.to = Some(value(args, i, flag)?.to_string());
            }
            "--rate" => {
                i += 1;
                options.rate = Some(parse_decimal(value(args, i, flag)?)?);
            }
            "--locale" => {
                i += 1;
                options.locale = Some(value(args, i, flag)?.to_string());
            }
            "--no-cents" => options.no_cents = true,
            "--with-currency" => options.with_currency = true,
            "--no-symbol" => options.no_symbol = true,
            "--html" => options.html = true,
            _ => return Err(invalid(format!("unknown option: {}", flag))),
        }
        i += 1;
    }
    if options.format != "text" && options.format != "json" {
        return Err(invalid(format!(
            "--format requires 'text' or 'json', got '{}'",
            options.format
        )));
    }
    Ok(options)
}

impl Options {
    fn money(&self) -> Result<Money> {
        let cents = self
            .cents
            .ok_or_else(|| invalid("--cents <N> is required"))?;
        match &self.currency {
            Some(code) => Ok(Money::new(cents, Currency::find(code)?)),
            None => Ok(Money::from_cents(cents)),
        }
    }

    fn json(&self) -> bool {
        self.format == "json"
    }
}

/// JSON output schema for split, allocate and exchange.
#[derive(serde::Serialize)]
struct PartsOutput {
    total: Money,
    parts: Vec<Money>,
}

#[derive(serde::Serialize)]
struct ExchangeOutput {
    from: Money,
    to: Money,
    #[serde(with = "rust_decimal::serde::str")]
    rate: Decimal,
}

#[derive(serde::Serialize)]
struct CurrencyOutput {
    code: &'static str,
    name: &'static str,
    subunit_to_unit: u32,
    symbol: Option<&'static str>,
}

fn print_parts(options: &Options, formatter: &Formatter, total: Money, parts: Vec<Money>) -> Result<()> {
    if options.json() {
        println!("{}", serde_json::to_string_pretty(&PartsOutput { total, parts })?);
    } else {
        let plain = FormatOptions::new();
        println!("Total: {}", formatter.format(&total, &plain));
        for (i, part) in parts.iter().enumerate() {
            println!("  Part {}: {}", i + 1, formatter.format(part, &plain));
        }
    }
    Ok(())
}

fn cmd_format(options: &Options, formatter: Formatter) -> Result<()> {
    let money = options.money()?;
    let formatter = match &options.locale {
        Some(locale) => formatter.with_locale(locale.as_str()),
        None => formatter,
    };
    let mut format_options = FormatOptions::new();
    if options.no_cents {
        format_options = format_options.no_cents();
    }
    if options.with_currency {
        format_options = format_options.with_currency();
    }
    if options.no_symbol {
        format_options = format_options.no_symbol();
    }
    if options.html {
        format_options = format_options.html();
    }
    println!("{}", formatter.format(&money, &format_options));
    Ok(())
}

fn cmd_split(options: &Options, formatter: &Formatter) -> Result<()> {
    let money = options.money()?;
    let parts = options
        .parts
        .ok_or_else(|| invalid("--parts <N> is required"))?;
    let shares = money.split(parts)?;
    print_parts(options, formatter, money, shares)
}

fn cmd_allocate(options: &Options, formatter: &Formatter) -> Result<()> {
    let money = options.money()?;
    if options.ratios.is_empty() {
        return Err(invalid("--ratios <LIST> is required"));
    }
    let shares = money.allocate(&options.ratios)?;
    print_parts(options, formatter, money, shares)
}

fn cmd_exchange(options: &Options, formatter: &Formatter) -> Result<()> {
    let from = options
        .from
        .as_deref()
        .ok_or_else(|| invalid("--from <CODE> is required"))?;
    let to = Currency::find(
        options
            .to
            .as_deref()
            .ok_or_else(|| invalid("--to <CODE> is required"))?,
    )?;
    let source = Currency::find(from)?;
    let cents = options
        .cents
        .ok_or_else(|| invalid("--cents <N> is required"))?;

    let bank = VariableExchange::instance();
    if let Some(rate) = options.rate {
        bank.add_rate(source, to, rate)?;
    }
    let money = Money::new(cents, source);
    let converted = money.exchange_to(to)?;
    let rate = bank.get_rate(source, to).unwrap_or(Decimal::ONE);

    if options.json() {
        let output = ExchangeOutput {
            from: money,
            to: converted,
            rate,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let plain = FormatOptions::new().with_currency();
        println!(
            "{} = {} (rate {})",
            formatter.format(&money, &plain),
            formatter.format(&converted, &plain),
            rate
        );
    }
    Ok(())
}

fn cmd_currencies(options: &Options) -> Result<()> {
    if options.json() {
        let all: Vec<CurrencyOutput> = Currency::all()
            .map(|c| CurrencyOutput {
                code: c.code(),
                name: c.name(),
                subunit_to_unit: c.subunit_to_unit(),
                symbol: c.symbol(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&all)?);
    } else {
        for currency in Currency::all() {
            println!(
                "{}  {:<28} {:>5}  {}",
                currency.code(),
                currency.name(),
                currency.subunit_to_unit(),
                currency.symbol().unwrap_or("")
            );
        }
    }
    Ok(())
}

fn run(args: &[String]) -> Result<()> {
    let command = match args.first() {
        Some(command) => command.as_str(),
        None => {
            print_usage();
            return Ok(());
        }
    };
    if matches!(command, "help" | "--help" | "-h") {
        print_usage();
        return Ok(());
    }

    let options = parse_options(&args[1..])?;
    let formatter = Settings::from_env()?.apply(&VariableExchange::instance())?;

    match command {
        "format" => cmd_format(&options, formatter),
        "split" => cmd_split(&options, &formatter),
        "allocate" => cmd_allocate(&options, &formatter),
        "exchange" => cmd_exchange(&options, &formatter),
        "currencies" => cmd_currencies(&options),
        other => {
            print_usage();
            Err(invalid(format!("unknown command: {}", other)))
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
