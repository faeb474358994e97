//! Number rendering for tables, CSV and terminal output.
//!
//! Engine figures are raw `f64`s; rounding is strictly a presentation concern and
//! happens here, on `Decimal`s built from the exact binary value.

use core_types::Currency;
use rust_decimal::prelude::*;

/// Rendered in place of a missing or non-numeric value.
pub const PLACEHOLDER: &str = "–";

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value)
}

fn round(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Inserts `sep` every three digits of an unsigned integer string.
fn group_thousands(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Renders an already-formatted plain number (`-1234.5`) with locale separators.
fn localize(plain: &str, thousands: char, decimal: char) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let mut out = String::from(sign);
    out.push_str(&group_thousands(int_part, thousands));
    if let Some(frac) = frac_part {
        out.push(decimal);
        out.push_str(frac);
    }
    out
}

fn fixed_plain(value: Decimal, decimals: u32) -> String {
    let rounded = round(value, decimals);
    // A rounded negative zero would otherwise print as "-0.00".
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    format!("{:.*}", decimals as usize, rounded)
}

/// `Number.prototype.toFixed`: fixed decimals, no grouping, `.` separator.
pub fn to_fixed(value: f64, decimals: u32) -> String {
    match to_decimal(value) {
        Some(d) => fixed_plain(d, decimals),
        None => value.to_string(),
    }
}

/// en-US rendering with at most `max_fraction_digits`, trailing zeros dropped.
///
/// `fmt_max_fraction(1234.5, 2)` is `"1,234.5"`.
pub fn fmt_max_fraction(value: f64, max_fraction_digits: u32) -> String {
    match to_decimal(value) {
        Some(d) => {
            let rounded = round(d, max_fraction_digits).normalize();
            let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
            localize(&rounded.to_string(), ',', '.')
        }
        None => value.to_string(),
    }
}

/// ro-RO rendering with exactly `decimals` fraction digits.
///
/// `format_number(Some(1234.5), 2)` is `"1.234,50"`.
pub fn format_number(value: Option<f64>, decimals: u32) -> String {
    match value.and_then(to_decimal) {
        Some(d) => localize(&fixed_plain(d, decimals), '.', ','),
        None => PLACEHOLDER.to_string(),
    }
}

/// Amount with its currency: `€ 1.234,50`, `1.234,50 RON`, `1.234,50 MDL`.
pub fn format_currency(value: Option<f64>, currency: Currency, decimals: u32) -> String {
    let formatted = format_number(value, decimals);
    if formatted == PLACEHOLDER {
        return formatted;
    }
    match currency {
        Currency::Eur => format!("{} {}", currency.symbol(), formatted),
        Currency::Ron | Currency::Mdl => format!("{} {}", formatted, currency.symbol()),
    }
}

pub fn format_percentage(value: Option<f64>, decimals: u32) -> String {
    let formatted = format_number(value, decimals);
    if formatted == PLACEHOLDER {
        return formatted;
    }
    format!("{}%", formatted)
}

pub fn format_price_per_sqm(value: Option<f64>, currency: Currency) -> String {
    let formatted = format_currency(value, currency, 2);
    if formatted == PLACEHOLDER {
        return formatted;
    }
    format!("{}/m²", formatted)
}

/// Converts an EUR amount at `rate` and renders it in the target currency.
pub fn format_eur_to(eur: f64, rate: f64, currency: Currency) -> String {
    format_currency(Some(eur * rate), currency, 2)
}
