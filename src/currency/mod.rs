//! Currency formatting for batch screens and reports
//!
//! Output follows en-US conventions: a symbol for currencies that have one
//! (`$1,250.50`), otherwise the ISO code followed by a non-breaking space
//! (`ZIG 450.00`). Amounts always carry exactly two decimals, rounded half-up.
//! Formatting never fails: a malformed currency code degrades to a plain
//! `$`-prefixed two-decimal string.

use bigdecimal::BigDecimal;
use std::str::FromStr;
use tracing::warn;

const GROUPING_SEPARATOR: char = ',';
const CODE_SEPARATOR: char = '\u{a0}';

/// Symbols used by the en-US locale
const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("INR", "₹"),
    ("CAD", "CA$"),
    ("AUD", "A$"),
    ("NZD", "NZ$"),
    ("HKD", "HK$"),
    ("MXN", "MX$"),
    ("BRL", "R$"),
    ("CNY", "CN¥"),
    ("KRW", "₩"),
    ("ILS", "₪"),
    ("PHP", "₱"),
    ("VND", "₫"),
    ("TWD", "NT$"),
    ("XCD", "EC$"),
    ("XAF", "FCFA"),
];

/// Look up the display symbol for an ISO currency code
pub fn currency_symbol(currency_code: &str) -> Option<&'static str> {
    let code = currency_code.trim().to_ascii_uppercase();
    CURRENCY_SYMBOLS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, symbol)| *symbol)
}

/// A well-formed ISO 4217 code is exactly three ASCII letters, in any case
pub fn is_well_formed_code(currency_code: &str) -> bool {
    currency_code.len() == 3 && currency_code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Format a floating-point amount. NaN and infinite values are treated as zero.
pub fn format_currency(amount: f64, currency_code: &str) -> String {
    let amount = if amount.is_finite() {
        BigDecimal::from_str(&amount.to_string()).unwrap_or_else(|_| BigDecimal::from(0))
    } else {
        BigDecimal::from(0)
    };
    format_amount(&amount, currency_code)
}

/// Format an exact decimal amount in the given currency
pub fn format_amount(amount: &BigDecimal, currency_code: &str) -> String {
    let code = currency_code.trim();
    let cents = RoundedCents::from_amount(amount);

    if !is_well_formed_code(code) {
        warn!(currency_code, "invalid currency code, using plain fallback");
        return format!("${}", cents.plain());
    }

    let code = code.to_ascii_uppercase();
    let sign = if cents.negative { "-" } else { "" };
    let body = format!("{}.{}", group_thousands(&cents.units), cents.fraction);

    match currency_symbol(&code) {
        Some(symbol) => format!("{}{}{}", sign, symbol, body),
        None => format!("{}{}{}{}", sign, code, CODE_SEPARATOR, body),
    }
}

/// An amount rounded half-up to whole cents and split into digit strings
struct RoundedCents {
    negative: bool,
    units: String,
    fraction: String,
}

impl RoundedCents {
    fn from_amount(amount: &BigDecimal) -> Self {
        let half_cent = BigDecimal::new(5.into(), 3);
        let scaled = (amount.abs() + half_cent) * BigDecimal::from(100);
        let (digits, _) = scaled.with_scale(0).as_bigint_and_exponent();

        let mut digits = digits.to_string();
        while digits.len() < 3 {
            digits.insert(0, '0');
        }
        let split = digits.len() - 2;
        let fraction = digits.split_off(split);

        // A value that rounds to zero is shown without a sign
        let is_zero = digits.chars().all(|c| c == '0') && fraction == "00";
        Self {
            negative: *amount < BigDecimal::from(0) && !is_zero,
            units: digits,
            fraction,
        }
    }

    /// Two-decimal rendering without grouping, e.g. `-1234.50`
    fn plain(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        format!("{}{}.{}", sign, self.units, self.fraction)
    }
}

fn group_thousands(units: &str) -> String {
    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (index, digit) in units.chars().enumerate() {
        if index > 0 && (units.len() - index) % 3 == 0 {
            grouped.push(GROUPING_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_currency(1250.5, "USD"), "$1,250.50");
        assert_eq!(format_currency(1234.5, "USD"), "$1,234.50");
        assert_eq!(format_currency(0.0, "usd"), "$0.00");
        assert_eq!(format_currency(1234567.891, "USD"), "$1,234,567.89");
        assert_eq!(format_currency(999.999, "USD"), "$1,000.00");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_currency(-100.0, "USD"), "-$100.00");
        assert_eq!(format_currency(-0.0004, "USD"), "$0.00");
    }

    #[test]
    fn test_nan_is_zero() {
        assert_eq!(format_currency(f64::NAN, "USD"), "$0.00");
        assert_eq!(format_currency(f64::INFINITY, "EUR"), "€0.00");
    }

    #[test]
    fn test_code_without_symbol() {
        assert_eq!(format_currency(450.0, "ZiG"), "ZIG\u{a0}450.00");
        assert_eq!(format_currency(-50000.0, "ZAR"), "-ZAR\u{a0}50,000.00");
    }

    #[test]
    fn test_invalid_code_falls_back() {
        assert_eq!(format_currency(10.0, "XXX-invalid"), "$10.00");
        assert_eq!(format_currency(1234.5, ""), "$1234.50");
        assert_eq!(format_currency(-5.0, "US"), "$-5.00");
    }

    #[test]
    fn test_rounds_half_up() {
        let amount = BigDecimal::from_str("0.005").unwrap();
        assert_eq!(format_amount(&amount, "USD"), "$0.01");
        let amount = BigDecimal::from_str("-2.345").unwrap();
        assert_eq!(format_amount(&amount, "GBP"), "-£2.35");
    }
}
