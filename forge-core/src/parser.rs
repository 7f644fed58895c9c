//! Lenient number parsing and display formatting for user-typed amounts.
//!
//! Parsing never fails: anything that does not start with a number becomes
//! zero, and negative values are clamped to zero, so the result can always
//! be used as a balance, goal or quantity.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::calculations::common::{ceil_whole, non_negative, to_count};

/// Leading number in the shape `parseFloat` accepts: sign, digits with an
/// optional fraction, optional exponent.
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?)(\d+\.?\d*|\.\d+)(?:[eE]([+-]?\d+))?").expect("static pattern")
});

/// Raw value coming from an input field or from code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput<'a> {
    Text(&'a str),
    Number(f64),
    Decimal(Decimal),
}

impl<'a> From<&'a str> for RawInput<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a String> for RawInput<'a> {
    fn from(s: &'a String) -> Self {
        Self::Text(s.as_str())
    }
}

impl From<f64> for RawInput<'_> {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<u64> for RawInput<'_> {
    fn from(n: u64) -> Self {
        Self::Decimal(Decimal::from(n))
    }
}

impl From<Decimal> for RawInput<'_> {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

/// Parses an amount, stripping comma grouping separators first.
///
/// `"1,234.5"` → 1234.5, `"12abc"` → 12, `"abc"` → 0, `"-5"` → 0.
pub fn parse<'a>(raw: impl Into<RawInput<'a>>) -> Decimal {
    match raw.into() {
        RawInput::Text(s) => parse_text(&s.replace(',', "")),
        other => parse_value(other),
    }
}

/// Parses an amount without removing grouping separators, so parsing stops
/// at the first comma: `"1,234"` → 1.
pub fn parse_strict<'a>(raw: impl Into<RawInput<'a>>) -> Decimal {
    match raw.into() {
        RawInput::Text(s) => parse_text(s),
        other => parse_value(other),
    }
}

/// Parses an essence quantity: same rules as [`parse`], fractions dropped.
pub fn parse_quantity<'a>(raw: impl Into<RawInput<'a>>) -> u64 {
    to_count(parse(raw))
}

fn parse_value(raw: RawInput<'_>) -> Decimal {
    let value = match raw {
        RawInput::Number(n) if n.is_finite() => Decimal::from_f64(n).unwrap_or_else(|| {
            tracing::debug!(input = n, "number out of decimal range, using 0");
            Decimal::ZERO
        }),
        RawInput::Number(n) => {
            tracing::debug!(input = n, "non-finite number, using 0");
            Decimal::ZERO
        }
        RawInput::Decimal(d) => d,
        RawInput::Text(s) => return parse_text(s),
    };
    non_negative(value)
}

fn parse_text(s: &str) -> Decimal {
    let trimmed = s.trim();
    let Some(caps) = LEADING_NUMBER.captures(trimmed) else {
        if !trimmed.is_empty() {
            tracing::debug!(input = %s, "not a number, using 0");
        }
        return Decimal::ZERO;
    };

    let negative = &caps[1] == "-";
    let mut mantissa = caps[2].trim_end_matches('.').to_string();
    if mantissa.starts_with('.') {
        mantissa.insert(0, '0');
    }

    let parsed = match caps.get(3) {
        Some(exp) => {
            Decimal::from_scientific(&format!("{mantissa}e{}", exp.as_str().trim_start_matches('+')))
        }
        None => Decimal::from_str(&mantissa),
    };

    match parsed {
        Ok(value) if negative => non_negative(-value),
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(input = %s, "unrepresentable number, using 0: {}", e);
            Decimal::ZERO
        }
    }
}

/// Display settings for whole-number amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    /// Thousands separator, `,` for `1,234` or `.` for `1.234`.
    pub separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self { separator: ',' }
    }
}

impl NumberFormat {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    /// Rounds up to a whole number and groups digits in threes.
    pub fn format(
        &self,
        value: Decimal,
    ) -> String {
        let whole = ceil_whole(value).normalize();
        let digits = whole.abs().trunc().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if whole.is_sign_negative() && !whole.is_zero() {
            grouped.push('-');
        }
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(self.separator);
            }
            grouped.push(ch);
        }
        grouped
    }
}

/// Formats with the default comma separator.
pub fn format_number(value: Decimal) -> String {
    NumberFormat::default().format(value)
}
