//! Human readable token amounts
use alloc::{format, string::String};
use core::fmt;
use odra::casper_types::U256;

/// Reasons a decimal amount cannot be converted to base units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitsError {
    /// Nothing to parse
    Empty,
    /// A character other than a digit or a single `.`
    InvalidDigit,
    /// More fractional digits than the token has decimals
    TooManyDecimals,
    /// The amount does not fit in U256
    Overflow,
}

impl fmt::Display for UnitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitsError::Empty => write!(f, "empty amount"),
            UnitsError::InvalidDigit => write!(f, "amount must be a decimal number"),
            UnitsError::TooManyDecimals => write!(f, "too many fractional digits"),
            UnitsError::Overflow => write!(f, "amount too large"),
        }
    }
}

/// `10^decimals`, or `None` when it does not fit in U256
fn unit(decimals: u8) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(decimals))
}

/// Formats `value` base units as a decimal string with `decimals` places.
/// Trailing zeros are trimmed but one fractional digit is always kept,
/// e.g. `1.0`, `0.5`, `1234.000001`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let Some(unit) = unit(decimals) else {
        return format!("{}", value);
    };
    let whole = value / unit;
    if decimals == 0 {
        return format!("{}.0", whole);
    }

    let fraction = format!("{}", value % unit);
    let mut digits = String::new();
    for _ in fraction.len()..decimals as usize {
        digits.push('0');
    }
    digits.push_str(&fraction);
    let trimmed = digits.trim_end_matches('0');
    let trimmed = if trimmed.is_empty() { "0" } else { trimmed };
    format!("{}.{}", whole, trimmed)
}

/// Parses a decimal string such as `1000000` or `0.5` into base units of a
/// token with `decimals` places.
pub fn parse_units(text: &str, decimals: u8) -> Result<U256, UnitsError> {
    let text = text.trim();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(UnitsError::Empty);
    }
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(UnitsError::InvalidDigit);
    }
    if fraction.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals);
    }

    let mut value = U256::zero();
    let padding = decimals as usize - fraction.len();
    let digits = whole.bytes().chain(fraction.bytes()).chain((0..padding).map(|_| b'0'));
    for digit in digits {
        value = value
            .checked_mul(U256::from(10u64))
            .and_then(|v| v.checked_add(U256::from(digit - b'0')))
            .ok_or(UnitsError::Overflow)?;
    }
    Ok(value)
}
