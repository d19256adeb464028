//! # Token Units
//!
//! All amounts are [`Amount`] values in the token's smallest unit (the
//! wei-equivalent). Humans think in whole tokens, so this module converts
//! between the two at the edges: `parse_units("1.0", 18)` yields
//! `1_000_000_000_000_000_000`, and `format_units` renders it back as `"1.0"`.
//!
//! Rendering follows the convention wallets and explorers use: at least one
//! fractional digit, trailing zeros stripped. The conversion is purely
//! textual, so no precision is ever lost to floating point.

use thiserror::Error;

/// An amount in a token's smallest unit.
///
/// `u128` covers 3.4 × 10^38 base units, i.e. more than 10^20 whole tokens at
/// 18 decimals. That is far beyond any real carbon-credit supply.
pub type Amount = u128;

/// Largest decimal precision representable with [`Amount`].
pub const MAX_DECIMALS: u8 = 38;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while parsing a human-readable amount.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitsError {
    /// The input string was empty.
    #[error("empty amount")]
    Empty,

    /// Negative amounts are meaningless for token balances.
    #[error("negative amount: {0}")]
    Negative(String),

    /// The input contains something other than digits and one decimal point.
    #[error("invalid amount: {0}")]
    InvalidFormat(String),

    /// The input has more fractional digits than the token supports.
    #[error("too many decimal places: token supports {decimals}, got {given}")]
    TooManyDecimals {
        /// Precision of the token.
        decimals: u8,
        /// Significant fractional digits in the input.
        given: usize,
    },

    /// The token precision cannot be represented with a `u128`.
    #[error("unsupported decimals: {0} (max 38)")]
    UnsupportedDecimals(u8),

    /// The scaled amount does not fit in an [`Amount`].
    #[error("amount overflow: {0}")]
    Overflow(String),
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Parses a decimal string such as `"1.0"` or `"0.25"` into smallest units.
///
/// Surrounding whitespace is ignored. Trailing fractional zeros beyond the
/// token's precision are accepted (`"1.500"` at 2 decimals is fine), but any
/// significant digit past the precision is rejected rather than rounded.
///
/// # Errors
///
/// Returns [`UnitsError`] describing the first problem found.
pub fn parse_units(text: &str, decimals: u8) -> Result<Amount, UnitsError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitsError::UnsupportedDecimals(decimals));
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(UnitsError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(UnitsError::Negative(trimmed.to_string()));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(UnitsError::InvalidFormat(trimmed.to_string()));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals {
            decimals,
            given: fraction.len(),
        });
    }

    let overflow = || UnitsError::Overflow(trimmed.to_string());
    let scale = 10u128.pow(decimals as u32);

    let whole_value: Amount = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };

    let fraction_value: Amount = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = decimals as usize);
        padded.parse().map_err(|_| overflow())?
    };

    whole_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(overflow)
}

/// Renders smallest units as a decimal string, e.g. `"4.5"` or `"1.0"`.
///
/// Always includes at least one fractional digit and strips trailing zeros.
pub fn format_units(amount: Amount, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return format!("{digits}.0");
    }

    let padded = if digits.len() <= decimals {
        format!("{:0>width$}", digits, width = decimals + 1)
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{fraction}")
    }
}
