//! Decimal number grammar and exact range checks.
//!
//! Values are compared as digit strings so that limits such as
//! `9223372036854775807` are enforced exactly, without passing through
//! floating point.

use std::cmp::Ordering;

pub const UINT64_MAX: &str = "18446744073709551615";
pub const INT64_MAX: &str = "9223372036854775807";

/// `2^63 - 1`, the largest magnitude of a positive numeric value.
const POSITIVE_LIMIT: u128 = i64::MAX as u128;
/// `2^63`, the largest magnitude of a negative numeric value.
const NEGATIVE_LIMIT: u128 = POSITIVE_LIMIT + 1;

/// Problem found in a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    Malformed,
    TooLarge,
}

/// Drop leading zeros from a run of ASCII digits, keeping at least one.
pub fn strip_leading_zeros(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0"
    } else {
        trimmed
    }
}

/// Compare two unsigned digit strings without leading zeros.
pub fn compare_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

pub fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Check an unsigned digit string against an inclusive decimal `limit`.
///
/// Returns the canonical form without leading zeros.
pub fn parse_unsigned(text: &str, limit: &str) -> Result<String, NumberError> {
    if !is_digits(text) {
        return Err(NumberError::Malformed);
    }

    let digits = strip_leading_zeros(text);
    if compare_digits(digits, limit) == Ordering::Greater {
        return Err(NumberError::TooLarge);
    }

    Ok(digits.to_string())
}

/// Parse a signed integer string of the form `-?[0-9]+`.
///
/// Magnitudes that do not fit in 64 bits report [`NumberError::TooLarge`].
pub fn parse_signed(text: &str) -> Result<i64, NumberError> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if !is_digits(digits) {
        return Err(NumberError::Malformed);
    }

    let digits = strip_leading_zeros(digits);
    let magnitude: i128 = if digits.len() > 20 {
        return Err(NumberError::TooLarge);
    } else {
        digits.parse().map_err(|_| NumberError::TooLarge)?
    };

    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| NumberError::TooLarge)
}

/// Multiplier of a time or size suffix.
pub fn suffix_multiplier(suffix: char) -> Option<u64> {
    match suffix {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3_600),
        'd' => Some(86_400),
        'w' => Some(604_800),
        'K' => Some(1 << 10),
        'M' => Some(1 << 20),
        'G' => Some(1 << 30),
        'T' => Some(1 << 40),
        _ => None,
    }
}

/// Parse a number with optional fraction and suffix, such as `-1.5`, `30m`
/// or `8388607T`, and return it with redundant leading zeros removed.
///
/// The value multiplied by its suffix must fit in a signed 64-bit integer.
pub fn parse_numeric(text: &str) -> Result<String, NumberError> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (number, multiplier, suffix) = match body.chars().last() {
        Some(c) if !c.is_ascii_digit() => match suffix_multiplier(c) {
            Some(multiplier) => (&body[..body.len() - c.len_utf8()], multiplier, Some(c)),
            None => return Err(NumberError::Malformed),
        },
        _ => (body, 1, None),
    };

    let (integer, fraction) = match number.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (number, None),
    };
    if !is_digits(integer) || fraction.is_some_and(|f| !is_digits(f)) {
        return Err(NumberError::Malformed);
    }

    let integer = strip_leading_zeros(integer);
    let limit = if negative { NEGATIVE_LIMIT } else { POSITIVE_LIMIT };
    if !fits_within(integer, fraction.unwrap_or(""), u128::from(multiplier), limit) {
        return Err(NumberError::TooLarge);
    }

    let mut canonical = String::with_capacity(text.len());
    if negative {
        canonical.push('-');
    }
    canonical.push_str(integer);
    if let Some(fraction) = fraction {
        canonical.push('.');
        canonical.push_str(fraction);
    }
    if let Some(suffix) = suffix {
        canonical.push(suffix);
    }

    Ok(canonical)
}

/// Whether `integer.fraction * multiplier <= limit`, computed exactly.
fn fits_within(integer: &str, fraction: &str, multiplier: u128, limit: u128) -> bool {
    // anything beyond 20 digits exceeds every limit used here
    if integer.len() > 20 {
        return false;
    }
    let Ok(whole) = integer.parse::<u128>() else {
        return false;
    };
    let Some(scaled) = whole.checked_mul(multiplier) else {
        return false;
    };

    match scaled.cmp(&limit) {
        Ordering::Greater => false,
        Ordering::Equal => fraction.bytes().all(|b| b == b'0'),
        Ordering::Less => {
            // the fractional part contributes less than one multiplier
            let remaining = limit - scaled;
            if remaining >= multiplier {
                return true;
            }
            fraction_at_most(fraction, remaining, multiplier)
        }
    }
}

/// Whether the decimal fraction `0.<fraction>` is at most `numerator / denominator`
/// where `numerator < denominator`.
fn fraction_at_most(fraction: &str, numerator: u128, denominator: u128) -> bool {
    let mut remainder = numerator;

    for digit in fraction.bytes().map(|b| u128::from(b - b'0')) {
        remainder *= 10;
        let bound = remainder / denominator;
        remainder %= denominator;

        match digit.cmp(&bound) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {}
        }
    }

    true
}

/// Seconds denoted by a simple interval such as `30`, `5m` or `-2w`.
///
/// Returns `None` if the text is not an interval; magnitudes too large for
/// 64 bits saturate so the caller's range check rejects them.
pub fn interval_seconds(text: &str) -> Option<i64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (digits, multiplier) = match body.chars().last() {
        Some(c @ ('s' | 'm' | 'h' | 'd' | 'w')) => (&body[..body.len() - 1], suffix_multiplier(c)?),
        _ => (body, 1),
    };
    if !is_digits(digits) {
        return None;
    }

    let digits = strip_leading_zeros(digits);
    let magnitude = if digits.len() > 20 {
        i128::MAX
    } else {
        digits
            .parse::<i128>()
            .ok()?
            .saturating_mul(i128::from(multiplier))
    };
    let value = if negative { -magnitude } else { magnitude };

    Some(i64::try_from(value).unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

/// Whether `text` is a floating point literal: `1`, `-0.5`, `.23E11`, `1.23e+11`.
pub fn is_float_literal(text: &str) -> bool {
    let body = text.strip_prefix('-').unwrap_or(text);

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(index) => (&body[..index], Some(&body[index + 1..])),
        None => (body, None),
    };

    let mantissa_ok = match mantissa.split_once('.') {
        Some((integer, fraction)) => {
            (is_digits(integer) && (fraction.is_empty() || is_digits(fraction)))
                || (integer.is_empty() && is_digits(fraction))
        }
        None => is_digits(mantissa),
    };

    let exponent_ok = exponent.is_none_or(|exp| {
        let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        is_digits(exp)
    });

    mantissa_ok && exponent_ok
}
