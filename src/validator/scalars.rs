//! Checks for scalar rule types.

use super::Validator;
use crate::error::{Reason, ValidationError, ValidationResult};
use crate::parsers::macros::{is_any_lld_macro, is_user_macro};
use crate::parsers::number::{
    INT64_MAX, NumberError, UINT64_MAX, is_float_literal, parse_numeric, parse_signed,
    parse_unsigned,
};
use crate::schema::{Flags, Rule};
use crate::value::Value;
use log::{debug, warn};

/// Minimum length of a pre-shared key.
const PSK_MIN_LENGTH: usize = 32;

/// Borrow the text of a string value.
///
/// Fails unless `data` is a valid UTF-8 string, and, with `not_empty` set,
/// a non-empty one.
pub(crate) fn check_string<'a>(
    data: &'a Value,
    not_empty: bool,
    path: &str,
) -> ValidationResult<&'a str> {
    let Value::Str(bytes) = data else {
        return Err(ValidationError::invalid(path, Reason::StringExpected));
    };
    let text = std::str::from_utf8(bytes)
        .map_err(|_| ValidationError::invalid(path, Reason::InvalidUtf8))?;

    if not_empty && text.is_empty() {
        return Err(ValidationError::invalid(path, Reason::Empty));
    }

    Ok(text)
}

/// Enforce the rule's maximum length, counted in characters.
pub(crate) fn check_length(rule: &Rule, text: &str, path: &str) -> ValidationResult<()> {
    match rule.length {
        Some(max) if text.chars().count() > max => {
            Err(ValidationError::invalid(path, Reason::TooLong))
        }
        _ => Ok(()),
    }
}

/// Enforce the rule's numeric `in` list on a whole number.
pub(crate) fn check_int_in(rule: &Rule, value: i64, path: &str) -> ValidationResult<()> {
    match &rule.allowed {
        Some(allowed) if !allowed.contains_number(value as f64) => Err(ValidationError::invalid(
            path,
            Reason::NotOneOf(allowed.describe_ranges()),
        )),
        _ => Ok(()),
    }
}

fn number_error(path: &str, error: NumberError, malformed: Reason) -> ValidationError {
    match error {
        NumberError::Malformed => ValidationError::invalid(path, malformed),
        NumberError::TooLarge => ValidationError::invalid(path, Reason::NumberTooLarge),
    }
}

impl Validator {
    pub(super) fn check_string_utf8(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        let text = check_string(&data, rule.flags.contains(Flags::NOT_EMPTY), path)?;
        check_length(rule, text, path)?;

        if let Some(allowed) = &rule.allowed {
            if !allowed.contains_literal(text) {
                return Err(ValidationError::invalid(
                    path,
                    Reason::NotOneOf(allowed.describe_literals()),
                ));
            }
        }

        Ok(data)
    }

    /// Signed 32-bit integer given as a number or a decimal string.
    pub(super) fn check_int32(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        let value = match &data {
            Value::Int(n) => *n,
            Value::Str(_) => {
                let text = data
                    .as_str()
                    .ok_or_else(|| ValidationError::invalid(path, Reason::IntegerExpected))?;
                parse_signed(text).map_err(|e| number_error(path, e, Reason::IntegerExpected))?
            }
            _ => return Err(ValidationError::invalid(path, Reason::IntegerExpected)),
        };

        if i32::try_from(value).is_err() {
            return Err(ValidationError::invalid(path, Reason::NumberTooLarge));
        }
        check_int_in(rule, value, path)?;

        Ok(Value::Int(value))
    }

    /// Unsigned 64-bit integer, normalized to its decimal string.
    pub(super) fn check_uint64(&self, data: Value, path: &str) -> ValidationResult<Value> {
        let digits = unsigned_digits(&data, UINT64_MAX)
            .map_err(|e| number_error(path, e, Reason::UnsignedIntegerExpected))?;
        Ok(Value::string(digits))
    }

    /// Object identifier: an unsigned integer up to the signed 64-bit limit.
    pub(super) fn check_id(&self, rule: &Rule, data: Value, path: &str) -> ValidationResult<Value> {
        let digits = unsigned_digits(&data, INT64_MAX)
            .map_err(|e| number_error(path, e, Reason::NumberExpected))?;

        if rule.flags.contains(Flags::NOT_EMPTY) && digits == "0" {
            return Err(ValidationError::invalid(path, Reason::Empty));
        }

        Ok(Value::string(digits))
    }

    pub(super) fn check_float(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        let value = match &data {
            Value::Int(n) => *n as f64,
            Value::Float(n) => *n,
            Value::Str(_) => {
                let text = data
                    .as_str()
                    .ok_or_else(|| ValidationError::invalid(path, Reason::FloatExpected))?;

                if (rule.flags.contains(Flags::ALLOW_USER_MACRO) && is_user_macro(text))
                    || (rule.flags.contains(Flags::ALLOW_LLD_MACRO) && is_any_lld_macro(text))
                {
                    return Ok(data);
                }
                if !is_float_literal(text) {
                    return Err(ValidationError::invalid(path, Reason::FloatExpected));
                }
                text.parse::<f64>()
                    .map_err(|_| ValidationError::invalid(path, Reason::FloatExpected))?
            }
            _ => return Err(ValidationError::invalid(path, Reason::FloatExpected)),
        };

        if let Some(allowed) = &rule.allowed {
            if !allowed.contains_number(value) {
                return Err(ValidationError::invalid(
                    path,
                    Reason::OutOfRange(allowed.describe_ranges()),
                ));
            }
        }

        Ok(Value::Float(value))
    }

    pub(super) fn check_boolean(&self, data: Value, path: &str) -> ValidationResult<Value> {
        match data {
            Value::Bool(_) => Ok(data),
            _ => Err(ValidationError::invalid(path, Reason::BooleanExpected)),
        }
    }

    /// Flags are booleans. Legacy clients send any value to mean "set", so
    /// non-booleans are accepted and turned into `true` unless null.
    pub(super) fn check_flag(&self, data: Value, path: &str) -> Value {
        if let Value::Bool(_) = data {
            return data;
        }

        warn!("Non-boolean flag at {} is deprecated", path);
        Value::Bool(!data.is_null())
    }

    /// Six hexadecimal digits, or empty unless `NOT_EMPTY` is set.
    pub(super) fn check_color(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        let not_empty = rule.flags.contains(Flags::NOT_EMPTY);
        let text = check_string(&data, not_empty, path)?;

        if text.is_empty() {
            return Ok(data);
        }
        if text.len() != 6 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValidationError::invalid(path, Reason::ColorExpected));
        }

        Ok(data)
    }

    /// Decimal number with an optional time or size suffix such as `5m` or
    /// `1.5K`, normalized without redundant leading zeros.
    pub(super) fn check_numeric(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        let data = match data {
            Value::Int(n) => Value::string(n.to_string()),
            other => other,
        };

        let text = check_string(&data, rule.flags.contains(Flags::NOT_EMPTY), path)?;
        check_length(rule, text, path)?;

        if text.is_empty() {
            return Ok(data);
        }

        let canonical =
            parse_numeric(text).map_err(|e| number_error(path, e, Reason::NumberExpected))?;
        if canonical != text {
            debug!("Normalized numeric value at {}: {} -> {}", path, text, canonical);
        }

        Ok(Value::string(canonical))
    }

    /// Pre-shared key: pairs of hexadecimal digits, at least 32 characters.
    pub(super) fn check_psk(&self, rule: &Rule, data: Value, path: &str) -> ValidationResult<Value> {
        let text = check_string(&data, rule.flags.contains(Flags::NOT_EMPTY), path)?;
        let length = text.chars().count();

        if length != 0 && length < PSK_MIN_LENGTH {
            return Err(ValidationError::invalid(
                path,
                Reason::TooShort(PSK_MIN_LENGTH),
            ));
        }
        if length % 2 != 0 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValidationError::invalid(path, Reason::HexPairsExpected));
        }
        check_length(rule, text, path)?;

        Ok(data)
    }
}

/// Canonical digits of an unsigned integer given as a number or a string.
fn unsigned_digits(data: &Value, limit: &str) -> Result<String, NumberError> {
    match data {
        Value::Int(n) if *n >= 0 => parse_unsigned(&n.to_string(), limit),
        Value::Str(_) => parse_unsigned(data.as_str().ok_or(NumberError::Malformed)?, limit),
        _ => Err(NumberError::Malformed),
    }
}
