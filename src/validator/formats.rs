//! Checks for strings with a domain-specific grammar.

use super::Validator;
use super::scalars::{check_int_in, check_length, check_string};
use crate::error::{Reason, ValidationError, ValidationResult};
use crate::parsers::macros::{
    contains_user_macro, is_any_lld_macro, is_lld_macro, is_user_macro, parse_user_macro_function,
};
use crate::parsers::names::{ParsedName, is_valid_script_path, parse_host_group_name, parse_host_name};
use crate::parsers::network::{Bound, MacroSupport, is_dns, is_ip, parse_int_ranges};
use crate::parsers::number::{NumberError, interval_seconds, parse_signed};
use crate::parsers::time::{is_range_time, is_time_periods};
use crate::schema::{Flags, Rule, RuleKind};
use crate::value::Value;
use log::debug;

impl Validator {
    /// Host group name, optionally made of LLD macros.
    pub(super) fn check_host_group_name(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        self.check_name(rule, data, path, parse_host_group_name, Reason::InvalidHostGroupName)
    }

    /// Technical host name, optionally made of LLD macros.
    pub(super) fn check_host_name(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        self.check_name(rule, data, path, parse_host_name, Reason::InvalidHostName)
    }

    fn check_name(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
        parse: fn(&str, bool) -> Option<ParsedName>,
        invalid: Reason,
    ) -> ValidationResult<Value> {
        let text = check_string(&data, true, path)?;
        check_length(rule, text, path)?;

        let required_macro = rule.flags.contains(Flags::REQUIRED_LLD_MACRO);
        let lld_macros = required_macro || rule.flags.contains(Flags::ALLOW_LLD_MACRO);

        let Some(parsed) = parse(text, lld_macros) else {
            return Err(ValidationError::invalid(path, invalid));
        };
        if required_macro && parsed.macros == 0 {
            return Err(ValidationError::invalid(path, Reason::LldMacroRequired));
        }

        Ok(data)
    }

    /// Menu path of a script, `/`-separated with no blank segments.
    pub(super) fn check_script_name(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        let text = check_string(&data, true, path)?;
        check_length(rule, text, path)?;

        if !is_valid_script_path(text) {
            return Err(ValidationError::invalid(path, Reason::EmptyScriptName));
        }

        Ok(data)
    }

    pub(super) fn check_user_macro(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        let text = check_string(&data, true, path)?;
        check_length(rule, text, path)?;

        if !is_user_macro(text) {
            return Err(ValidationError::invalid(path, Reason::UserMacroExpected));
        }

        Ok(data)
    }

    pub(super) fn check_lld_macro(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        let text = check_string(&data, true, path)?;
        check_length(rule, text, path)?;

        if !is_lld_macro(text) {
            return Err(ValidationError::invalid(path, Reason::LldMacroExpected));
        }

        Ok(data)
    }

    pub(super) fn check_time_period(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        let text = check_string(&data, true, path)?;
        check_length(rule, text, path)?;

        if !is_time_periods(text, rule.flags.contains(Flags::ALLOW_USER_MACRO)) {
            return Err(ValidationError::invalid(path, Reason::TimePeriodExpected));
        }

        Ok(data)
    }

    pub(super) fn check_range_time(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        let text = check_string(&data, true, path)?;
        check_length(rule, text, path)?;

        if !is_range_time(text) {
            return Err(ValidationError::invalid(path, Reason::TimeRangeExpected));
        }

        Ok(data)
    }

    /// Regular expression, or a `@name` reference to a global one.
    pub(super) fn check_regex(&self, rule: &Rule, data: Value, path: &str) -> ValidationResult<Value> {
        let text = check_string(&data, rule.flags.contains(Flags::NOT_EMPTY), path)?;
        check_length(rule, text, path)?;

        if text.starts_with('@') {
            return Ok(data);
        }
        if let Err(e) = regex::Regex::new(&format!("({text})")) {
            debug!("Rejected regular expression at {}: {}", path, e);
            return Err(ValidationError::invalid(path, Reason::InvalidRegex));
        }

        Ok(data)
    }

    /// Variable name enclosed in braces, such as `{HOST.NAME}`.
    pub(super) fn check_variable_name(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        let text = check_string(&data, true, path)?;
        check_length(rule, text, path)?;

        let enclosed = text
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .is_some_and(|inner| !inner.is_empty() && !inner.contains(['{', '}']));
        if !enclosed {
            return Err(ValidationError::invalid(path, Reason::MalformedVariableName));
        }

        Ok(data)
    }

    /// Interval such as `30`, `5m` or `-1w`, kept as text.
    ///
    /// The interval must fit in a signed 32-bit number of seconds, and a
    /// numeric `in` list is applied to that number of seconds.
    pub(super) fn check_time_unit(
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
        if (rule.flags.contains(Flags::ALLOW_USER_MACRO) && is_user_macro(text))
            || (rule.flags.contains(Flags::ALLOW_LLD_MACRO) && is_any_lld_macro(text))
        {
            return Ok(data);
        }

        let Some(seconds) = interval_seconds(text) else {
            return Err(ValidationError::invalid(path, Reason::TimeUnitExpected));
        };
        if i32::try_from(seconds).is_err() {
            return Err(ValidationError::invalid(path, Reason::NumberTooLarge));
        }
        check_int_in(rule, seconds, path)?;

        Ok(data)
    }

    /// Absolute URL with an allowed scheme, or a relative link to a page of
    /// the frontend itself.
    pub(super) fn check_url(&self, rule: &Rule, data: Value, path: &str) -> ValidationResult<Value> {
        let text = check_string(&data, rule.flags.contains(Flags::NOT_EMPTY), path)?;
        check_length(rule, text, path)?;

        if text.is_empty()
            || (rule.flags.contains(Flags::ALLOW_USER_MACRO) && contains_user_macro(text))
        {
            return Ok(data);
        }

        let acceptable = match url::Url::parse(text) {
            Ok(url) => self.config().allows_scheme(url.scheme()),
            Err(url::ParseError::RelativeUrlWithoutBase) => is_frontend_page(text),
            Err(_) => false,
        };
        if !acceptable {
            return Err(ValidationError::invalid(path, Reason::UnacceptableUrl));
        }

        Ok(data)
    }
}

/// Port numbers accepted by `port` rules.
const PORT_RANGE: &str = "0:65535";

impl Validator {
    /// Comma-separated integer ranges such as `200,300-399,{$CODES}`.
    ///
    /// Every numeric bound must satisfy the rule's `in` list; macro bounds
    /// are not checked.
    pub(super) fn check_int32_ranges(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
    ) -> ValidationResult<Value> {
        let text = check_string(&data, rule.flags.contains(Flags::NOT_EMPTY), path)?;

        if text.is_empty() {
            return Ok(data);
        }
        check_length(rule, text, path)?;

        let Some(ranges) = parse_int_ranges(text, macro_support(rule.flags)) else {
            return Err(ValidationError::invalid(path, Reason::InvalidRangeExpression));
        };

        for bound in ranges.iter().flatten() {
            let Bound::Number(number) = bound else {
                continue;
            };
            let value = match parse_signed(number) {
                Ok(value) => value,
                Err(NumberError::TooLarge) if number.starts_with('-') => i64::MIN,
                Err(_) => i64::MAX,
            };
            check_int_in(rule, value, path)?;
        }

        Ok(data)
    }

    /// IPv4 or IPv6 address, or a macro standing for one.
    pub(super) fn check_ip(&self, rule: &Rule, data: Value, path: &str) -> ValidationResult<Value> {
        let text = check_string(&data, rule.flags.contains(Flags::NOT_EMPTY), path)?;

        if text.is_empty() {
            return Ok(data);
        }
        check_length(rule, text, path)?;

        if !is_ip(text, macro_support(rule.flags)) {
            return Err(ValidationError::invalid(path, Reason::IpExpected));
        }

        Ok(data)
    }

    /// DNS name, possibly built from macros.
    pub(super) fn check_dns(&self, rule: &Rule, data: Value, path: &str) -> ValidationResult<Value> {
        let text = check_string(&data, rule.flags.contains(Flags::NOT_EMPTY), path)?;

        if text.is_empty() {
            return Ok(data);
        }
        check_length(rule, text, path)?;

        if !is_dns(text, macro_support(rule.flags)) {
            return Err(ValidationError::invalid(path, Reason::DnsExpected));
        }

        Ok(data)
    }

    /// Port number given as a number or a string, normalized to a string.
    pub(super) fn check_port(&self, rule: &Rule, data: Value, path: &str) -> ValidationResult<Value> {
        let data = match data {
            Value::Int(n) => Value::string(n.to_string()),
            Value::Str(_) => data,
            _ => return Err(ValidationError::invalid(path, Reason::NumberExpected)),
        };

        let text = check_string(&data, rule.flags.contains(Flags::NOT_EMPTY), path)?;

        if text.is_empty() {
            return Ok(data);
        }
        check_length(rule, text, path)?;

        let user_macro = rule.flags.contains(Flags::ALLOW_USER_MACRO)
            && (is_user_macro(text) || parse_user_macro_function(text) == Some(text.len()));
        let lld_macro = rule.flags.contains(Flags::ALLOW_LLD_MACRO) && is_any_lld_macro(text);
        if user_macro || lld_macro {
            return Ok(data);
        }

        let port = Rule::new(RuleKind::Int32).allowed(PORT_RANGE);
        match self.check_int32(&port, data, path)? {
            Value::Int(n) => Ok(Value::string(n.to_string())),
            other => Ok(other),
        }
    }
}

/// Macros accepted in place of literal text under the rule's flags.
fn macro_support(flags: Flags) -> MacroSupport {
    MacroSupport {
        user: flags.contains(Flags::ALLOW_USER_MACRO),
        lld: flags.contains(Flags::ALLOW_LLD_MACRO),
        host: flags.contains(Flags::ALLOW_MACRO),
    }
}

/// Relative link such as `zabbix.php?action=dashboard.view`.
fn is_frontend_page(link: &str) -> bool {
    let page = link.split(['?', '#']).next().unwrap_or_default();

    page.strip_suffix(".php").is_some_and(|name| {
        !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'))
    })
}
