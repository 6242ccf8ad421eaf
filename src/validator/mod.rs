//! Validation of input values against rule trees.
//!
//! Validation runs in two passes. The data pass walks the rule tree and the
//! input together, checking every value and producing the normalized result:
//! integers parsed from strings, identifiers canonicalized, defaults
//! injected, loose arrays re-indexed. The uniqueness pass then walks the
//! normalized result and rejects duplicate elements in arrays declared
//! unique. Both passes stop at the first problem found.
//!
//! # Examples
//!
//! ```rust
//! use api_input_validator::{Flags, Rule, RuleKind, Validator, Value};
//! use serde_json::json;
//!
//! let rule = Rule::object([
//!     ("hostid", Rule::new(RuleKind::Id).flags(Flags::REQUIRED)),
//!     ("status", Rule::new(RuleKind::Int32).allowed("0,1").default_value(0i64)),
//! ]);
//!
//! let validator = Validator::new();
//! let data = validator
//!     .validate(&rule, Value::from(json!({"hostid": "0010"})), "/")
//!     .unwrap();
//!
//! assert_eq!(data, Value::from(json!({"hostid": "10", "status": 0})));
//! ```

mod collections;
mod formats;
mod scalars;
mod uniqueness;


use crate::config::ValidatorConfig;
use crate::error::{Reason, ValidationError, ValidationResult};
use crate::schema::{Flags, Rule, RuleKind};
use crate::value::{Map, Value};
use log::{trace, warn};
use std::borrow::Cow;

/// Checks values against rule trees.
///
/// A validator holds no state besides its configuration, so one instance can
/// be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// Create a validator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with a custom configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate `data` against `rule` and return the normalized value.
    ///
    /// `path` names the value in error messages; top-level parameters are
    /// usually validated at `/`.
    pub fn validate(&self, rule: &Rule, data: Value, path: &str) -> ValidationResult<Value> {
        let data = self.validate_data(rule, data, path)?;
        self.validate_uniqueness(rule, &data, path)?;
        Ok(data)
    }

    /// Run the data pass only.
    pub fn validate_data(&self, rule: &Rule, data: Value, path: &str) -> ValidationResult<Value> {
        self.check(rule, data, path, 0)
    }

    /// Check one value against one rule, recursing into nested rules.
    pub(crate) fn check(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
        depth: usize,
    ) -> ValidationResult<Value> {
        if rule.flags.contains(Flags::ALLOW_NULL) && data.is_null() {
            return Ok(data);
        }
        self.enter(path, depth)?;

        trace!(
            "Checking {} at {} against {}",
            data.type_name(),
            path,
            rule.kind.name()
        );

        match &rule.kind {
            RuleKind::StringUtf8 => self.check_string_utf8(rule, data, path),
            RuleKind::Int32 => self.check_int32(rule, data, path),
            RuleKind::UInt64 => self.check_uint64(data, path),
            RuleKind::Float => self.check_float(rule, data, path),
            RuleKind::Id => self.check_id(rule, data, path),
            RuleKind::Boolean => self.check_boolean(data, path),
            RuleKind::Flag => Ok(self.check_flag(data, path)),
            RuleKind::Color => self.check_color(rule, data, path),
            RuleKind::Numeric => self.check_numeric(rule, data, path),
            RuleKind::Psk => self.check_psk(rule, data, path),

            RuleKind::StringsUtf8 { .. }
            | RuleKind::Ints32 { .. }
            | RuleKind::UInts64 { .. }
            | RuleKind::Floats { .. }
            | RuleKind::Ids { .. }
            | RuleKind::Colors { .. } => self.check_scalar_array(rule, data, path, depth),
            RuleKind::Object { fields } => {
                self.check_object(fields, rule.flags, data, path, depth)
            }
            RuleKind::Objects { fields, .. } => self.check_objects(rule, fields, data, path, depth),
            RuleKind::Output => self.check_output(rule, data, path, depth),
            RuleKind::SortOrder => self.check_sort_order(data, path, depth),
            RuleKind::HttpPost {
                name_length,
                value_length,
            } => self.check_http_post(rule, *name_length, *value_length, data, path, depth),

            RuleKind::HgName => self.check_host_group_name(rule, data, path),
            RuleKind::HName => self.check_host_name(rule, data, path),
            RuleKind::ScriptName => self.check_script_name(rule, data, path),
            RuleKind::UserMacro => self.check_user_macro(rule, data, path),
            RuleKind::LldMacro => self.check_lld_macro(rule, data, path),
            RuleKind::TimePeriod => self.check_time_period(rule, data, path),
            RuleKind::RangeTime => self.check_range_time(rule, data, path),
            RuleKind::Regex => self.check_regex(rule, data, path),
            RuleKind::VariableName => self.check_variable_name(rule, data, path),
            RuleKind::TimeUnit => self.check_time_unit(rule, data, path),
            RuleKind::Url => self.check_url(rule, data, path),
            RuleKind::Int32Ranges => self.check_int32_ranges(rule, data, path),
            RuleKind::Ip => self.check_ip(rule, data, path),
            RuleKind::Dns => self.check_dns(rule, data, path),
            RuleKind::Port => self.check_port(rule, data, path),

            // conditional rules are only meaningful as object fields
            RuleKind::Multiple { .. } => {
                warn!("Conditional rule used outside of an object at {}", path);
                Err(ValidationError::IncorrectRules)
            }
        }
    }

    /// Refuse to descend past the configured nesting limit.
    ///
    /// Recursion follows the rule tree, so this bounds how deep a rule tree
    /// may be applied. Input nested deeper than its rule never recurses.
    fn enter(&self, path: &str, depth: usize) -> ValidationResult<()> {
        if depth > self.config.max_depth {
            return Err(ValidationError::invalid(path, Reason::NestingTooDeep));
        }
        Ok(())
    }
}

/// Path of a child value: `/` + `name` at the root, `path/name` below it.
pub(crate) fn child_path(path: &str, segment: impl std::fmt::Display) -> String {
    if path == "/" {
        format!("/{segment}")
    } else {
        format!("{path}/{segment}")
    }
}

/// Pick the concrete rule for a field, following conditional branches
/// against the sibling values of the enclosing object.
///
/// With `inherit` set, the chosen branch takes over the field's `REQUIRED`
/// flag and its `default` and `default_source` unless it declares its own.
pub(crate) fn resolve<'r>(
    rule: &'r Rule,
    siblings: &Map,
    inherit: bool,
) -> ValidationResult<Cow<'r, Rule>> {
    let mut current = Cow::Borrowed(rule);

    while let RuleKind::Multiple { rules } = &current.kind {
        let Some(branch) = rules.iter().find(|branch| branch.matches(siblings)) else {
            warn!("No branch of a conditional rule matches the input");
            return Err(ValidationError::IncorrectRules);
        };

        let mut next = branch.rule.clone();
        if inherit {
            next.flags |= current.flags.intersect(Flags::REQUIRED);
            if next.default.is_none() {
                next.default = current.default.clone();
            }
            if next.default_source.is_none() {
                next.default_source = current.default_source.clone();
            }
        }
        current = Cow::Owned(next);
    }

    Ok(current)
}

/// Validate `data` against `rule` with the default configuration.
pub fn validate(rule: &Rule, data: Value, path: &str) -> ValidationResult<Value> {
    Validator::new().validate(rule, data, path)
}

/// Run the uniqueness pass with the default configuration.
pub fn validate_uniqueness(rule: &Rule, data: &Value, path: &str) -> ValidationResult<()> {
    Validator::new().validate_uniqueness(rule, data, path)
}
