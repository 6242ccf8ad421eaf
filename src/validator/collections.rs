//! Checks for objects, arrays and the composite types built from them.

use super::{Validator, child_path, resolve};
use crate::error::{Reason, ValidationError, ValidationResult};
use crate::schema::{Fields, Flags, Rule, RuleKind};
use crate::value::{Map, Value, element_number};
use log::debug;

/// Sort directions accepted by `sort_order` rules.
const SORT_DIRECTIONS: &str = "ASC,DESC";

impl Validator {
    /// Arrays of scalars: `strings_utf8`, `ints32`, `uint64s`, `floats`,
    /// `ids` and `colors`.
    ///
    /// With `NORMALIZE`, a bare value that would pass as an element is
    /// wrapped into a one-element array first. Elements are re-indexed and
    /// checked at `path/1`, `path/2`, ...
    pub(super) fn check_scalar_array(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
        depth: usize,
    ) -> ValidationResult<Value> {
        let (element, single) = element_rules(rule);

        let data = if rule.flags.contains(Flags::NORMALIZE) && !data.is_array() {
            match self.check(&single, data.clone(), path, depth) {
                Ok(normalized) => Value::List(vec![normalized]),
                Err(_) => data,
            }
        } else {
            data
        };

        let Some(items) = data.into_values() else {
            return Err(ValidationError::invalid(path, Reason::ArrayExpected));
        };
        if rule.flags.contains(Flags::NOT_EMPTY) && items.is_empty() {
            return Err(ValidationError::invalid(path, Reason::Empty));
        }

        self.check_elements(&element, items, path, depth)
    }

    /// Check every element against one rule, addressing them from 1.
    fn check_elements(
        &self,
        element: &Rule,
        items: Vec<Value>,
        path: &str,
        depth: usize,
    ) -> ValidationResult<Value> {
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.check(element, item, &child_path(path, index + 1), depth + 1))
            .collect::<ValidationResult<Vec<_>>>()
            .map(Value::List)
    }

    /// Object with declared fields.
    ///
    /// Unknown keys are rejected unless `ALLOW_UNEXPECTED` is set. Fields are
    /// then processed in declaration order, so a conditional field sees the
    /// already normalized values of the fields declared before it.
    pub(super) fn check_object(
        &self,
        fields: &Fields,
        flags: Flags,
        data: Value,
        path: &str,
        depth: usize,
    ) -> ValidationResult<Value> {
        let Some(mut object) = data.into_entries() else {
            return Err(ValidationError::invalid(path, Reason::ArrayExpected));
        };

        if !flags.contains(Flags::ALLOW_UNEXPECTED) {
            if let Some(name) = object.keys().find(|name| !fields.contains_key(name.as_str())) {
                return Err(ValidationError::unexpected(path, name.as_str()));
            }
        }

        for (name, field_rule) in fields {
            let field_rule = resolve(field_rule, &object, true)?;

            if !object.contains_key(name) {
                if let Some(default) = &field_rule.default {
                    debug!("Using default value for {}", child_path(path, name));
                    object.insert(name.clone(), default.clone());
                } else if let Some(source) = &field_rule.default_source {
                    if let Some(value) = object.get(source).cloned() {
                        debug!(
                            "Copying {} into {}",
                            child_path(path, source),
                            child_path(path, name)
                        );
                        object.insert(name.clone(), value);
                    }
                }
            }

            match object.get_mut(name) {
                Some(value) => {
                    let taken = std::mem::take(value);
                    *value = self.check(&field_rule, taken, &child_path(path, name), depth + 1)?;
                }
                None if field_rule.is_required() => {
                    return Err(ValidationError::missing(path, name.as_str()));
                }
                None => {}
            }
        }

        Ok(Value::Map(object))
    }

    /// Array of objects sharing one set of field rules.
    pub(super) fn check_objects(
        &self,
        rule: &Rule,
        fields: &Fields,
        data: Value,
        path: &str,
        depth: usize,
    ) -> ValidationResult<Value> {
        let Some(count) = data.array_len() else {
            return Err(ValidationError::invalid(path, Reason::ArrayExpected));
        };

        if rule.flags.contains(Flags::NOT_EMPTY) && count == 0 {
            return Err(ValidationError::invalid(path, Reason::Empty));
        }
        if let Some(max) = rule.length {
            if count > max {
                let reason = if max == 0 {
                    Reason::ShouldBeEmpty
                } else {
                    Reason::TooManyElements(max)
                };
                return Err(ValidationError::invalid(path, reason));
            }
        }

        // a single object given where a list is expected
        let data = if rule.flags.contains(Flags::NORMALIZE)
            && count > 0
            && !data.has_integer_first_key()
        {
            Value::List(vec![data])
        } else {
            data
        };

        let element_flags = rule.flags.intersect(Flags::ALLOW_UNEXPECTED);

        match data {
            // keyed input keeps its keys, and each key names its element
            Value::Map(map) if rule.flags.contains(Flags::PRESERVE_KEYS) => map
                .into_iter()
                .enumerate()
                .map(|(position, (key, item))| {
                    let item_path = child_path(path, element_number(&key, position));
                    self.check_object(fields, element_flags, item, &item_path, depth + 1)
                        .map(|item| (key, item))
                })
                .collect::<ValidationResult<Map>>()
                .map(Value::Map),
            data => data
                .into_values()
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    let item_path = child_path(path, index + 1);
                    self.check_object(fields, element_flags, item, &item_path, depth + 1)
                })
                .collect::<ValidationResult<Vec<_>>>()
                .map(Value::List),
        }
    }

    /// `output` parameter of read requests: `extend`, `count` where allowed,
    /// or a list of distinct field names.
    pub(super) fn check_output(
        &self,
        rule: &Rule,
        data: Value,
        path: &str,
        depth: usize,
    ) -> ValidationResult<Value> {
        match data {
            Value::List(_) | Value::Map(_) => {
                let mut fields = Rule::new(RuleKind::StringsUtf8 { uniq: true });
                fields.allowed = rule.allowed.clone();

                let data = self.check(&fields, data, path, depth)?;
                self.validate_uniqueness(&fields, &data, path)?;
                Ok(data)
            }
            Value::Str(_) => {
                let allowed = if rule.flags.contains(Flags::ALLOW_COUNT) {
                    "extend,count"
                } else {
                    "extend"
                };
                let keyword = Rule::new(RuleKind::StringUtf8).allowed(allowed);
                self.check(&keyword, data, path, depth)
            }
            _ => Err(ValidationError::invalid(path, Reason::ArrayOrStringExpected)),
        }
    }

    /// `ASC` or `DESC`, alone or as a list.
    pub(super) fn check_sort_order(
        &self,
        data: Value,
        path: &str,
        depth: usize,
    ) -> ValidationResult<Value> {
        let direction = Rule::new(RuleKind::StringUtf8).allowed(SORT_DIRECTIONS);

        match data {
            Value::Str(_) => self.check(&direction, data, path, depth),
            Value::List(_) | Value::Map(_) => {
                let items = data.into_values().unwrap_or_default();
                self.check_elements(&direction, items, path, depth)
            }
            _ => Err(ValidationError::invalid(path, Reason::ArrayOrStringExpected)),
        }
    }

    /// HTTP POST body: either raw text or a list of name/value pairs.
    pub(super) fn check_http_post(
        &self,
        rule: &Rule,
        name_length: Option<usize>,
        value_length: Option<usize>,
        data: Value,
        path: &str,
        depth: usize,
    ) -> ValidationResult<Value> {
        if data.is_array() {
            let mut name = Rule::new(RuleKind::StringUtf8).flags(Flags::REQUIRED | Flags::NOT_EMPTY);
            name.length = name_length;
            let mut value = Rule::new(RuleKind::StringUtf8).flags(Flags::REQUIRED);
            value.length = value_length;

            let pairs = Rule::objects([("name", name), ("value", value)]);
            return self.check(&pairs, data, path, depth);
        }

        let mut raw = Rule::new(RuleKind::StringUtf8);
        raw.length = rule.length;
        self.check(&raw, data, path, depth)
    }
}

/// Rule applied to each element of a scalar array, and the looser rule used
/// to decide whether a bare value may be wrapped under `NORMALIZE`.
fn element_rules(rule: &Rule) -> (Rule, Rule) {
    match &rule.kind {
        RuleKind::StringsUtf8 { .. } => {
            let mut element = Rule::new(RuleKind::StringUtf8);
            element.allowed = rule.allowed.clone();
            (element, Rule::new(RuleKind::StringUtf8))
        }
        RuleKind::Ints32 { .. } => {
            let mut element = Rule::new(RuleKind::Int32);
            element.allowed = rule.allowed.clone();
            (element, Rule::new(RuleKind::Int32))
        }
        RuleKind::UInts64 { .. } => (Rule::new(RuleKind::UInt64), Rule::new(RuleKind::UInt64)),
        RuleKind::Floats { .. } => (Rule::new(RuleKind::Float), Rule::new(RuleKind::Float)),
        RuleKind::Ids { .. } => (Rule::new(RuleKind::Id), Rule::new(RuleKind::Id)),
        // colors pass the array's own flags down to each element
        RuleKind::Colors { .. } => (
            Rule::new(RuleKind::Color).flags(rule.flags),
            Rule::new(RuleKind::StringUtf8),
        ),
        _ => (rule.clone(), rule.clone()),
    }
}
