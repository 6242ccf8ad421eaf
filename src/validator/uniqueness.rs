//! Uniqueness pass over normalized data.

use super::{Validator, child_path, resolve};
use crate::error::{ValidationError, ValidationResult};
use crate::parsers::macros::trim_user_macro;
use crate::schema::{Fields, Rule, RuleKind};
use crate::value::Value;
use log::warn;
use std::collections::HashSet;

impl Validator {
    /// Reject duplicates in arrays declared unique, anywhere in `data`.
    ///
    /// Expects data that already passed [`Validator::validate_data`]; values
    /// that do not have the shape their rule describes are skipped.
    pub fn validate_uniqueness(&self, rule: &Rule, data: &Value, path: &str) -> ValidationResult<()> {
        match &rule.kind {
            RuleKind::StringsUtf8 { uniq }
            | RuleKind::Ints32 { uniq }
            | RuleKind::UInts64 { uniq }
            | RuleKind::Floats { uniq }
            | RuleKind::Ids { uniq }
            | RuleKind::Colors { uniq } => {
                if *uniq {
                    unique_scalars(data, path)?;
                }
                Ok(())
            }
            RuleKind::Object { fields } => self.object_uniqueness(fields, data, path),
            RuleKind::Objects { fields, uniq } => {
                let Some(objects) = data.numbered_values() else {
                    return Ok(());
                };

                for key in uniq {
                    unique_objects(fields, key, &objects, path)?;
                }
                for (number, object) in objects {
                    self.object_uniqueness(fields, object, &child_path(path, number))?;
                }
                Ok(())
            }
            RuleKind::Multiple { .. } => {
                warn!("Conditional rule used outside of an object at {}", path);
                Err(ValidationError::IncorrectRules)
            }
            _ => Ok(()),
        }
    }

    fn object_uniqueness(&self, fields: &Fields, data: &Value, path: &str) -> ValidationResult<()> {
        let Some(object) = data.as_map() else {
            return Ok(());
        };

        for (name, field_rule) in fields {
            if let Some(value) = object.get(name) {
                let field_rule = resolve(field_rule, object, false)?;
                self.validate_uniqueness(&field_rule, value, &child_path(path, name))?;
            }
        }

        Ok(())
    }
}

fn unique_scalars(data: &Value, path: &str) -> ValidationResult<()> {
    let Some(items) = data.values() else {
        return Ok(());
    };
    let mut seen = HashSet::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let rendered = item.render();
        if seen.contains(&rendered) {
            return Err(ValidationError::duplicate(
                child_path(path, index + 1),
                rendered,
            ));
        }
        seen.insert(rendered);
    }

    Ok(())
}

/// Check one key of an object array. Objects lacking any of the key fields
/// take no part in the comparison.
fn unique_objects(
    fields: &Fields,
    key: &[String],
    objects: &[(String, &Value)],
    path: &str,
) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(objects.len());

    for (number, object) in objects {
        let Some(values) = key
            .iter()
            .map(|name| object.get(name))
            .collect::<Option<Vec<_>>>()
        else {
            continue;
        };

        let compared: Vec<String> = key
            .iter()
            .zip(&values)
            .map(|(name, value)| comparable(fields.get(name), value))
            .collect();

        if !seen.insert(compared) {
            return Err(ValidationError::duplicate_tuple(
                child_path(path, number),
                key.to_vec(),
                values.iter().map(|value| value.render()).collect(),
            ));
        }
    }

    Ok(())
}

/// Form in which a key field is compared. User macros compare by name and
/// context so that quoting differences do not hide duplicates.
fn comparable(rule: Option<&Rule>, value: &Value) -> String {
    let rendered = value.render();
    match rule.map(|rule| &rule.kind) {
        Some(RuleKind::UserMacro) => trim_user_macro(&rendered),
        _ => rendered,
    }
}
