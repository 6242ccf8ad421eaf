//! Allow-lists given in a rule's `in` attribute.
//!
//! The same comma-delimited notation serves two purposes. For string types it
//! is a list of literals (`"xml,json"`); a literal comma or backslash is
//! escaped with a backslash. For numeric types each item is either a single
//! number or an inclusive range `from:to` (`"0,60:900"`, `"-100:100"`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedValues(String);

impl AllowedValues {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Literal items, with escapes resolved.
    pub fn literals(&self) -> Vec<String> {
        let mut items = Vec::new();
        let mut current = String::new();
        let mut chars = self.0.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(next @ (',' | '\\')) => current.push(next),
                    Some(next) => {
                        current.push('\\');
                        current.push(next);
                    }
                    None => current.push('\\'),
                },
                ',' => items.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        items.push(current);

        items
    }

    pub fn contains_literal(&self, value: &str) -> bool {
        self.literals().iter().any(|item| item == value)
    }

    /// True if `value` equals one of the numbers or falls within one of the
    /// ranges. Items that are not numbers never match.
    pub fn contains_number(&self, value: f64) -> bool {
        self.0.split(',').any(|item| {
            let (from, to) = item.split_once(':').unwrap_or((item, item));
            match (from.trim().parse::<f64>(), to.trim().parse::<f64>()) {
                (Ok(from), Ok(to)) => from <= value && value <= to,
                _ => false,
            }
        })
    }

    /// Literal list as shown in messages: `xml, json`.
    pub fn describe_literals(&self) -> String {
        self.literals().join(", ")
    }

    /// Numeric list as shown in messages: `0, 60-900`.
    pub fn describe_ranges(&self) -> String {
        self.0.replace(',', ", ").replace(':', "-")
    }
}

impl From<&str> for AllowedValues {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
