//! Loosely typed input values.
//!
//! API parameters arrive as decoded JSON but may carry strings that are not
//! valid UTF-8, so strings are held as raw bytes until a rule checks them.
//! Lists and maps are both "arrays" to the validator; rules that expect a
//! list re-index maps by their values.

use crate::parsers::number::is_float_literal;
use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// Ordered map of input parameters.
pub type Map = IndexMap<String, Value>;

/// A single input value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Raw bytes; UTF-8 validity is checked by string rules
    Str(Vec<u8>),
    List(Vec<Value>),
    Map(Map),
}

impl Value {
    /// Build a string value from raw bytes, which need not be valid UTF-8.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Str(bytes.into())
    }

    /// Build a string value from text.
    pub fn string(text: impl Into<String>) -> Self {
        Self::Str(text.into().into_bytes())
    }

    /// Build an empty map.
    pub fn map() -> Self {
        Self::Map(Map::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for lists and maps.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    /// True for an empty list or map.
    pub fn is_empty_array(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Number of elements of a list or map.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            Self::List(items) => Some(items.len()),
            Self::Map(map) => Some(map.len()),
            _ => None,
        }
    }

    /// String content if this is a valid UTF-8 string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Str(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Member of a map by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Element values of a list or map in order, dropping map keys.
    pub fn into_values(self) -> Option<Vec<Value>> {
        match self {
            Self::List(items) => Some(items),
            Self::Map(map) => Some(map.into_values().collect()),
            _ => None,
        }
    }

    /// Borrowed element values of a list or map in order.
    pub fn values(&self) -> Option<Vec<&Value>> {
        match self {
            Self::List(items) => Some(items.iter().collect()),
            Self::Map(map) => Some(map.values().collect()),
            _ => None,
        }
    }

    /// Elements of a list or map paired with the number that addresses them
    /// in error paths; see [`element_number`].
    pub fn numbered_values(&self) -> Option<Vec<(String, &Value)>> {
        match self {
            Self::List(items) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(position, item)| ((position + 1).to_string(), item))
                    .collect(),
            ),
            Self::Map(map) => Some(
                map.iter()
                    .enumerate()
                    .map(|(position, (key, item))| (element_number(key, position), item))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Key/value pairs of a list or map. List keys are the zero-based indices.
    pub fn into_entries(self) -> Option<Map> {
        match self {
            Self::List(items) => Some(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, value)| (index.to_string(), value))
                    .collect(),
            ),
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// True if the first element is addressed by an integer key.
    ///
    /// Lists always qualify; maps qualify when their first key is a
    /// canonical integer such as `0` or `-3` (but not `007`).
    pub fn has_integer_first_key(&self) -> bool {
        match self {
            Self::List(_) => true,
            Self::Map(map) => map.keys().next().is_some_and(|key| is_int_key(key)),
            _ => false,
        }
    }

    /// Numeric reading of a scalar, used by range checks on sibling values.
    ///
    /// Strings must be decimal literals as accepted by `float` rules; text
    /// with spaces, `inf` or `NaN` has no numeric reading.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Str(_) => self
                .as_str()
                .filter(|text| is_float_literal(text))
                .and_then(|text| text.parse::<f64>().ok()),
            _ => None,
        }
    }

    /// Text used to compare values for uniqueness and to quote them in
    /// messages: `true` renders as `1`, `false` and null as the empty string.
    pub fn render(&self) -> String {
        match self {
            Self::Null | Self::Bool(false) => String::new(),
            Self::Bool(true) => "1".to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Str(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Self::List(_) | Self::Map(_) => "Array".to_string(),
        }
    }

    /// Short type name for log output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

/// Number addressing an array element in error paths: an integer key plus
/// one, or the 1-based position for any other key.
pub fn element_number(key: &str, position: usize) -> String {
    if is_int_key(key) {
        if let Some(number) = key.parse::<i64>().ok().and_then(|n| n.checked_add(1)) {
            return number.to_string();
        }
    }
    (position + 1).to_string()
}

/// True for keys that name an integer index: `0`, `12`, `-4`.
pub fn is_int_key(key: &str) -> bool {
    let digits = key.strip_prefix('-').unwrap_or(key);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return false;
    }
    if key.starts_with('-') && digits == "0" {
        return false;
    }

    key.parse::<i64>().is_ok()
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                // integers beyond the signed range degrade to floats
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Str(s.into_bytes()),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Float(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(_) => serde_json::Value::String(value.render()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value.into_bytes())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Self::Map(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Str(bytes) => serializer.serialize_str(&String::from_utf8_lossy(bytes)),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str(&self.render()),
        }
    }
}
