//! Core rule type definitions.
//!
//! A rule tree mirrors the shape of the expected input: object rules carry
//! ordered field rules, array rules carry element rules implicitly through
//! their type, and conditional rules pick a concrete rule from sibling values.

use super::allowed::AllowedValues;
use super::flags::Flags;
use crate::value::{Map, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered field rules of an object.
pub type Fields = IndexMap<String, Rule>;

/// A validation rule for one value.
///
/// Rule files use a flat JSON layout where `type` selects the kind and the
/// remaining keys are shared attributes:
///
/// ```json
/// {"type": "string_utf8", "flags": ["required"], "length": 64, "in": "a,b"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(flatten)]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Flags::is_empty")]
    pub flags: Flags,
    /// Maximum length in characters (or element count for `objects`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<AllowedValues>,
    /// Value injected when the field is absent from its object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Sibling field whose value is copied when this field is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_source: Option<String>,
}

/// Rule type together with type-specific attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
    StringUtf8,
    StringsUtf8 {
        #[serde(default)]
        uniq: bool,
    },
    Int32,
    Ints32 {
        #[serde(default)]
        uniq: bool,
    },
    #[serde(rename = "uint64")]
    UInt64,
    #[serde(rename = "uints64")]
    UInts64 {
        #[serde(default)]
        uniq: bool,
    },
    Float,
    Floats {
        #[serde(default)]
        uniq: bool,
    },
    Id,
    Ids {
        #[serde(default)]
        uniq: bool,
    },
    Boolean,
    Flag,
    Color,
    Colors {
        #[serde(default)]
        uniq: bool,
    },
    Object {
        #[serde(default)]
        fields: Fields,
    },
    Objects {
        #[serde(default)]
        fields: Fields,
        /// Field-name tuples whose combined values must be unique
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        uniq: Vec<Vec<String>>,
    },
    Output,
    SortOrder,
    Multiple {
        rules: Vec<Branch>,
    },
    HgName,
    HName,
    Numeric,
    ScriptName,
    UserMacro,
    LldMacro,
    TimePeriod,
    RangeTime,
    Regex,
    HttpPost {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value_length: Option<usize>,
    },
    VariableName,
    TimeUnit,
    Url,
    Psk,
    /// Comma-separated integer ranges such as `200,300-399`
    Int32Ranges,
    Ip,
    Dns,
    Port,
}

/// One alternative of a conditional rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Guard on a sibling field; the branch applies when the guard holds
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Unconditional branch, usually the last one
    #[serde(rename = "else", default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(flatten)]
    pub rule: Rule,
}

/// Guard of a conditional branch: the sibling `field` must hold a number
/// within `in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    #[serde(rename = "in")]
    pub allowed: AllowedValues,
}

impl Rule {
    /// Create a rule of the given kind with no flags or attributes.
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            flags: Flags::NONE,
            length: None,
            allowed: None,
            default: None,
            default_source: None,
        }
    }

    /// Object rule with fields in the given order.
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Rule)>) -> Self {
        Self::new(RuleKind::Object {
            fields: collect_fields(fields),
        })
    }

    /// Array-of-objects rule with fields in the given order.
    pub fn objects<K: Into<String>>(fields: impl IntoIterator<Item = (K, Rule)>) -> Self {
        Self::new(RuleKind::Objects {
            fields: collect_fields(fields),
            uniq: Vec::new(),
        })
    }

    /// Conditional rule resolved against sibling values.
    pub fn multiple(rules: Vec<Branch>) -> Self {
        Self::new(RuleKind::Multiple { rules })
    }

    /// Parse a rule tree from its JSON form.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn allowed(mut self, allowed: impl Into<String>) -> Self {
        self.allowed = Some(AllowedValues::new(allowed));
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn default_source(mut self, field: impl Into<String>) -> Self {
        self.default_source = Some(field.into());
        self
    }

    /// Mark a scalar array rule as requiring unique elements.
    pub fn unique(mut self) -> Self {
        if let Some(uniq) = self.kind.scalar_uniq_mut() {
            *uniq = true;
        }
        self
    }

    /// Add a field-name tuple that must be unique across an object array.
    pub fn unique_by<K: Into<String>>(mut self, key: impl IntoIterator<Item = K>) -> Self {
        if let RuleKind::Objects { uniq, .. } = &mut self.kind {
            uniq.push(key.into_iter().map(Into::into).collect());
        }
        self
    }

    pub fn is_required(&self) -> bool {
        self.flags.contains(Flags::REQUIRED)
    }
}

impl RuleKind {
    /// Rule tag as written in rule files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StringUtf8 => "string_utf8",
            Self::StringsUtf8 { .. } => "strings_utf8",
            Self::Int32 => "int32",
            Self::Ints32 { .. } => "ints32",
            Self::UInt64 => "uint64",
            Self::UInts64 { .. } => "uints64",
            Self::Float => "float",
            Self::Floats { .. } => "floats",
            Self::Id => "id",
            Self::Ids { .. } => "ids",
            Self::Boolean => "boolean",
            Self::Flag => "flag",
            Self::Color => "color",
            Self::Colors { .. } => "colors",
            Self::Object { .. } => "object",
            Self::Objects { .. } => "objects",
            Self::Output => "output",
            Self::SortOrder => "sort_order",
            Self::Multiple { .. } => "multiple",
            Self::HgName => "hg_name",
            Self::HName => "h_name",
            Self::Numeric => "numeric",
            Self::ScriptName => "script_name",
            Self::UserMacro => "user_macro",
            Self::LldMacro => "lld_macro",
            Self::TimePeriod => "time_period",
            Self::RangeTime => "range_time",
            Self::Regex => "regex",
            Self::HttpPost { .. } => "http_post",
            Self::VariableName => "variable_name",
            Self::TimeUnit => "time_unit",
            Self::Url => "url",
            Self::Psk => "psk",
            Self::Int32Ranges => "int32_ranges",
            Self::Ip => "ip",
            Self::Dns => "dns",
            Self::Port => "port",
        }
    }

    fn scalar_uniq_mut(&mut self) -> Option<&mut bool> {
        match self {
            Self::StringsUtf8 { uniq }
            | Self::Ints32 { uniq }
            | Self::UInts64 { uniq }
            | Self::Floats { uniq }
            | Self::Ids { uniq }
            | Self::Colors { uniq } => Some(uniq),
            _ => None,
        }
    }

    /// Whether a scalar array rule demands unique elements.
    pub fn scalar_uniq(&self) -> bool {
        match self {
            Self::StringsUtf8 { uniq }
            | Self::Ints32 { uniq }
            | Self::UInts64 { uniq }
            | Self::Floats { uniq }
            | Self::Ids { uniq }
            | Self::Colors { uniq } => *uniq,
            _ => false,
        }
    }
}

impl From<RuleKind> for Rule {
    fn from(kind: RuleKind) -> Self {
        Self::new(kind)
    }
}

impl Branch {
    /// Branch applying when sibling `field` holds a number within `allowed`.
    pub fn when(field: impl Into<String>, allowed: impl Into<String>, rule: Rule) -> Self {
        Self {
            condition: Some(Condition {
                field: field.into(),
                allowed: AllowedValues::new(allowed),
            }),
            fallback: false,
            rule,
        }
    }

    /// Branch applying unconditionally.
    pub fn otherwise(rule: Rule) -> Self {
        Self {
            condition: None,
            fallback: true,
            rule,
        }
    }

    /// Whether this branch applies given the values of its sibling fields.
    ///
    /// A guard holds only when the sibling is present and reads as a number;
    /// an absent or non-numeric sibling never matches.
    pub fn matches(&self, siblings: &Map) -> bool {
        if self.fallback {
            return true;
        }

        match &self.condition {
            Some(condition) => siblings
                .get(&condition.field)
                .and_then(Value::as_number)
                .is_some_and(|number| condition.allowed.contains_number(number)),
            None => false,
        }
    }
}

fn collect_fields<K: Into<String>>(fields: impl IntoIterator<Item = (K, Rule)>) -> Fields {
    fields
        .into_iter()
        .map(|(name, rule)| (name.into(), rule))
        .collect()
}
