//! Error types for API input validation.
//!
//! Every failure surfaces as a single [`ValidationError`] whose `Display` form is
//! the user-facing message, for example
//! `Invalid parameter "/1/name": value is too long.` The reason part of that
//! message is carried separately as a [`Reason`] so callers can match on it
//! without parsing text.

use std::fmt;

/// Main error type for input validation.
///
/// Validation stops at the first problem found, so a failed run yields exactly
/// one of these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A value at `path` violates its rule
    #[error("Invalid parameter \"{path}\": {reason}.")]
    InvalidParameter { path: String, reason: Reason },

    /// The rule tree itself is defective, for example a conditional rule
    /// with no matching branch
    #[error("Incorrect validation rules.")]
    IncorrectRules,
}

/// The reason part of an invalid parameter message.
///
/// Display strings are the exact sentence fragments shown to API clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Reason {
    #[error("a character string is expected")]
    StringExpected,
    #[error("invalid byte sequence in UTF-8")]
    InvalidUtf8,
    #[error("cannot be empty")]
    Empty,
    #[error("value is too long")]
    TooLong,
    #[error("value must be one of {0}")]
    NotOneOf(String),
    #[error("value must be within the range of {0}")]
    OutOfRange(String),
    #[error("an integer is expected")]
    IntegerExpected,
    #[error("an unsigned integer is expected")]
    UnsignedIntegerExpected,
    #[error("a number is expected")]
    NumberExpected,
    #[error("a number is too large")]
    NumberTooLarge,
    #[error("a floating point value is expected")]
    FloatExpected,
    #[error("a boolean is expected")]
    BooleanExpected,
    #[error("an array is expected")]
    ArrayExpected,
    #[error("an array or a character string is expected")]
    ArrayOrStringExpected,
    #[error("unexpected parameter \"{0}\"")]
    UnexpectedParameter(String),
    #[error("the parameter \"{0}\" is missing")]
    MissingParameter(String),
    #[error("should be empty")]
    ShouldBeEmpty,
    #[error("maximum number of array elements is {0}")]
    TooManyElements(usize),
    #[error("value {0} already exists")]
    AlreadyExists(DuplicateKey),
    #[error("a hexadecimal color code (6 symbols) is expected")]
    ColorExpected,
    #[error("invalid host group name")]
    InvalidHostGroupName,
    #[error("invalid host name")]
    InvalidHostName,
    #[error("must contain at least one low-level discovery macro")]
    LldMacroRequired,
    #[error("directory or script name cannot be empty")]
    EmptyScriptName,
    #[error("a user macro is expected")]
    UserMacroExpected,
    #[error("a low-level discovery macro is expected")]
    LldMacroExpected,
    #[error("a time period is expected")]
    TimePeriodExpected,
    #[error("a time range is expected")]
    TimeRangeExpected,
    #[error("a time unit is expected")]
    TimeUnitExpected,
    #[error("invalid regular expression")]
    InvalidRegex,
    #[error("is not enclosed in {{}} or is malformed")]
    MalformedVariableName,
    #[error("unacceptable URL")]
    UnacceptableUrl,
    #[error("minimum length is {0} characters")]
    TooShort(usize),
    #[error("an even number of hexadecimal characters is expected")]
    HexPairsExpected,
    #[error("invalid range expression")]
    InvalidRangeExpression,
    #[error("an IP address is expected")]
    IpExpected,
    #[error("a DNS name is expected")]
    DnsExpected,
    #[error("nesting is too deep")]
    NestingTooDeep,
}

/// Rendered key of a duplicate element.
///
/// Scalar arrays render as `(value)`, object arrays as
/// `(field1, field2)=(value1, value2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateKey {
    Scalar(String),
    Tuple {
        fields: Vec<String>,
        values: Vec<String>,
    },
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "({value})"),
            Self::Tuple { fields, values } => {
                write!(f, "({})=({})", fields.join(", "), values.join(", "))
            }
        }
    }
}

/// Broad category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong shape: scalar where an array is expected, unexpected keys
    Structural,
    /// Required parameter absent or empty value where content is required
    Presence,
    /// Value present with the right shape but outside its domain
    Domain,
    /// Duplicate element in an array declared unique
    Uniqueness,
    /// Defective rule tree; a programming error
    Schema,
}

/// Errors raised while loading rule or data files.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid JSON for the expected structure
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// Convenience methods for creating common errors
impl ValidationError {
    /// Create an invalid parameter error
    pub fn invalid(path: impl Into<String>, reason: Reason) -> Self {
        Self::InvalidParameter {
            path: path.into(),
            reason,
        }
    }

    /// Create a missing parameter error, reported at the enclosing object
    pub fn missing(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::invalid(path, Reason::MissingParameter(field.into()))
    }

    /// Create an unexpected parameter error, reported at the enclosing object
    pub fn unexpected(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::invalid(path, Reason::UnexpectedParameter(field.into()))
    }

    /// Create a duplicate scalar error
    pub fn duplicate(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::invalid(
            path,
            Reason::AlreadyExists(DuplicateKey::Scalar(value.into())),
        )
    }

    /// Create a duplicate object error for the given key fields
    pub fn duplicate_tuple(path: impl Into<String>, fields: Vec<String>, values: Vec<String>) -> Self {
        Self::invalid(
            path,
            Reason::AlreadyExists(DuplicateKey::Tuple { fields, values }),
        )
    }

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter { path, .. } => Some(path),
            Self::IncorrectRules => None,
        }
    }

    /// Reason of an invalid parameter error
    pub fn reason(&self) -> Option<&Reason> {
        match self {
            Self::InvalidParameter { reason, .. } => Some(reason),
            Self::IncorrectRules => None,
        }
    }

    /// Category of this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IncorrectRules => ErrorKind::Schema,
            Self::InvalidParameter { reason, .. } => reason.kind(),
        }
    }
}

impl Reason {
    /// Category this reason belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StringExpected
            | Self::ArrayExpected
            | Self::ArrayOrStringExpected
            | Self::UnexpectedParameter(_)
            | Self::ShouldBeEmpty
            | Self::TooManyElements(_)
            | Self::NestingTooDeep => ErrorKind::Structural,
            Self::Empty | Self::MissingParameter(_) | Self::EmptyScriptName => ErrorKind::Presence,
            Self::AlreadyExists(_) => ErrorKind::Uniqueness,
            _ => ErrorKind::Domain,
        }
    }
}

// Result type aliases for convenience
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type RuleResult<T> = Result<T, RuleError>;
