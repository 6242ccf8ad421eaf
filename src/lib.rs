//! Declarative validation of API request parameters.
//!
//! Checks nested request payloads against typed rule trees and returns either
//! the normalized payload or a single path-qualified error message.
//!
//! # Core Components
//!
//! - [`Validator`] - Runs the data and uniqueness passes
//! - [`Rule`] - Declarative rule tree, built in code or loaded from JSON
//! - [`Value`] - Loosely typed input value
//! - [`ValidationError`] - The first problem found, with its exact message
//!
//! # Quick Start
//!
//! ```rust
//! use api_input_validator::{Flags, Rule, RuleKind, Value, validate};
//! use serde_json::json;
//!
//! let rule = Rule::objects([
//!     ("name", Rule::new(RuleKind::StringUtf8).flags(Flags::REQUIRED).length(4)),
//! ]);
//!
//! let err = validate(&rule, Value::from(json!([{"name": "host1"}])), "/").unwrap_err();
//! assert_eq!(err.to_string(), "Invalid parameter \"/1/name\": value is too long.");
//! ```

pub mod config;
pub mod error;
pub mod parsers;
pub mod schema;
pub mod validator;
pub mod value;

// Re-export commonly used types for convenience
pub use config::ValidatorConfig;
pub use error::{ErrorKind, Reason, RuleError, RuleResult, ValidationError, ValidationResult};
pub use schema::{Branch, Flag, Flags, Rule, RuleKind};
pub use validator::{Validator, validate, validate_uniqueness};
pub use value::Value;
