//! Rule definitions for API input validation.
//!
//! This module provides the declarative rule tree consumed by the
//! [`Validator`](crate::Validator).
//!
//! # Key Types
//!
//! - [`Rule`] - One rule: kind, flags, and shared attributes
//! - [`RuleKind`] - The rule type and its type-specific attributes
//! - [`Flags`] - Behavior flags such as `REQUIRED` or `NOT_EMPTY`
//! - [`Branch`] - One alternative of a conditional (`multiple`) rule
//!
//! # Examples
//!
//! ```rust
//! use api_input_validator::schema::{Flags, Rule, RuleKind};
//!
//! let rule = Rule::object([
//!     ("hostid", Rule::new(RuleKind::Id).flags(Flags::REQUIRED)),
//!     ("name", Rule::new(RuleKind::StringUtf8).length(128)),
//! ]);
//!
//! let same = Rule::from_json_str(r#"{
//!     "type": "object",
//!     "fields": {
//!         "hostid": {"type": "id", "flags": ["required"]},
//!         "name": {"type": "string_utf8", "length": 128}
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(rule, same);
//! ```

pub mod allowed;
pub mod flags;
pub mod types;


// Re-export the main types for convenience
pub use allowed::AllowedValues;
pub use flags::{Flag, Flags};
pub use types::{Branch, Condition, Fields, Rule, RuleKind};
