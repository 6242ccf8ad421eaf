//! Grammars for domain-specific string formats.
//!
//! These parsers only recognize text; turning a failed parse into a
//! user-facing error is left to the validator.

pub mod macros;
pub mod names;
pub mod network;
pub mod number;
pub mod time;
