//! Validation tests module.
//!
//! Tests are grouped by rule family. Every test validates through the public
//! API and checks either the normalized output or the exact message an API
//! client would receive.

pub mod collections;
pub mod objects;
pub mod uniqueness;

// Re-export commonly used test utilities
pub use crate::common::{
    builders::{HostBuilder, ValueMapBuilder},
    fixtures::{
        load_rule, preprocessing_rule, tag_filter_rule, typed_value_rule, valuemap_update_rule,
    },
    validate_json, validate_json_at, validate_json_with,
};

// Re-export assertion macros
pub use crate::{
    assert_error_kind, assert_error_message, assert_error_message_contains, assert_error_reason,
    assert_validation_success,
};
