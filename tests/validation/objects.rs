//! Object validation tests: declared fields, object arrays, defaults,
//! conditional rules and nesting limits.

use super::*;
use api_input_validator::{
    Branch, ErrorKind, Flags, Reason, Rule, RuleKind, ValidationError, ValidatorConfig,
};
use serde_json::json;

#[test]
fn test_minimal_host_is_completed() {
    let rule = load_rule("host.create");
    let host = HostBuilder::new().build();

    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!([host]))),
        json!([{
            "host": "web-01",
            "name": "web-01",
            "status": 0,
            "groups": [{"groupid": "2"}]
        }])
    );
}

#[test]
fn test_full_host_is_normalized() {
    let rule = load_rule("host.create");
    let host = HostBuilder::new_full().with_status("1").build();

    let result = assert_validation_success!(validate_json(&rule, json!([host])));
    assert_eq!(result[0]["status"], json!(1));
    assert_eq!(result[0]["name"], json!("Web server 01"));
    assert_eq!(
        result[0]["macros"],
        json!([
            {"macro": "{$PORT}", "type": 0, "value": "8080"},
            {"macro": "{$PASSWORD}", "type": 1, "value": "s3cr3t"}
        ])
    );
    assert_eq!(result[0]["tags"][0], json!({"tag": "role", "value": "web"}));
}

#[test]
fn test_single_host_object_is_wrapped() {
    let rule = load_rule("host.create");
    let host = HostBuilder::new()
        .with_field("groups", json!({"groupid": 7}))
        .build();

    assert_eq!(
        assert_validation_success!(validate_json(&rule, host)),
        json!([{
            "host": "web-01",
            "name": "web-01",
            "status": 0,
            "groups": [{"groupid": "7"}]
        }])
    );
}

#[test]
fn test_missing_and_unexpected_fields() {
    let rule = load_rule("host.create");

    let without_host = HostBuilder::new().without("host").build();
    assert_error_message!(
        validate_json(&rule, json!([without_host])),
        "Invalid parameter \"/1\": the parameter \"host\" is missing."
    );

    let with_id = HostBuilder::new().with_field("hostid", json!("10")).build();
    assert_error_message!(
        validate_json(&rule, json!([with_id])),
        "Invalid parameter \"/1\": unexpected parameter \"hostid\"."
    );

    let without_groups = HostBuilder::new().without("groups").build();
    assert_error_reason!(
        validate_json(&rule, json!([without_groups])),
        Reason::MissingParameter(_)
    );
}

#[test]
fn test_errors_point_into_nested_records() {
    let rule = load_rule("host.create");

    let host = HostBuilder::new().with_tag("", Some("x")).build();
    assert_error_message!(
        validate_json(&rule, json!([HostBuilder::new().build(), host])),
        "Invalid parameter \"/2/tags/1/tag\": cannot be empty."
    );

    let host = HostBuilder::new().with_groups(&[]).build();
    assert_error_message!(
        validate_json(&rule, json!([host])),
        "Invalid parameter \"/1/groups\": cannot be empty."
    );

    let host = HostBuilder::new().with_host("web/01").build();
    assert_error_message!(
        validate_json(&rule, json!([host])),
        "Invalid parameter \"/1/host\": invalid host name."
    );
}

#[test]
fn test_empty_request_is_rejected() {
    let rule = load_rule("host.create");

    assert_error_message!(
        validate_json(&rule, json!([])),
        "Invalid parameter \"/\": cannot be empty."
    );
    assert_error_message!(
        validate_json(&rule, json!([5])),
        "Invalid parameter \"/1\": an array is expected."
    );
}

#[test]
fn test_objects_length_limit() {
    let rule = Rule::objects([("tag", Rule::new(RuleKind::StringUtf8))]).length(2);

    assert_validation_success!(validate_json(&rule, json!([{}, {}])));
    assert_error_message!(
        validate_json(&rule, json!([{}, {}, {}])),
        "Invalid parameter \"/\": maximum number of array elements is 2."
    );

    let none = Rule::objects([("tag", Rule::new(RuleKind::StringUtf8))]).length(0);
    assert_error_message!(
        validate_json(&none, json!([{"tag": "a"}])),
        "Invalid parameter \"/\": should be empty."
    );
    assert_validation_success!(validate_json(&none, json!([])));
}

#[test]
fn test_allow_unexpected_keeps_unknown_keys() {
    let rule = Rule::objects([("name", Rule::new(RuleKind::StringUtf8))])
        .flags(Flags::ALLOW_UNEXPECTED);

    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!([{"name": "a", "extra": [1]}]))),
        json!([{"name": "a", "extra": [1]}])
    );
}

#[test]
fn test_preserved_keys_name_their_elements() {
    let rule = Rule::objects([("name", Rule::new(RuleKind::StringUtf8).flags(Flags::REQUIRED))])
        .flags(Flags::PRESERVE_KEYS)
        .unique_by(["name"]);

    assert_eq!(
        assert_validation_success!(validate_json(
            &rule,
            json!({"5": {"name": "a"}, "102": {"name": "b"}})
        )),
        json!({"5": {"name": "a"}, "102": {"name": "b"}})
    );
    assert_error_message!(
        validate_json(&rule, json!({"5": {"name": "a"}, "102": {}})),
        "Invalid parameter \"/103\": the parameter \"name\" is missing."
    );
    assert_error_message!(
        validate_json(&rule, json!({"5": {"name": "a"}, "7": {"name": "a"}})),
        "Invalid parameter \"/8\": value (name)=(a) already exists."
    );
    // lists are numbered by position as usual
    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!([{"name": "a"}]))),
        json!([{"name": "a"}])
    );
}

#[test]
fn test_keys_are_dropped_without_preserve_keys() {
    let rule = Rule::objects([("name", Rule::new(RuleKind::StringUtf8))]);

    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!({"3": {"name": "a"}, "9": {}}))),
        json!([{"name": "a"}, {}])
    );
    assert_error_message!(
        validate_json(&rule, json!({"3": {"name": "a"}, "9": {"name": 1}})),
        "Invalid parameter \"/2/name\": a character string is expected."
    );
}

#[test]
fn test_default_source_uses_normalized_sibling() {
    let rule = Rule::object([
        ("hostid", Rule::new(RuleKind::Id)),
        ("templateid", Rule::new(RuleKind::Id).default_source("hostid")),
    ]);

    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!({"hostid": "007"}))),
        json!({"hostid": "7", "templateid": "7"})
    );
    // nothing to copy from
    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!({}))),
        json!({})
    );
}

#[test]
fn test_defaults_are_validated() {
    let rule = Rule::object([(
        "delay",
        Rule::new(RuleKind::Numeric).default_value("0001m"),
    )]);

    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!({}))),
        json!({"delay": "1m"})
    );
}

#[test]
fn test_macro_value_depends_on_type() {
    let rule = load_rule("host.create");

    let host = HostBuilder::new()
        .with_field("macros", json!([{"macro": "{$VAULT}", "type": 2, "value": ""}]))
        .build();
    assert_error_message!(
        validate_json(&rule, json!([host])),
        "Invalid parameter \"/1/macros/1/value\": cannot be empty."
    );

    let host = HostBuilder::new()
        .with_field("macros", json!([{"macro": "{$PLAIN}", "value": ""}]))
        .build();
    assert_validation_success!(validate_json(&rule, json!([host])));

    let host = HostBuilder::new()
        .with_field("macros", json!([{"macro": "{$PLAIN}"}]))
        .build();
    assert_error_message!(
        validate_json(&rule, json!([host])),
        "Invalid parameter \"/1/macros/1\": the parameter \"value\" is missing."
    );
}

#[test]
fn test_preprocessing_parameters() {
    let rule = preprocessing_rule();

    assert_eq!(
        assert_validation_success!(validate_json(
            &rule,
            json!([
                {"type": 1, "params": "{$MULTIPLIER}"},
                {"type": "1", "params": "2.5"},
                {"type": 5, "params": "^(\\d+)$"},
                {"type": 25, "params": "5m"},
                {"type": 12}
            ])
        )),
        json!([
            {"type": 1, "params": "{$MULTIPLIER}", "error_handler": 0},
            {"type": 1, "params": 2.5, "error_handler": 0},
            {"type": 5, "params": "^(\\d+)$", "error_handler": 0},
            {"type": 25, "params": "5m", "error_handler": 0},
            {"type": 12, "params": "", "error_handler": 0}
        ])
    );
}

#[test]
fn test_preprocessing_parameter_errors() {
    let rule = preprocessing_rule();

    assert_error_message!(
        validate_json(&rule, json!([{"type": 11, "params": "("}])),
        "Invalid parameter \"/1/params\": invalid regular expression."
    );
    assert_error_message!(
        validate_json(&rule, json!([{"type": 25, "params": "0"}])),
        "Invalid parameter \"/1/params\": value must be one of 1-788400000."
    );
    assert_error_message!(
        validate_json(&rule, json!([{"type": 1, "params": "x"}])),
        "Invalid parameter \"/1/params\": a floating point value is expected."
    );
}

#[test]
fn test_conditional_without_matching_branch() {
    let rule = typed_value_rule(vec![
        Branch::when("type", "1", Rule::new(RuleKind::Int32)),
        Branch::when("type", "2", Rule::new(RuleKind::Float)),
    ]);

    assert_validation_success!(validate_json(&rule, json!([{"type": 2, "value": 1}])));

    let result = validate_json(&rule, json!([{"type": 3, "value": 1}]));
    assert_eq!(result, Err(ValidationError::IncorrectRules));
    assert_error_kind!(result, ErrorKind::Schema);
}

#[test]
fn test_conditional_sees_normalized_sibling() {
    // "01" is normalized to 1 before the branch guard reads it
    let rule = typed_value_rule(vec![
        Branch::when("type", "1", Rule::new(RuleKind::Int32)),
        Branch::otherwise(Rule::new(RuleKind::StringUtf8)),
    ]);

    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!([{"type": "01", "value": "5"}]))),
        json!([{"type": 1, "value": 5}])
    );
    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!([{"type": "3", "value": "5"}]))),
        json!([{"type": 3, "value": "5"}])
    );
}

fn nested(levels: usize) -> Rule {
    if levels == 0 {
        Rule::new(RuleKind::StringUtf8)
    } else {
        Rule::object([("a", nested(levels - 1))])
    }
}

#[test]
fn test_nesting_limit() {
    let rule = nested(4);
    let data = json!({"a": {"a": {"a": {"a": "x"}}}});

    assert_validation_success!(validate_json(&rule, data.clone()));

    let config = ValidatorConfig {
        max_depth: 2,
        ..ValidatorConfig::default()
    };
    assert_error_message!(
        validate_json_with(config, &rule, data),
        "Invalid parameter \"/a/a/a\": nesting is too deep."
    );
}
