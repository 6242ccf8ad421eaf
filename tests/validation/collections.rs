//! Array validation tests: scalar arrays, `output`, `sort_order` and
//! `http_post`.

use super::*;
use api_input_validator::{ErrorKind, Flags, Reason, Rule, RuleKind};
use serde_json::json;

#[test]
fn test_scalar_array_elements_are_numbered_from_one() {
    let rule = Rule::object([("groupids", Rule::new(RuleKind::Ids { uniq: false }))]);

    assert_error_message!(
        validate_json(&rule, json!({"groupids": ["1", "2", "x"]})),
        "Invalid parameter \"/groupids/3\": a number is expected."
    );
    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!({"groupids": [1, "02"]}))),
        json!({"groupids": ["1", "2"]})
    );
}

#[test]
fn test_scalar_array_maps_are_reindexed() {
    let rule = Rule::new(RuleKind::StringsUtf8 { uniq: false });

    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!({"5": "a", "x": "b"}))),
        json!(["a", "b"])
    );
}

#[test]
fn test_scalar_array_requires_array_without_normalize() {
    let rule = Rule::new(RuleKind::Ints32 { uniq: false });

    assert_error_message!(
        validate_json(&rule, json!(5)),
        "Invalid parameter \"/\": an array is expected."
    );
    assert_error_kind!(validate_json(&rule, json!("5")), ErrorKind::Structural);
}

#[test]
fn test_normalize_wraps_valid_scalars() {
    let rule = Rule::object([(
        "severities",
        Rule::new(RuleKind::Ints32 { uniq: false })
            .flags(Flags::NORMALIZE)
            .allowed("0:5"),
    )]);

    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!({"severities": "3"}))),
        json!({"severities": [3]})
    );
    // a scalar that is not an element value is reported as a wrong shape
    assert_error_message!(
        validate_json(&rule, json!({"severities": "high"})),
        "Invalid parameter \"/severities\": an array is expected."
    );
    // the allow-list is applied to elements, after wrapping
    assert_error_message!(
        validate_json(&rule, json!({"severities": 7})),
        "Invalid parameter \"/severities/1\": value must be one of 0-5."
    );
}

#[test]
fn test_not_empty_arrays() {
    let rule = Rule::new(RuleKind::Ids { uniq: false }).flags(Flags::NOT_EMPTY);

    assert_error_message!(
        validate_json_at(&rule, json!([]), "/groupids"),
        "Invalid parameter \"/groupids\": cannot be empty."
    );
    assert_validation_success!(validate_json(&rule, json!(["1"])));
}

#[test]
fn test_uints64_and_floats_arrays() {
    let unsigned = Rule::new(RuleKind::UInts64 { uniq: false });
    assert_eq!(
        assert_validation_success!(validate_json(&unsigned, json!(["18446744073709551615", 0]))),
        json!(["18446744073709551615", "0"])
    );

    let floats = Rule::new(RuleKind::Floats { uniq: false });
    assert_eq!(
        assert_validation_success!(validate_json(&floats, json!([1, "2.5"]))),
        json!([1.0, 2.5])
    );
    assert_error_reason!(validate_json(&floats, json!([1, "x"])), Reason::FloatExpected);
}

#[test]
fn test_colors_pass_flags_to_elements() {
    let rule = Rule::new(RuleKind::Colors { uniq: false });
    assert_validation_success!(validate_json(&rule, json!(["FF0000", ""])));

    let required = rule.flags(Flags::NOT_EMPTY);
    assert_error_message!(
        validate_json(&required, json!(["FF0000", ""])),
        "Invalid parameter \"/2\": cannot be empty."
    );
}

#[test]
fn test_output_keyword_and_fields() {
    let rule = load_rule("problem.get");

    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!({"output": "count"})))["output"],
        json!("count")
    );
    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!({"output": ["eventid", "name"]})))["output"],
        json!(["eventid", "name"])
    );
    assert_error_message!(
        validate_json(&rule, json!({"output": "all"})),
        "Invalid parameter \"/output\": value must be one of extend, count."
    );
    assert_error_message!(
        validate_json(&rule, json!({"output": ["name", "hostid"]})),
        "Invalid parameter \"/output/2\": value must be one of eventid, name, severity, clock, acknowledged."
    );
    assert_error_message!(
        validate_json(&rule, json!({"output": ["name", "clock", "name"]})),
        "Invalid parameter \"/output/3\": value (name) already exists."
    );
    assert_error_message!(
        validate_json(&rule, json!({"output": 1})),
        "Invalid parameter \"/output\": an array or a character string is expected."
    );
}

#[test]
fn test_output_without_count() {
    let rule = Rule::new(RuleKind::Output);

    assert_validation_success!(validate_json(&rule, json!("extend")));
    assert_error_message!(
        validate_json(&rule, json!("count")),
        "Invalid parameter \"/\": value must be one of extend."
    );
}

#[test]
fn test_sort_order() {
    let rule = load_rule("problem.get");

    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!({"sortorder": ["DESC", "ASC"]})))["sortorder"],
        json!(["DESC", "ASC"])
    );
    assert_error_message!(
        validate_json(&rule, json!({"sortorder": ["DESC", "down"]})),
        "Invalid parameter \"/sortorder/2\": value must be one of ASC, DESC."
    );
    assert_error_reason!(
        validate_json(&rule, json!({"sortorder": null})),
        Reason::ArrayOrStringExpected
    );
}

#[test]
fn test_http_post_pairs() {
    let rule = Rule::object([(
        "posts",
        Rule::new(RuleKind::HttpPost {
            name_length: Some(8),
            value_length: Some(4),
        })
        .length(16),
    )]);

    assert_validation_success!(validate_json(
        &rule,
        json!({"posts": [{"name": "user", "value": "root"}]})
    ));
    assert_error_message!(
        validate_json(&rule, json!({"posts": [{"name": "", "value": "root"}]})),
        "Invalid parameter \"/posts/1/name\": cannot be empty."
    );
    assert_error_message!(
        validate_json(&rule, json!({"posts": [{"name": "user", "value": "secret"}]})),
        "Invalid parameter \"/posts/1/value\": value is too long."
    );
    assert_error_message!(
        validate_json(&rule, json!({"posts": [{"name": "user"}]})),
        "Invalid parameter \"/posts/1\": the parameter \"value\" is missing."
    );
    assert_error_message!(
        validate_json(&rule, json!({"posts": [{"name": "a", "value": "b", "type": 1}]})),
        "Invalid parameter \"/posts/1\": unexpected parameter \"type\"."
    );
}

#[test]
fn test_http_post_raw_body() {
    let rule = Rule::new(RuleKind::HttpPost {
        name_length: None,
        value_length: None,
    })
    .length(16);

    assert_validation_success!(validate_json(&rule, json!("user=root&x=1")));
    assert_error_reason!(
        validate_json(&rule, json!("user=root&password=secret")),
        Reason::TooLong
    );
    assert_error_reason!(validate_json(&rule, json!(5)), Reason::StringExpected);
}
