//! Uniqueness pass tests.
//!
//! Duplicates are judged on normalized values, so `"01"` and `1` collide
//! for identifiers, and injected defaults take part in the comparison.

use super::*;
use api_input_validator::{ErrorKind, Flags, Rule, RuleKind, Value, validate_uniqueness};
use serde_json::json;

#[test]
fn test_unique_ids_compare_normalized_values() {
    let rule = Rule::object([("groupids", Rule::new(RuleKind::Ids { uniq: true }))]);

    assert_error_message!(
        validate_json(&rule, json!({"groupids": ["1", 2, "01"]})),
        "Invalid parameter \"/groupids/3\": value (1) already exists."
    );
    assert_error_kind!(
        validate_json(&rule, json!({"groupids": [7, 7]})),
        ErrorKind::Uniqueness
    );
}

#[test]
fn test_non_unique_arrays_keep_duplicates() {
    let rule = Rule::new(RuleKind::Ints32 { uniq: false });

    assert_eq!(
        assert_validation_success!(validate_json(&rule, json!([5, "5"]))),
        json!([5, 5])
    );
}

#[test]
fn test_data_errors_come_before_duplicates() {
    let rule = Rule::new(RuleKind::Ids { uniq: true });

    assert_error_message!(
        validate_json(&rule, json!([1, 1, "x"])),
        "Invalid parameter \"/3\": a number is expected."
    );
}

#[test]
fn test_valuemap_duplicates() {
    let rule = valuemap_update_rule();

    let result = validate_json(
        &rule,
        json!([
            ValueMapBuilder::new(4, "APC Battery Replacement Status").build(),
            ValueMapBuilder::new(5, "APC Battery Status").build(),
            ValueMapBuilder::new("04", "APC Battery Status").build()
        ]),
    );
    assert_error_message!(
        result,
        "Invalid parameter \"/3\": value (valuemapid)=(4) already exists."
    );

    let result = validate_json(
        &rule,
        json!([
            ValueMapBuilder::new(4, "APC Battery Status").build(),
            ValueMapBuilder::new(5, "APC Battery Status").build()
        ]),
    );
    assert_error_message!(
        result,
        "Invalid parameter \"/2\": value (name)=(APC Battery Status) already exists."
    );
}

#[test]
fn test_duplicate_mapping_in_nested_array() {
    let rule = valuemap_update_rule();
    let valuemap = ValueMapBuilder::new(4, "APC Battery Status")
        .with_mapping("1", "unknown")
        .with_mapping("2", "notInstalled")
        .with_mapping("3", "ok")
        .with_mapping("1", "lowCapacity")
        .build();

    assert_error_message!(
        validate_json(&rule, json!([valuemap])),
        "Invalid parameter \"/1/mappings/4\": value (value)=(1) already exists."
    );
}

#[test]
fn test_composite_key_from_rule_file() {
    let rule = load_rule("valuemap.create");
    let first = json!({
        "hostid": "10084",
        "name": "Service state",
        "mappings": [{"value": "0", "newvalue": "Down"}]
    });
    let second = json!({
        "hostid": 10084,
        "name": "Service state",
        "mappings": [{"value": "1", "newvalue": "Up"}]
    });
    let other_host = json!({
        "hostid": 10085,
        "name": "Service state",
        "mappings": [{"value": "1", "newvalue": "Up"}]
    });

    assert_validation_success!(validate_json(&rule, json!([first, other_host])));
    assert_error_message!(
        validate_json(&rule, json!([first, other_host, second])),
        "Invalid parameter \"/3\": value (hostid, name)=(10084, Service state) already exists."
    );
}

#[test]
fn test_injected_defaults_collide() {
    let rule = load_rule("problem.get");

    assert_error_message!(
        validate_json(
            &rule,
            json!({"tags": [{"tag": "service"}, {"tag": "service", "operator": "0", "value": ""}]})
        ),
        "Invalid parameter \"/tags/2\": value (tag, operator, value)=(service, 0, ) already exists."
    );
    assert_validation_success!(validate_json(
        &rule,
        json!({"tags": [{"tag": "service"}, {"tag": "service", "operator": 1}]})
    ));
}

#[test]
fn test_user_macros_compare_by_name_and_context() {
    let rule = load_rule("host.create");
    let host = HostBuilder::new()
        .with_macro("{$PORT:\"ssh\"}", "22")
        .with_macro("{$PORT:ssh}", "2222")
        .build();

    assert_error_message!(
        validate_json(&rule, json!([host])),
        "Invalid parameter \"/1/macros/2\": value (macro)=({$PORT:ssh}) already exists."
    );

    let host = HostBuilder::new()
        .with_macro("{$PORT:ssh}", "22")
        .with_macro("{$PORT:http}", "80")
        .build();
    assert_validation_success!(validate_json(&rule, json!([host])));
}

#[test]
fn test_duplicate_hosts_by_visible_name() {
    let rule = load_rule("host.create");
    let first = HostBuilder::new().with_host("web-01").build();
    let second = HostBuilder::new()
        .with_host("web-02")
        .with_name("web-01")
        .build();

    assert_error_message!(
        validate_json(&rule, json!([first, second])),
        "Invalid parameter \"/2\": value (name)=(web-01) already exists."
    );
}

#[test]
fn test_elements_missing_key_fields_are_skipped() {
    let rule = Rule::objects([
        ("id", Rule::new(RuleKind::Id)),
        ("name", Rule::new(RuleKind::StringUtf8)),
    ])
    .unique_by(["name"]);

    assert_validation_success!(validate_json(
        &rule,
        json!([{"id": 1}, {"id": 2}, {"name": "a"}])
    ));
}

#[test]
fn test_uniqueness_pass_alone() {
    let rule = Rule::objects([
        ("hostid", Rule::new(RuleKind::Id).flags(Flags::REQUIRED)),
        ("name", Rule::new(RuleKind::StringUtf8)),
    ])
    .unique_by(["hostid", "name"]);

    let mut data = Vec::new();
    for index in 0..20 {
        data.push(json!({"hostid": format!("{}", index % 10), "name": format!("app{}", index)}));
    }
    data.push(json!({"hostid": "1", "name": "app1"}));
    let data = Value::from(serde_json::Value::Array(data));

    assert_eq!(
        validate_uniqueness(&rule, &data, "/")
            .unwrap_err()
            .to_string(),
        "Invalid parameter \"/21\": value (hostid, name)=(1, app1) already exists."
    );
}
