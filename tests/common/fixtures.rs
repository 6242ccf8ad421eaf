//! Rule fixtures.
//!
//! Request-sized rule trees live as JSON files under `tests/fixtures/rules`
//! and are parsed once per test binary. Smaller trees used by several test
//! modules are built in code below.

use api_input_validator::{Branch, Flags, Rule, RuleKind};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Cache for parsed rule files to avoid repeated file I/O
static RULE_CACHE: OnceLock<Mutex<HashMap<String, Rule>>> = OnceLock::new();

/// Load a rule tree from `tests/fixtures/rules/<name>.json` with caching
pub fn load_rule(name: &str) -> Rule {
    let cache = RULE_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().expect("Rule cache poisoned");

    if let Some(cached) = cache.get(name) {
        return cached.clone();
    }

    let fixture_path = format!(
        "{}/tests/fixtures/rules/{}.json",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    let content = std::fs::read_to_string(&fixture_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", fixture_path));
    let rule = Rule::from_json_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse rule fixture {}: {}", fixture_path, e));

    cache.insert(name.to_string(), rule.clone());
    rule
}

/// Tag filter as accepted by read requests: tag, operator and value must
/// be unique together.
pub fn tag_filter_rule() -> Rule {
    Rule::object([(
        "tags",
        Rule::objects([
            (
                "tag",
                Rule::new(RuleKind::StringUtf8).flags(Flags::REQUIRED | Flags::NOT_EMPTY),
            ),
            (
                "operator",
                Rule::new(RuleKind::Int32).allowed("0,2").default_value(2i64),
            ),
            ("value", Rule::new(RuleKind::StringUtf8).default_value("")),
        ])
        .unique_by(["tag", "operator", "value"]),
    )])
}

/// Records whose `value` is typed by their `type` field.
pub fn typed_value_rule(branches: Vec<Branch>) -> Rule {
    Rule::objects([
        (
            "type",
            Rule::new(RuleKind::Int32).flags(Flags::REQUIRED).allowed("1:9"),
        ),
        ("value", Rule::multiple(branches).flags(Flags::REQUIRED)),
    ])
}

/// Value maps with unique ids and names, mappings unique by value.
pub fn valuemap_update_rule() -> Rule {
    let mappings = Rule::objects([
        ("value", Rule::new(RuleKind::StringUtf8).flags(Flags::REQUIRED)),
        (
            "newvalue",
            Rule::new(RuleKind::StringUtf8).flags(Flags::REQUIRED | Flags::NOT_EMPTY),
        ),
    ])
    .flags(Flags::NOT_EMPTY)
    .unique_by(["value"]);

    Rule::objects([
        ("valuemapid", Rule::new(RuleKind::Id).flags(Flags::REQUIRED)),
        ("name", Rule::new(RuleKind::StringUtf8).flags(Flags::NOT_EMPTY).length(64)),
        ("mappings", mappings),
    ])
    .flags(Flags::NORMALIZE)
    .unique_by(["valuemapid"])
    .unique_by(["name"])
}

/// Preprocessing step whose parameters depend on the step type.
pub fn preprocessing_rule() -> Rule {
    Rule::objects([
        (
            "type",
            Rule::new(RuleKind::Int32).flags(Flags::REQUIRED).allowed("1:30"),
        ),
        (
            "params",
            Rule::multiple(vec![
                Branch::when(
                    "type",
                    "1",
                    Rule::new(RuleKind::Float).flags(Flags::ALLOW_USER_MACRO),
                ),
                Branch::when(
                    "type",
                    "5,11",
                    Rule::new(RuleKind::Regex).flags(Flags::NOT_EMPTY).length(255),
                ),
                Branch::when(
                    "type",
                    "25",
                    Rule::new(RuleKind::TimeUnit)
                        .flags(Flags::NOT_EMPTY | Flags::ALLOW_USER_MACRO)
                        .allowed("1:788400000"),
                ),
                Branch::otherwise(Rule::new(RuleKind::StringUtf8).default_value("")),
            ]),
        ),
        ("error_handler", Rule::new(RuleKind::Int32).allowed("0:3").default_value(0i64)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_files_load() {
        for name in ["host.create", "valuemap.create", "problem.get"] {
            let rule = load_rule(name);
            assert!(
                matches!(rule.kind, RuleKind::Object { .. } | RuleKind::Objects { .. }),
                "Unexpected root rule in {}: {:?}",
                name,
                rule.kind
            );
        }
    }

    #[test]
    fn test_cached_rule_is_equal() {
        assert_eq!(load_rule("valuemap.create"), load_rule("valuemap.create"));
    }
}
