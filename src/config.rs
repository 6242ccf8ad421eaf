//! Validator configuration.

use serde::{Deserialize, Serialize};

/// Settings that tune a [`Validator`](crate::Validator).
///
/// Can be loaded from JSON; missing keys take their defaults.
///
/// ```rust
/// use api_input_validator::ValidatorConfig;
///
/// let config: ValidatorConfig = serde_json::from_str(r#"{"max-depth": 16}"#).unwrap();
/// assert_eq!(config.max_depth, 16);
/// assert!(config.url_schemes.iter().any(|s| s == "https"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ValidatorConfig {
    /// Deepest level of the rule tree applied before validation stops
    /// with a structural error. Values below a rule that does not describe
    /// them (kept by `ALLOW_UNEXPECTED`) are not inspected and do not count.
    pub max_depth: usize,

    /// URI schemes accepted by `url` rules for absolute URLs.
    pub url_schemes: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            url_schemes: ["http", "https", "ftp", "file", "mailto", "tel", "ssh"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ValidatorConfig {
    /// Whether `scheme` is in the allow-list, ignoring case.
    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.url_schemes
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(scheme))
    }
}
