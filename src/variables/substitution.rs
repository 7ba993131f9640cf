//! Placeholder substitution engine.
//!
//! Replaces `{{variableName}}` patterns in template strings with their
//! resolved values. Substitution is a single left-to-right pass: a value that
//! itself contains placeholder-like text is inserted verbatim and never
//! re-expanded, so resolved values cannot trigger further substitution.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// Cached regex pattern for matching `{{variableName}}` with optional
/// whitespace around the name. Compiled once and reused.
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("Failed to compile placeholder regex"));

/// The mapping from variable name to resolved value.
///
/// Produced entirely outside the engine; read-only here. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedVariables {
    values: HashMap<String, String>,
}

impl ResolvedVariables {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Stores a resolved value, replacing any previous value for the name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Looks up the resolved value for a variable name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, String>> for ResolvedVariables {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResolvedVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Errors produced by placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionError {
    /// A placeholder names a variable with no resolved value.
    MissingVariable(String),
}

impl fmt::Display for SubstitutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstitutionError::MissingVariable(name) => {
                write!(f, "no resolved value for variable '{}'", name)
            }
        }
    }
}

impl std::error::Error for SubstitutionError {}

/// Substitutes all `{{variable}}` placeholders in the template.
///
/// Escaped braces (`\{{` and `\}}`) are treated as literal `{{` and `}}` and
/// are never matched as placeholders. Whitespace around the variable name is
/// tolerated (`{{ name }}` equals `{{name}}`).
///
/// A placeholder whose variable has no resolved value fails the whole
/// substitution with [`SubstitutionError::MissingVariable`]; the same policy
/// applies to every templated field of a shortcut.
///
/// # Examples
///
/// ```
/// use shortcut_engine::variables::{substitute, ResolvedVariables};
///
/// let variables: ResolvedVariables = [("host", "api.example.com")].into_iter().collect();
/// let result = substitute("https://{{host}}/users", &variables).unwrap();
/// assert_eq!(result, "https://api.example.com/users");
/// ```
pub fn substitute(
    template: &str,
    variables: &ResolvedVariables,
) -> Result<String, SubstitutionError> {
    // Fast path: no placeholder markers at all
    if !template.contains("{{") {
        return Ok(template.to_string());
    }

    // Swap escaped braces for sentinels so they can't match as placeholders
    let text = template.replace("\\{{", "\u{E000}").replace("\\}}", "\u{E001}");

    let re = &*PLACEHOLDER_REGEX;

    let mut result = String::with_capacity(text.len());
    let mut last_match_end = 0;

    for cap in re.captures_iter(&text) {
        let full_match = cap.get(0).unwrap();
        let name = cap.get(1).unwrap().as_str().trim();

        result.push_str(&text[last_match_end..full_match.start()]);

        let value = variables
            .get(name)
            .ok_or_else(|| SubstitutionError::MissingVariable(name.to_string()))?;

        // Inserted verbatim; the value is never re-scanned for placeholders
        result.push_str(value);

        last_match_end = full_match.end();
    }

    result.push_str(&text[last_match_end..]);

    // Restore escaped braces as literal text
    Ok(result.replace('\u{E000}', "{{").replace('\u{E001}', "}}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_variables() -> ResolvedVariables {
        let mut variables = ResolvedVariables::new();
        variables.set("baseUrl", "https://api.example.com");
        variables.set("apiKey", "secret-key-123");
        variables.set("userId", "12345");
        variables.set("port", "8080");
        variables
    }

    #[test]
    fn test_simple_substitution() {
        let variables = create_test_variables();

        let result = substitute("GET {{baseUrl}}/users", &variables).unwrap();
        assert_eq!(result, "GET https://api.example.com/users");
    }

    #[test]
    fn test_multiple_variables() {
        let variables = create_test_variables();

        let result = substitute("{{baseUrl}}:{{port}}/api?key={{apiKey}}", &variables).unwrap();
        assert_eq!(result, "https://api.example.com:8080/api?key=secret-key-123");
    }

    #[test]
    fn test_multiple_same_variable() {
        let variables = create_test_variables();

        let result = substitute("{{baseUrl}}/users and {{baseUrl}}/posts", &variables).unwrap();
        assert_eq!(
            result,
            "https://api.example.com/users and https://api.example.com/posts"
        );
    }

    #[test]
    fn test_missing_variable() {
        let variables = create_test_variables();

        let result = substitute("GET {{unknownVar}}/users", &variables);
        match result {
            Err(SubstitutionError::MissingVariable(name)) => {
                assert_eq!(name, "unknownVar");
            }
            other => panic!("Expected MissingVariable error, got {:?}", other),
        }
    }

    #[test]
    fn test_no_recursive_substitution() {
        let mut variables = create_test_variables();
        variables.set("payload", "literal {{baseUrl}} text");

        // The substituted value keeps its placeholder-like text verbatim
        let result = substitute("body: {{payload}}", &variables).unwrap();
        assert_eq!(result, "body: literal {{baseUrl}} text");
    }

    #[test]
    fn test_self_referencing_value_does_not_loop() {
        let mut variables = ResolvedVariables::new();
        variables.set("loop", "{{loop}}");

        let result = substitute("{{loop}}", &variables).unwrap();
        assert_eq!(result, "{{loop}}");
    }

    #[test]
    fn test_escaped_braces() {
        let variables = create_test_variables();

        let result = substitute(
            "literal \\{{notAVariable\\}} and real: {{baseUrl}}",
            &variables,
        )
        .unwrap();
        assert_eq!(
            result,
            "literal {{notAVariable}} and real: https://api.example.com"
        );
    }

    #[test]
    fn test_whitespace_around_name() {
        let variables = create_test_variables();

        let result = substitute("GET {{  baseUrl  }}/users", &variables).unwrap();
        assert_eq!(result, "GET https://api.example.com/users");
    }

    #[test]
    fn test_empty_template() {
        let variables = create_test_variables();

        let result = substitute("", &variables).unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn test_no_placeholders() {
        let variables = create_test_variables();

        let result = substitute("GET https://example.com/users", &variables).unwrap();
        assert_eq!(result, "GET https://example.com/users");
    }

    #[test]
    fn test_unclosed_placeholder_left_verbatim() {
        let variables = create_test_variables();

        let result = substitute("GET {{baseUrl}}/users/{{incomplete", &variables).unwrap();
        assert_eq!(result, "GET https://api.example.com/users/{{incomplete");
    }

    #[test]
    fn test_empty_value() {
        let mut variables = ResolvedVariables::new();
        variables.set("empty", "");

        let result = substitute("a{{empty}}b", &variables).unwrap();
        assert_eq!(result, "ab");
    }

    #[test]
    fn test_value_in_json_body() {
        let variables = create_test_variables();

        let template = r#"{"userId": "{{userId}}", "apiKey": "{{apiKey}}"}"#;
        let result = substitute(template, &variables).unwrap();
        assert_eq!(result, r#"{"userId": "12345", "apiKey": "secret-key-123"}"#);
    }

    #[test]
    fn test_from_iterator() {
        let variables: ResolvedVariables =
            [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(variables.get("a"), Some("1"));
        assert_eq!(variables.get("b"), Some("2"));
        assert_eq!(variables.len(), 2);
    }

    proptest! {
        // Every known placeholder occurrence is replaced and no placeholder
        // syntax survives in the output.
        #[test]
        fn prop_all_known_placeholders_replaced(
            names in proptest::collection::hash_set("[a-zA-Z][a-zA-Z0-9_]{0,8}", 1..8),
            value in "[a-zA-Z0-9 ./-]{0,16}",
        ) {
            let mut variables = ResolvedVariables::new();
            let mut template = String::new();
            for name in &names {
                variables.set(name.clone(), value.clone());
                template.push_str(&format!("{{{{{}}}}}/", name));
            }

            let result = substitute(&template, &variables).unwrap();
            prop_assert!(!result.contains("{{"));
            prop_assert!(!result.contains("}}"));
            prop_assert!(result.matches(&value).count() >= names.len());
        }
    }
}
