//! Placeholder store and value sanitizer
//!
//! Placeholders are flat `key -> text` pairs. Nested input data is first
//! sanitized leaf by leaf ([`trim_value`]) and then flattened into dotted
//! keys ([`implode_phs`]) before it is merged into a [`PlaceholderStore`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::entities;
use crate::tree;

/// Flat placeholder map, ordered by key
pub type Placeholders = BTreeMap<String, String>;

/// Characters stripped by [`trim_string`] when no charlist is given
pub const DEFAULT_TRIM_CHARS: &str = " \t\n\r\0\x0B";

/// Default separator between parent and child keys
pub const DEFAULT_SEPARATOR: &str = ".";

static EDITOR_ARTIFACTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(&Acirc;|&nbsp;)+").expect("valid regex"));

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+^(\r\n|\r|\n)").expect("valid regex"));

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t\n\r\x0B\x0C]*[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?[ \t\n\r\x0B\x0C]*$")
        .expect("valid regex")
});

/// Accumulated placeholders of one helper instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceholderStore {
    values: Placeholders,
}

impl PlaceholderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Merge a batch in; incoming keys win.
    pub fn merge(&mut self, other: &Placeholders) {
        self.values
            .extend(other.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn as_map(&self) -> &Placeholders {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Sanitize a single value into placeholder text.
///
/// Empty, non-numeric values become `""`. Everything else is entity-encoded,
/// stripped of editor `&nbsp;`/`&Acirc;` runs, trimmed (by `charlist`, or
/// [`DEFAULT_TRIM_CHARS`]) and decoded back to plain text. Line breaks inside
/// the value are kept.
pub fn trim_string(value: &Value, charlist: Option<&str>) -> String {
    if is_empty(value) && !is_numeric(value) {
        return String::new();
    }

    let encoded = entities::encode(&value_to_text(value));
    let stripped = EDITOR_ARTIFACTS.replace_all(&encoded, "");

    let charlist = charlist.unwrap_or(DEFAULT_TRIM_CHARS);
    let trimmed = stripped.trim_matches(|c: char| charlist.contains(c));

    let collapsed = BLANK_LINES.replace_all(trimmed, " ");

    entities::decode(&collapsed)
}

/// Sanitize every leaf of a nested value, keeping its shape
pub fn trim_value(value: &Value, charlist: Option<&str>) -> Value {
    tree::map_leaves(value, &mut |leaf| Value::String(trim_string(leaf, charlist)))
}

/// Flatten nested placeholder data into dotted keys.
///
/// `key_name` prefixes every key (joined with `separator`); pass `""` for
/// none. Leaves are converted to their text form.
pub fn implode_phs(value: &Value, key_name: &str, separator: &str) -> Placeholders {
    tree::flatten(value, key_name, separator)
        .into_iter()
        .map(|(k, v)| (k, value_to_text(&v)))
        .collect()
}

/// Text form of a leaf as the template layer sees it
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => NUMERIC.is_match(s),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_trim_empty_string() {
        assert_eq!(trim_string(&json!(""), None), "");
        assert_eq!(trim_string(&Value::Null, None), "");
        assert_eq!(trim_string(&json!(false), None), "");
    }

    #[test]
    fn test_trim_keeps_numeric_zero() {
        assert_eq!(trim_string(&json!("0"), None), "0");
        assert_eq!(trim_string(&json!(0), None), "0");
    }

    #[test]
    fn test_trim_numeric_string_unchanged() {
        assert_eq!(trim_string(&json!("12.50"), None), "12.50");
        assert_eq!(trim_string(&json!("-3e4"), None), "-3e4");
    }

    #[test]
    fn test_trim_strips_whitespace_and_nbsp() {
        assert_eq!(trim_string(&json!("  \u{a0}Hello\u{a0}\u{a0} "), None), "Hello");
        assert_eq!(trim_string(&json!("\u{c2}\u{a0}title"), None), "title");
    }

    #[test]
    fn test_trim_round_trips_markup() {
        assert_eq!(
            trim_string(&json!(" <b>Tom & Jerry</b> "), None),
            "<b>Tom & Jerry</b>"
        );
    }

    #[test]
    fn test_trim_custom_charlist() {
        assert_eq!(trim_string(&json!("--slug--"), Some("-")), "slug");
    }

    #[test]
    fn test_trim_keeps_paragraph_breaks() {
        assert_eq!(trim_string(&json!("Para one.\n\nPara two."), None), "Para one.\n\nPara two.");
        assert_eq!(trim_string(&json!("first \r\n\r\nsecond\n"), None), "first \r\n\r\nsecond");
        assert_eq!(trim_string(&json!("first\nsecond"), None), "first\nsecond");
    }

    #[test]
    fn test_trim_scalars_to_text() {
        assert_eq!(trim_string(&json!(true), None), "1");
        assert_eq!(trim_string(&json!(42), None), "42");
    }

    #[test]
    fn test_trim_value_recurses() {
        let input = json!({ "a": " x ", "b": [" y", { "c": "\u{a0}z" }], "d": null });
        assert_eq!(
            trim_value(&input, None),
            json!({ "a": "x", "b": ["y", { "c": "z" }], "d": "" })
        );
    }

    #[test]
    fn test_implode_phs_converts_leaves() {
        let phs = implode_phs(&json!({ "a": { "b": 1, "c": { "d": 2 } } }), "", DEFAULT_SEPARATOR);
        let expected: Placeholders =
            [("a.b".to_string(), "1".to_string()), ("a.c.d".to_string(), "2".to_string())].into();
        assert_eq!(phs, expected);
    }

    #[test]
    fn test_implode_phs_with_prefix() {
        let phs = implode_phs(&json!({ "id": 5 }), "gck", DEFAULT_SEPARATOR);
        assert_eq!(phs.get("gck.id").map(String::as_str), Some("5"));
    }

    #[test]
    fn test_store_merge_overwrites() {
        let mut store = PlaceholderStore::new();
        store.insert("a", "1");
        store.merge(&[("a".to_string(), "2".to_string()), ("b".to_string(), "3".to_string())].into());
        assert_eq!(store.get("a"), Some("2"));
        assert_eq!(store.len(), 2);
    }
}
