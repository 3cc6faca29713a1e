//! Host option source
//!
//! System settings such as `core_path` or `assets_url` live in the host
//! platform. This module models them as a flat key/value store that can be
//! loaded from a TOML site file, and exposes the host's option-resolution
//! rule through [`OptionSource::get_option`].

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::lexicon::Lexicon;

/// Errors that can occur when loading or parsing a site file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read site file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse site TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Anything that can resolve a named option
pub trait OptionSource {
    /// Look up a single option
    fn option(&self, key: &str) -> Option<String>;

    /// Resolve an option the way the host does: `overrides` first, then
    /// this source, then `default`.
    fn get_option(&self, key: &str, overrides: Option<&Map<String, Value>>, default: &str) -> String {
        overrides
            .and_then(|map| map.get(key))
            .and_then(value_to_option)
            .or_else(|| self.option(key))
            .unwrap_or_else(|| default.to_string())
    }
}

/// System settings of the host site
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, Value>,
}

/// TOML structure for deserializing a site file
#[derive(Deserialize)]
struct TomlSite {
    #[serde(default)]
    settings: BTreeMap<String, Value>,
    #[serde(default)]
    lexicon: BTreeMap<String, BTreeMap<String, String>>,
}

impl Settings {
    /// Create an empty settings store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings and lexicon topics from a TOML site file
    pub fn site_from_file(path: &Path) -> Result<(Self, Lexicon), SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::site_from_str(&content)
    }

    /// Parse a TOML site: the `[settings]` table and `[lexicon.<topic>]` tables
    pub fn site_from_str(content: &str) -> Result<(Self, Lexicon), SettingsError> {
        let parsed: TomlSite = toml::from_str(content)?;

        let mut lexicon = Lexicon::new();
        for (topic, entries) in parsed.lexicon {
            lexicon.add_topic(&topic, entries);
        }

        Ok((
            Self {
                values: parsed.settings.into_iter().collect(),
            },
            lexicon,
        ))
    }

    /// Set a single setting
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder form of [`Settings::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Raw value of a setting
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

impl OptionSource for Settings {
    fn option(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(value_to_option)
    }
}

/// Render a scalar value as an option string. Containers and null have no
/// option form.
fn value_to_option(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_settings_table() {
        let toml_str = r#"
[settings]
core_path = "/srv/site/core/"
parser_max_iterations = 5

[lexicon.gridclasskey]
title = "Grid"
"#;
        let (settings, mut lexicon) = Settings::site_from_str(toml_str).expect("Should parse");
        assert_eq!(settings.option("core_path"), Some("/srv/site/core/".to_string()));
        assert_eq!(settings.option("parser_max_iterations"), Some("5".to_string()));
        assert_eq!(settings.option("missing"), None);

        assert!(lexicon.load("gridclasskey"));
        assert_eq!(lexicon.get("title"), Some("Grid"));
    }

    #[test]
    fn test_parse_without_settings_table() {
        let (settings, _) = Settings::site_from_str("").expect("Should parse");
        assert_eq!(settings.option("core_path"), None);
    }

    #[test]
    fn test_get_option_precedence() {
        let settings = Settings::new().with("core_path", "/from/settings/");
        let overrides = json!({ "core_path": "/from/overrides/" });

        assert_eq!(
            settings.get_option("core_path", overrides.as_object(), "/default/"),
            "/from/overrides/"
        );
        assert_eq!(settings.get_option("core_path", None, "/default/"), "/from/settings/");
        assert_eq!(settings.get_option("base_path", None, "/default/"), "/default/");
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = Settings::site_from_str("[settings\ncore_path = ");
        assert!(matches!(result, Err(SettingsError::ParseError(_))));
    }
}
