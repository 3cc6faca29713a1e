//! Helper configuration store
//!
//! A string-keyed map of JSON-like values. Construction fills in the
//! add-on's path layout; callers may then override single entries or merge
//! whole maps (shallow, incoming values win).

use serde_json::{Map, Value};

use crate::settings::OptionSource;

/// Configuration map type
pub type ConfigMap = Map<String, Value>;

pub const VERSION: &str = "1.0.0";
pub const RELEASE: &str = "pl";

/// Namespace of the add-on's own options and lexicon
pub const NAMESPACE: &str = "gridclasskey";

/// Config key holding the default placeholder prefix
pub const PHS_PREFIX_KEY: &str = "phsPrefix";

/// Config key holding the fallback chunk directory
pub const CHUNKS_PATH_KEY: &str = "chunksPath";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelperConfig {
    values: ConfigMap,
}

impl HelperConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the default path layout, then merge `overrides` over it.
    ///
    /// The add-on root comes from the `gridclasskey.core_path` option
    /// (default `<core_path>components/gridclasskey/`) and its public URL
    /// from `gridclasskey.assets_url` (default
    /// `<assets_url>components/gridclasskey/`). Both options are looked up
    /// in `overrides` before `options`.
    pub fn with_defaults(options: &dyn OptionSource, overrides: ConfigMap) -> Self {
        let core_default = format!("{}components/{}/", options.get_option("core_path", None, ""), NAMESPACE);
        let assets_default = format!("{}components/{}/", options.get_option("assets_url", None, ""), NAMESPACE);

        let base_path = options.get_option(&format!("{}.core_path", NAMESPACE), Some(&overrides), &core_default);
        let assets_url =
            options.get_option(&format!("{}.assets_url", NAMESPACE), Some(&overrides), &assets_default);

        let mut config = Self::new();
        config.set("version", format!("{}-{}", VERSION, RELEASE));
        config.set("basePath", base_path.clone());
        config.set("corePath", base_path.clone());
        config.set("modelPath", format!("{}model/", base_path));
        config.set("processorsPath", format!("{}processors/", base_path));
        config.set(CHUNKS_PATH_KEY, format!("{}elements/chunks/", base_path));
        config.set("templatesPath", format!("{}templates/", base_path));
        config.set("jsUrl", format!("{}js/", assets_url));
        config.set("cssUrl", format!("{}css/", assets_url));
        config.set("assetsUrl", assets_url.clone());
        config.set("connectorUrl", format!("{}connector.php", assets_url));

        config.merge(overrides);
        config
    }

    /// Insert or overwrite one entry
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Shallow merge; incoming values win on key collision
    pub fn merge(&mut self, other: ConfigMap) {
        self.values.extend(other);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value of an entry, if it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &ConfigMap {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use serde_json::json;

    fn settings() -> Settings {
        Settings::new()
            .with("core_path", "/srv/site/core/")
            .with("assets_url", "/assets/")
    }

    #[test]
    fn test_default_layout() {
        let config = HelperConfig::with_defaults(&settings(), ConfigMap::new());
        assert_eq!(config.get_str("version"), Some("1.0.0-pl"));
        assert_eq!(config.get_str("corePath"), Some("/srv/site/core/components/gridclasskey/"));
        assert_eq!(
            config.get_str(CHUNKS_PATH_KEY),
            Some("/srv/site/core/components/gridclasskey/elements/chunks/")
        );
        assert_eq!(config.get_str("connectorUrl"), Some("/assets/components/gridclasskey/connector.php"));
    }

    #[test]
    fn test_core_path_override_from_config() {
        let overrides = json!({ "gridclasskey.core_path": "/dev/gck/" });
        let config = HelperConfig::with_defaults(&settings(), overrides.as_object().cloned().unwrap());
        assert_eq!(config.get_str("modelPath"), Some("/dev/gck/model/"));
        assert_eq!(config.get_str("gridclasskey.core_path"), Some("/dev/gck/"));
    }

    #[test]
    fn test_core_path_override_from_settings() {
        let options = settings().with("gridclasskey.core_path", "/opt/gck/");
        let config = HelperConfig::with_defaults(&options, ConfigMap::new());
        assert_eq!(config.get_str("templatesPath"), Some("/opt/gck/templates/"));
    }

    #[test]
    fn test_merge_overrides_existing() {
        let mut config = HelperConfig::new();
        config.set("a", 1);
        config.set("b", "keep");
        config.merge(json!({ "a": 2, "c": [1, 2] }).as_object().cloned().unwrap());

        assert_eq!(config.get("a"), Some(&json!(2)));
        assert_eq!(config.get_str("b"), Some("keep"));
        assert_eq!(config.get("c"), Some(&json!([1, 2])));
    }
}
