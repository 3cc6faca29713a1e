//! The add-on helper object
//!
//! [`GridClassKey`] is what the add-on's processors hold on to. It carries
//! the configuration store, the placeholder store and the host services,
//! and exposes the template operations on top of them.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::config::{ConfigMap, HelperConfig, CHUNKS_PATH_KEY, NAMESPACE, PHS_PREFIX_KEY};
use crate::error::TemplateError;
use crate::host::Host;
use crate::paths;
use crate::placeholders::{self, PlaceholderStore, Placeholders, DEFAULT_SEPARATOR};
use crate::settings::OptionSource;
use crate::template::{self, TagPass, DEFAULT_MAX_ITERATIONS};

/// Template and placeholder helper for one request
pub struct GridClassKey {
    host: Host,
    config: HelperConfig,
    placeholders: PlaceholderStore,
    error: String,
    output: String,
}

impl GridClassKey {
    /// Create the helper and load the add-on's default lexicon topic.
    ///
    /// `config` is merged over the default path layout (see
    /// [`HelperConfig::with_defaults`]).
    pub fn new(mut host: Host, config: ConfigMap) -> Self {
        let config = HelperConfig::with_defaults(host.settings(), config);

        let topic = format!("{}:default", NAMESPACE);
        if !host.lexicon_mut().load(&topic) {
            debug!(topic = %topic, "lexicon topic not available");
        }
        debug!(version = ?config.get_str("version"), "helper initialised");

        Self {
            host,
            config,
            placeholders: PlaceholderStore::new(),
            error: String::new(),
            output: String::new(),
        }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    // Configuration

    /// Merge configuration for another call on the same helper
    pub fn set_configs(&mut self, config: ConfigMap) {
        self.config.merge(config);
    }

    pub fn set_config(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.config.set(key, value);
    }

    pub fn config(&self) -> &ConfigMap {
        self.config.as_map()
    }

    /// Message slot for operations that only report success
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = message.into();
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn set_output(&mut self, message: impl Into<String>) {
        self.output = message.into();
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    // Placeholders

    /// Sanitize `value` and store it under `prefix + key`.
    ///
    /// Without a prefix the `phsPrefix` config entry is used, if any.
    pub fn set_placeholder(&mut self, key: &str, value: impl Into<Value>, prefix: Option<&str>) {
        let prefix = self.resolve_prefix(prefix);
        let value = placeholders::trim_string(&value.into(), None);
        self.placeholders.insert(format!("{}{}", prefix, key), value);
    }

    /// Sanitize and flatten nested data into the placeholder store.
    ///
    /// Returns the placeholders computed by this call only, or `None` when
    /// `data` is empty (the store is then left untouched).
    pub fn set_placeholders(&mut self, data: &Value, prefix: Option<&str>) -> Option<Placeholders> {
        let is_empty = match data {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => true,
        };
        if is_empty {
            return None;
        }

        let prefix = self.resolve_prefix(prefix);
        let trimmed = placeholders::trim_value(data, None);
        let flat = placeholders::implode_phs(&trimmed, prefix.trim_end_matches('.'), DEFAULT_SEPARATOR);

        self.placeholders.merge(&flat);
        Some(flat)
    }

    pub fn placeholders(&self) -> &Placeholders {
        self.placeholders.as_map()
    }

    pub fn placeholder(&self, key: &str) -> Option<&str> {
        self.placeholders.get(key)
    }

    /// Flatten nested data with a custom parent key and separator
    pub fn implode_phs(&self, data: &Value, key_name: &str, separator: &str) -> Placeholders {
        placeholders::implode_phs(data, key_name, separator)
    }

    pub fn trim_string(&self, value: &Value, charlist: Option<&str>) -> String {
        placeholders::trim_string(value, charlist)
    }

    pub fn trim_array(&self, value: &Value, charlist: Option<&str>) -> Value {
        placeholders::trim_value(value, charlist)
    }

    fn resolve_prefix(&self, prefix: Option<&str>) -> String {
        match prefix {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => self.config.get_str(PHS_PREFIX_KEY).unwrap_or_default().to_string(),
        }
    }

    // Templates

    /// Render a template reference (`@INLINE:`, `@FILE:`, `@CHUNK:` or a
    /// bare chunk name). Failures are returned as diagnostic text.
    pub fn parse_tpl(&self, reference: &str, placeholders: &Placeholders) -> String {
        template::parse_tpl(&self.host, self.chunks_path(), reference, placeholders)
    }

    /// Render inline template text
    pub fn parse_tpl_code(&self, code: &str, placeholders: &Placeholders) -> String {
        template::parse_tpl_code(&self.host, code, placeholders)
    }

    /// Render a template file
    pub fn parse_tpl_file(
        &self,
        path: impl AsRef<Path>,
        placeholders: &Placeholders,
    ) -> Result<String, TemplateError> {
        template::parse_tpl_file(&self.host, path, placeholders)
    }

    /// Run the tag post-processor over rendered content so nested element
    /// tags (uncacheable tags, includes, settings) get resolved.
    ///
    /// The iteration bound is `parser_max_iterations` from `options`, the
    /// settings, or 10. The helper's placeholder store is the placeholder
    /// scope.
    pub fn process_element_tags(&self, content: &str, options: Option<&ConfigMap>) -> String {
        let max_iterations = self
            .host
            .settings()
            .get_option("parser_max_iterations", options, "")
            .trim()
            .parse()
            .unwrap_or(DEFAULT_MAX_ITERATIONS);

        let env = self.host.env();
        let renderer = self.host.renderer();
        let placeholders = self.placeholders.as_map();
        let mut content = content.to_string();

        let pass = TagPass::default()
            .with_process_uncacheable(true)
            .with_max_iterations(max_iterations);
        renderer.process_element_tags(&env, &mut content, placeholders, &pass);

        let pass = pass.with_remove_unprocessed(true);
        renderer.process_element_tags(&env, &mut content, placeholders, &pass);

        content
    }

    /// Replace path tokens (`{core_path}`, `[[++base_path]]`, ...) in a string
    pub fn replace_prop_phs(&self, subject: &str) -> String {
        paths::replace_prop_phs(subject, self.host.settings())
    }

    /// Replace path tokens in every string of a nested value
    pub fn replace_prop_phs_value(&self, subject: &Value) -> Value {
        paths::replace_prop_phs_value(subject, self.host.settings())
    }

    fn chunks_path(&self) -> &str {
        self.config.get_str(CHUNKS_PATH_KEY).unwrap_or_default()
    }
}
