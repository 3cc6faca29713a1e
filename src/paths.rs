//! Path-token substitution for template locators and placeholder values

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::placeholders::Placeholders;
use crate::settings::OptionSource;

static PATH_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\{(core_path|base_path|assets_url|filemanager_path)\}|\[\[\+\+(core_path|base_path)\]\]",
    )
    .expect("valid regex")
});

/// Replace `{core_path}`, `{base_path}`, `{assets_url}`, `{filemanager_path}`,
/// `[[++core_path]]` and `[[++base_path]]` with the matching option value.
///
/// Unset options are replaced by an empty string. Replaced text is not
/// scanned again.
pub fn replace_prop_phs(subject: &str, options: &dyn OptionSource) -> String {
    PATH_TOKENS
        .replace_all(subject, |caps: &Captures| {
            let key = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            options.get_option(key, None, "")
        })
        .into_owned()
}

/// [`replace_prop_phs`] over every string in a nested value
pub fn replace_prop_phs_value(subject: &Value, options: &dyn OptionSource) -> Value {
    crate::tree::map_leaves(subject, &mut |leaf| match leaf {
        Value::String(s) => Value::String(replace_prop_phs(s, options)),
        other => other.clone(),
    })
}

/// [`replace_prop_phs`] over every value of a placeholder map
pub fn replace_prop_phs_map(subject: &Placeholders, options: &dyn OptionSource) -> Placeholders {
    subject
        .iter()
        .map(|(k, v)| (k.clone(), replace_prop_phs(v, options)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use serde_json::json;

    fn settings() -> Settings {
        Settings::new()
            .with("core_path", "/srv/site/core/")
            .with("base_path", "/srv/site/")
            .with("assets_url", "/assets/")
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let out = replace_prop_phs("{core_path}a|{base_path}b|{core_path}c", &settings());
        assert_eq!(out, "/srv/site/core/a|/srv/site/b|/srv/site/core/c");
    }

    #[test]
    fn test_replaces_setting_tags() {
        let out = replace_prop_phs("[[++core_path]]x [[++base_path]]y", &settings());
        assert_eq!(out, "/srv/site/core/x /srv/site/y");
    }

    #[test]
    fn test_unset_option_becomes_empty() {
        assert_eq!(replace_prop_phs("{filemanager_path}img.png", &settings()), "img.png");
    }

    #[test]
    fn test_other_tokens_untouched() {
        assert_eq!(replace_prop_phs("{site_url} [[++site_name]]", &settings()), "{site_url} [[++site_name]]");
    }

    #[test]
    fn test_replaces_through_nested_values() {
        let input = json!({
            "tpl": "{core_path}row.tpl",
            "nested": { "list": ["{base_path}a", 3] }
        });
        assert_eq!(
            replace_prop_phs_value(&input, &settings()),
            json!({
                "tpl": "/srv/site/core/row.tpl",
                "nested": { "list": ["/srv/site/a", 3] }
            })
        );
    }

    #[test]
    fn test_replaced_text_not_rescanned() {
        let options = Settings::new().with("core_path", "{base_path}").with("base_path", "/b/");
        assert_eq!(replace_prop_phs("{core_path}", &options), "{base_path}");
    }
}
