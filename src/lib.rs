//! GridClassKey - template and placeholder helper for a CMS manager add-on
//!
//! The helper renders templates from three sources (inline code, files and
//! named chunks) and flattens nested data into prefixed placeholder maps.
//! Host services (settings, lexicon, chunk registry, template engine) are
//! pluggable; a built-in tag engine handles the `[[+placeholder]]` syntax.
//!
//! # Example
//!
//! ```rust
//! use gridclasskey::{ConfigMap, GridClassKey, Host};
//! use serde_json::json;
//!
//! let mut gck = GridClassKey::new(Host::default(), ConfigMap::new());
//! let phs = gck
//!     .set_placeholders(&json!({ "user": { "name": " World " } }), None)
//!     .unwrap();
//!
//! let out = gck.parse_tpl("@INLINE: Hello [[+user.name]]", &phs);
//! assert_eq!(out, "Hello World");
//! ```

pub mod config;
pub mod entities;
pub mod error;
pub mod helper;
pub mod host;
pub mod lexicon;
pub mod paths;
pub mod placeholders;
pub mod settings;
pub mod template;
pub mod tree;

pub use config::{ConfigMap, HelperConfig};
pub use error::{TagSyntaxError, TemplateError};
pub use helper::GridClassKey;
pub use host::Host;
pub use lexicon::Lexicon;
pub use paths::replace_prop_phs;
pub use placeholders::{implode_phs, trim_string, trim_value, PlaceholderStore, Placeholders};
pub use settings::{OptionSource, Settings, SettingsError};
pub use template::{
    Binding, Chunk, ChunkRegistry, InMemoryRegistry, RenderEnv, Renderer, TagParser, TagPass,
};
