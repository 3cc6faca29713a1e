//! The pluggable template engine seam
//!
//! Rendering is owned by the host platform. The helper only needs two
//! things from it: substituting placeholders into a template, and running
//! the tag post-processor over already rendered content. Both are captured
//! by [`Renderer`]; [`TagParser`](super::TagParser) is the built-in engine.

use crate::lexicon::Lexicon;
use crate::placeholders::Placeholders;
use crate::settings::Settings;

use super::registry::ChunkRegistry;

/// Default bound on tag post-processing iterations
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Read access to host services while rendering
#[derive(Clone, Copy)]
pub struct RenderEnv<'a> {
    pub settings: &'a Settings,
    pub registry: &'a dyn ChunkRegistry,
    pub lexicon: &'a Lexicon,
}

impl<'a> RenderEnv<'a> {
    pub fn new(settings: &'a Settings, registry: &'a dyn ChunkRegistry, lexicon: &'a Lexicon) -> Self {
        Self {
            settings,
            registry,
            lexicon,
        }
    }
}

/// A template engine
pub trait Renderer {
    /// Substitute `placeholders` into `source`, honoring bracketed tags.
    fn render(&self, env: &RenderEnv<'_>, source: &str, placeholders: &Placeholders) -> String;

    /// Post-process tags in `content` in place.
    fn process_element_tags(
        &self,
        env: &RenderEnv<'_>,
        content: &mut String,
        placeholders: &Placeholders,
        pass: &TagPass,
    );
}

/// Options for one tag-processing pass
#[derive(Debug, Clone, PartialEq)]
pub struct TagPass {
    /// Opening tag delimiter
    pub open: String,

    /// Closing tag delimiter
    pub close: String,

    /// Whether `!`-marked (uncacheable) tags are processed
    pub process_uncacheable: bool,

    /// Whether tags that cannot be resolved are removed instead of kept
    pub remove_unprocessed: bool,

    /// Upper bound on repeated passes over the content
    pub max_iterations: usize,
}

impl Default for TagPass {
    fn default() -> Self {
        Self {
            open: "[[".to_string(),
            close: "]]".to_string(),
            process_uncacheable: false,
            remove_unprocessed: false,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl TagPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag delimiters
    pub fn with_delimiters(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.open = open.into();
        self.close = close.into();
        self
    }

    /// Set whether uncacheable tags are processed
    pub fn with_process_uncacheable(mut self, process: bool) -> Self {
        self.process_uncacheable = process;
        self
    }

    /// Set whether unresolved tags are removed
    pub fn with_remove_unprocessed(mut self, remove: bool) -> Self {
        self.remove_unprocessed = remove;
        self
    }

    /// Set the iteration bound
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pass() {
        let pass = TagPass::default();
        assert_eq!(pass.open, "[[");
        assert_eq!(pass.close, "]]");
        assert!(!pass.process_uncacheable);
        assert!(!pass.remove_unprocessed);
        assert_eq!(pass.max_iterations, 10);
    }

    #[test]
    fn test_builder_pattern() {
        let pass = TagPass::new()
            .with_delimiters("{{", "}}")
            .with_process_uncacheable(true)
            .with_remove_unprocessed(true)
            .with_max_iterations(3);

        assert_eq!(pass.open, "{{");
        assert_eq!(pass.close, "}}");
        assert!(pass.process_uncacheable);
        assert!(pass.remove_unprocessed);
        assert_eq!(pass.max_iterations, 3);
    }
}
