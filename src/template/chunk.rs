//! Chunks: named text templates

use crate::placeholders::Placeholders;

use super::renderer::{RenderEnv, Renderer};

/// A text template unit, either registered by name or built on the fly
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    name: String,
    content: String,
    cacheable: bool,
    processed: bool,
    cached_output: Option<String>,
}

impl Chunk {
    /// Create a cacheable, unprocessed chunk
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            cacheable: true,
            processed: false,
            cached_output: None,
        }
    }

    /// Anonymous chunk around inline template text
    pub fn inline(content: impl Into<String>) -> Self {
        Self::new("", content)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    pub fn set_cacheable(&mut self, cacheable: bool) {
        self.cacheable = cacheable;
        if !cacheable {
            self.cached_output = None;
        }
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn cached_output(&self) -> Option<&str> {
        self.cached_output.as_deref()
    }

    /// Seed the chunk with output from an earlier render
    pub fn with_cached_output(mut self, output: impl Into<String>) -> Self {
        self.cached_output = Some(output.into());
        self.processed = true;
        self
    }

    /// Render the chunk against `placeholders`.
    ///
    /// A processed, cacheable chunk returns its cached output without
    /// rendering again.
    pub fn process(
        &mut self,
        renderer: &dyn Renderer,
        env: &RenderEnv<'_>,
        placeholders: &Placeholders,
    ) -> String {
        if self.processed && self.cacheable {
            if let Some(output) = &self.cached_output {
                return output.clone();
            }
        }

        let output = renderer.render(env, &self.content, placeholders);
        self.processed = true;
        if self.cacheable {
            self.cached_output = Some(output.clone());
        }
        output
    }

    /// Drop cached state so the next [`Chunk::process`] renders fresh
    pub fn reset(&mut self) {
        self.set_cacheable(false);
        self.processed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::settings::Settings;
    use crate::template::{InMemoryRegistry, TagParser};

    fn phs(pairs: &[(&str, &str)]) -> Placeholders {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_process_renders_content() {
        let (settings, registry, lexicon) = (Settings::new(), InMemoryRegistry::new(), Lexicon::new());
        let env = RenderEnv::new(&settings, &registry, &lexicon);

        let mut chunk = Chunk::new("greeting", "Hi [[+who]]");
        let out = chunk.process(&TagParser::new(), &env, &phs(&[("who", "there")]));
        assert_eq!(out, "Hi there");
        assert!(chunk.is_processed());
        assert_eq!(chunk.cached_output(), Some("Hi there"));
    }

    #[test]
    fn test_cacheable_chunk_reuses_output() {
        let (settings, registry, lexicon) = (Settings::new(), InMemoryRegistry::new(), Lexicon::new());
        let env = RenderEnv::new(&settings, &registry, &lexicon);

        let mut chunk = Chunk::new("greeting", "Hi [[+who]]").with_cached_output("stale");
        assert_eq!(chunk.process(&TagParser::new(), &env, &phs(&[("who", "a")])), "stale");

        chunk.reset();
        assert_eq!(chunk.process(&TagParser::new(), &env, &phs(&[("who", "a")])), "Hi a");
        assert_eq!(chunk.cached_output(), None);
    }
}
