//! Host platform services bundled for the helper

use crate::lexicon::Lexicon;
use crate::settings::Settings;
use crate::template::{ChunkRegistry, InMemoryRegistry, RenderEnv, Renderer, TagParser};

/// The services a template helper borrows from its host: system settings,
/// lexicon, chunk registry and template engine.
pub struct Host {
    settings: Settings,
    lexicon: Lexicon,
    registry: Box<dyn ChunkRegistry>,
    renderer: Box<dyn Renderer>,
}

impl Default for Host {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Host {
    /// Host with an empty chunk registry and the built-in [`TagParser`]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            lexicon: Lexicon::new(),
            registry: Box::new(InMemoryRegistry::new()),
            renderer: Box::new(TagParser::new()),
        }
    }

    /// Set the lexicon
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Set the chunk registry
    pub fn with_registry(mut self, registry: impl ChunkRegistry + 'static) -> Self {
        self.registry = Box::new(registry);
        self
    }

    /// Replace the template engine
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn lexicon_mut(&mut self) -> &mut Lexicon {
        &mut self.lexicon
    }

    pub fn registry(&self) -> &dyn ChunkRegistry {
        self.registry.as_ref()
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    /// Borrow the services a renderer may consult
    pub fn env(&self) -> RenderEnv<'_> {
        RenderEnv::new(&self.settings, self.registry.as_ref(), &self.lexicon)
    }
}
