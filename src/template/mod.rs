//! Template system
//!
//! Templates are referenced by strings whose leading binding marker picks
//! the source:
//!
//! ```text
//! @INLINE: <li>[[+title]]</li>      inline template text (also @CODE)
//! @FILE: {core_path}tpl/row.tpl     a file, after path-token substitution
//! @CHUNK: rowTpl                    a named chunk (the marker is optional)
//! ```
//!
//! Named chunks come from a [`ChunkRegistry`]; when the registry does not
//! know a name, `<chunksPath><name>.chunk.tpl` is tried instead. Rendering
//! itself is delegated to a [`Renderer`], with [`TagParser`] as the built-in
//! engine.

mod binding;
mod chunk;
mod grammar;
mod lexer;
mod parser;
mod registry;
mod renderer;
mod resolver;

pub use binding::Binding;
pub use chunk::Chunk;
pub use lexer::Token;
pub use grammar::{parse_tag, Tag, TagKind};
pub use parser::TagParser;
pub use registry::{ChunkRegistry, InMemoryRegistry};
pub use renderer::{RenderEnv, Renderer, TagPass, DEFAULT_MAX_ITERATIONS};
pub use resolver::{
    chunk_name_for_file, parse_tpl, parse_tpl_chunk, parse_tpl_code, parse_tpl_file, resolve,
    CHUNK_FILE_SUFFIX,
};
