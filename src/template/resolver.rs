//! Template resolution - turns a template reference into rendered text

use std::path::Path;

use tracing::{debug, warn};

use crate::error::TemplateError;
use crate::host::Host;
use crate::paths::{replace_prop_phs, replace_prop_phs_map};
use crate::placeholders::Placeholders;

use super::binding::Binding;
use super::chunk::Chunk;

/// Suffix of chunk files in the fallback chunks directory
pub const CHUNK_FILE_SUFFIX: &str = ".chunk.tpl";

/// Render a template reference, never failing.
///
/// Resolution errors (missing file, missing chunk) come back as their
/// diagnostic text so a page render is never aborted by one template.
pub fn parse_tpl(host: &Host, chunks_path: &str, reference: &str, placeholders: &Placeholders) -> String {
    resolve(host, chunks_path, reference, placeholders).unwrap_or_else(|e| e.to_string())
}

/// Render a template reference, reporting resolution errors.
///
/// This function:
/// 1. Reads the binding marker (`@CODE`/`@INLINE`, `@FILE`, `@CHUNK` or none)
/// 2. Dispatches to inline, file or chunk rendering
/// 3. For chunks missing from the registry, falls back to
///    `chunks_path + lowercase(name) + ".chunk.tpl"`
pub fn resolve(
    host: &Host,
    chunks_path: &str,
    reference: &str,
    placeholders: &Placeholders,
) -> Result<String, TemplateError> {
    let binding = Binding::parse(reference);
    debug!(kind = binding.kind(), "resolving template");

    match binding {
        Binding::Inline(code) => Ok(parse_tpl_code(host, &code, placeholders)),
        Binding::File(path) => {
            let path = replace_prop_phs(&path, host.settings());
            parse_tpl_file(host, &path, placeholders)
        }
        Binding::Chunk(name) => parse_tpl_chunk(host, chunks_path, &name, placeholders),
    }
}

/// Render inline template text. Path tokens in placeholder values are
/// replaced first.
pub fn parse_tpl_code(host: &Host, code: &str, placeholders: &Placeholders) -> String {
    let placeholders = replace_prop_phs_map(placeholders, host.settings());

    let mut chunk = Chunk::inline(code);
    chunk.reset();
    chunk.process(host.renderer(), &host.env(), &placeholders)
}

/// Render a template file
pub fn parse_tpl_file(
    host: &Host,
    path: impl AsRef<Path>,
    placeholders: &Placeholders,
) -> Result<String, TemplateError> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "template file not found");
        return Err(TemplateError::file_not_found(path));
    }

    let content = std::fs::read_to_string(path).map_err(|e| TemplateError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut chunk = Chunk::new(chunk_name_for_file(path), content);
    chunk.reset();
    Ok(chunk.process(host.renderer(), &host.env(), placeholders))
}

/// Render a named chunk from the registry, falling back to the chunks
/// directory when the registry does not know the name.
pub fn parse_tpl_chunk(
    host: &Host,
    chunks_path: &str,
    name: &str,
    placeholders: &Placeholders,
) -> Result<String, TemplateError> {
    if let Some(mut chunk) = host.registry().get_chunk(name) {
        // Registry copies may carry output from an earlier render
        chunk.reset();
        return Ok(chunk.process(host.renderer(), &host.env(), placeholders));
    }

    let file = format!("{}{}{}", chunks_path, name.to_lowercase(), CHUNK_FILE_SUFFIX);
    debug!(chunk = name, file = %file, "chunk not in registry, trying file");
    parse_tpl_file(host, &file, placeholders).map_err(|e| TemplateError::chunk_not_found(name, e))
}

/// Chunk name for a template file: the lowercased file name without its
/// `.tpl` and then `.chunk` suffix.
pub fn chunk_name_for_file(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let name = name.strip_suffix(".tpl").unwrap_or(&name);
    let name = name.strip_suffix(".chunk").unwrap_or(name);
    name.to_string()
}
