//! Chunk registry for looking up named templates

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::TemplateError;

use super::chunk::Chunk;

/// File suffixes recognised when loading chunks from a directory, longest first
const CHUNK_SUFFIXES: &[&str] = &[".chunk.tpl", ".chunk.html", ".tpl", ".html"];

/// Lookup of reusable named chunks
pub trait ChunkRegistry {
    /// Fetch a chunk by name. The registry hands out an owned copy that the
    /// caller may reset and render.
    fn get_chunk(&self, name: &str) -> Option<Chunk>;
}

/// Registry backed by a map, optionally filled from a directory
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    chunks: HashMap<String, Chunk>,
}

impl InMemoryRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every chunk file in `dir` (non-recursive).
    ///
    /// The chunk name is the file name with its chunk suffix removed, so
    /// `rowTpl.chunk.tpl` registers as `rowTpl`.
    pub fn from_dir(dir: &Path) -> Result<Self, TemplateError> {
        let read_err = |e: std::io::Error| TemplateError::FileRead {
            path: dir.to_path_buf(),
            message: e.to_string(),
        };

        let mut registry = Self::new();

        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(read_err)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        entries.sort();

        for path in entries {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(name) = CHUNK_SUFFIXES
                .iter()
                .find_map(|suffix| file_name.strip_suffix(suffix))
            else {
                continue;
            };

            let content = std::fs::read_to_string(&path).map_err(|e| TemplateError::FileRead {
                path: path.clone(),
                message: e.to_string(),
            })?;
            registry.register(Chunk::new(name, content))?;
        }

        Ok(registry)
    }

    /// Register a chunk
    pub fn register(&mut self, chunk: Chunk) -> Result<(), TemplateError> {
        if self.chunks.contains_key(chunk.name()) {
            return Err(TemplateError::Duplicate {
                name: chunk.name().to_string(),
            });
        }
        self.chunks.insert(chunk.name().to_string(), chunk);
        Ok(())
    }

    /// Register a chunk from a name and its content
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) -> Result<(), TemplateError> {
        self.register(Chunk::new(name, content))
    }

    /// Builder form of [`InMemoryRegistry::insert`]; a repeated name replaces the earlier chunk.
    pub fn with_chunk(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        let chunk = Chunk::new(name, content);
        self.chunks.insert(chunk.name().to_string(), chunk);
        self
    }

    /// Check if a chunk exists
    pub fn contains(&self, name: &str) -> bool {
        self.chunks.contains_key(name)
    }

    /// Get all chunk names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.chunks.keys().map(|s| s.as_str())
    }
}

impl ChunkRegistry for InMemoryRegistry {
    fn get_chunk(&self, name: &str) -> Option<Chunk> {
        self.chunks.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = InMemoryRegistry::new();
        registry.insert("rowTpl", "<tr>[[+id]]</tr>").expect("Should register");

        assert!(registry.contains("rowTpl"));
        let chunk = registry.get_chunk("rowTpl").expect("Should exist");
        assert_eq!(chunk.content(), "<tr>[[+id]]</tr>");
        assert!(registry.get_chunk("rowtpl").is_none());
    }

    #[test]
    fn test_registry_duplicate_error() {
        let mut registry = InMemoryRegistry::new();
        registry.insert("a", "x").expect("First register should succeed");
        let result = registry.insert("a", "y");
        assert!(matches!(result, Err(TemplateError::Duplicate { .. })));
    }

    #[test]
    fn test_from_dir_strips_suffixes() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("rowTpl.chunk.tpl"), "row").unwrap();
        std::fs::write(dir.path().join("wrapper.html"), "wrap").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip").unwrap();

        let registry = InMemoryRegistry::from_dir(dir.path()).expect("Should load");
        let mut names: Vec<_> = registry.names().collect();
        names.sort();
        assert_eq!(names, vec!["rowTpl", "wrapper"]);
    }

    #[test]
    fn test_from_missing_dir() {
        let result = InMemoryRegistry::from_dir(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(TemplateError::FileRead { .. })));
    }
}
