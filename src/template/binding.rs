//! Template references and their binding markers

/// Where a template comes from, decided by the reference's leading marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// `@CODE` / `@INLINE`: the rest is the template text
    Inline(String),
    /// `@FILE`: the rest is a path (may hold path tokens)
    File(String),
    /// `@CHUNK` or no marker: the rest is a chunk name
    Chunk(String),
}

impl Binding {
    /// Split a reference like `@FILE: {core_path}row.tpl` into its binding.
    ///
    /// Markers match case-insensitively. After the marker, leading `:` and
    /// surrounding whitespace are removed.
    pub fn parse(reference: &str) -> Self {
        if let Some(rest) = strip_marker(reference, "@CODE").or_else(|| strip_marker(reference, "@INLINE")) {
            Binding::Inline(clean(rest))
        } else if let Some(rest) = strip_marker(reference, "@FILE") {
            Binding::File(clean(rest))
        } else {
            let rest = strip_marker(reference, "@CHUNK").unwrap_or(reference);
            Binding::Chunk(clean(rest))
        }
    }

    /// Short name of the binding kind, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Binding::Inline(_) => "inline",
            Binding::File(_) => "file",
            Binding::Chunk(_) => "chunk",
        }
    }
}

fn strip_marker<'a>(reference: &'a str, marker: &str) -> Option<&'a str> {
    let head = reference.get(..marker.len())?;
    if head.eq_ignore_ascii_case(marker) {
        Some(&reference[marker.len()..])
    } else {
        None
    }
}

fn clean(rest: &str) -> String {
    rest.trim_start_matches(':').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_markers() {
        assert_eq!(Binding::parse("@INLINE: Hello [[+name]]"), Binding::Inline("Hello [[+name]]".to_string()));
        assert_eq!(Binding::parse("@code<p>x</p>"), Binding::Inline("<p>x</p>".to_string()));
    }

    #[test]
    fn test_file_marker() {
        assert_eq!(
            Binding::parse("@FILE:{core_path}row.tpl"),
            Binding::File("{core_path}row.tpl".to_string())
        );
        assert_eq!(Binding::parse("@file  a.tpl "), Binding::File("a.tpl".to_string()));
    }

    #[test]
    fn test_chunk_marker_is_stripped() {
        assert_eq!(Binding::parse("@CHUNK: rowTpl"), Binding::Chunk("rowTpl".to_string()));
        assert_eq!(Binding::parse("@chunk rowTpl"), Binding::Chunk("rowTpl".to_string()));
    }

    #[test]
    fn test_bare_name_is_chunk() {
        assert_eq!(Binding::parse("rowTpl"), Binding::Chunk("rowTpl".to_string()));
        assert_eq!(Binding::parse(":rowTpl"), Binding::Chunk("rowTpl".to_string()));
    }

    #[test]
    fn test_multibyte_reference_does_not_panic() {
        assert_eq!(Binding::parse("é"), Binding::Chunk("é".to_string()));
    }
}
