//! Error types for template resolution and tag syntax checking

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::error::{Rich, RichPattern};
use thiserror::Error;

use crate::template::Token;

/// Byte range in template source text
pub type Span = std::ops::Range<usize>;

/// Errors raised by the low-level template primitives.
///
/// The `Display` text of each variant is the diagnostic that
/// [`parse_tpl`](crate::template::parse_tpl) hands back as rendered output.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template file does not exist
    #[error("File: {} is not found.", .path.display())]
    FileNotFound { path: PathBuf },

    /// Template file exists but could not be read
    #[error("File: {} could not be read: {message}", .path.display())]
    FileRead { path: PathBuf, message: String },

    /// Chunk missing from the registry and from the chunks directory
    #[error("Chunk: {name} is not found, neither the file {source}")]
    ChunkNotFound {
        name: String,
        #[source]
        source: Box<TemplateError>,
    },

    /// Chunk registered twice under the same name
    #[error("duplicate chunk definition: {name}")]
    Duplicate { name: String },
}

impl TemplateError {
    /// Create a file-not-found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Wrap a file error as the fallback failure of a named chunk
    pub fn chunk_not_found(name: impl Into<String>, source: TemplateError) -> Self {
        Self::ChunkNotFound {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

/// Syntax problems found in `[[...]]` tags
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TagSyntaxError {
    #[error("unterminated tag at {span:?}: missing '{close}'")]
    Unterminated { span: Span, close: String },

    #[error("invalid tag at {span:?}: {message}")]
    InvalidTag { span: Span, message: String },
}

impl TagSyntaxError {
    /// Source range the error points at
    pub fn span(&self) -> &Span {
        match self {
            Self::Unterminated { span, .. } | Self::InvalidTag { span, .. } => span,
        }
    }

    /// Shift the span by `offset`, for a tag body found inside larger text
    pub fn offset(self, offset: usize) -> Self {
        match self {
            Self::Unterminated { span, close } => Self::Unterminated {
                span: span.start + offset..span.end + offset,
                close,
            },
            Self::InvalidTag { span, message } => Self::InvalidTag {
                span: span.start + offset..span.end + offset,
                message,
            },
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let span = self.span().clone();
        let label = match self {
            Self::Unterminated { close, .. } => format!("this tag is never closed with '{}'", close),
            Self::InvalidTag { message, .. } => message.clone(),
        };

        Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .unwrap();

        String::from_utf8(buf).unwrap()
    }
}

impl<'a> From<Rich<'a, Token>> for TagSyntaxError {
    fn from(err: Rich<'a, Token>) -> Self {
        let found = match err.found() {
            Some(tok) => format_token(tok),
            None => "end of tag".to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of tag".to_string()),
                _ => None,
            })
            .collect();

        let message = if expected.is_empty() {
            format!("unexpected {}", found)
        } else {
            format!("unexpected {}, expected {}", found, expected.join(" or "))
        };

        TagSyntaxError::InvalidTag {
            span: err.span().into_range(),
            message,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("name '{}'", s),
        Token::Quoted(s) => format!("value `{}`", s),
        Token::Bang => "'!'".to_string(),
        Token::PlusPlus => "'++'".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::Dollar => "'$'".to_string(),
        Token::Percent => "'%'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Tilde => "'~'".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Equals => "'='".to_string(),
        Token::Question => "'?'".to_string(),
        Token::Amp => "'&'".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_display() {
        let err = TemplateError::file_not_found("/srv/core/missing.tpl");
        assert_eq!(err.to_string(), "File: /srv/core/missing.tpl is not found.");
    }

    #[test]
    fn test_chunk_not_found_display() {
        let err = TemplateError::chunk_not_found(
            "rowTpl",
            TemplateError::file_not_found("/chunks/rowtpl.chunk.tpl"),
        );
        assert_eq!(
            err.to_string(),
            "Chunk: rowTpl is not found, neither the file File: /chunks/rowtpl.chunk.tpl is not found."
        );
    }

    #[test]
    fn test_offset_shifts_span() {
        let err = TagSyntaxError::InvalidTag {
            span: 2..3,
            message: "bad".to_string(),
        };
        assert_eq!(err.offset(10).span(), &(12..13));
    }

    #[test]
    fn test_syntax_error_format_mentions_file() {
        let source = "Hello [[+name";
        let err = TagSyntaxError::Unterminated {
            span: 6..13,
            close: "]]".to_string(),
        };
        let report = err.format(source, "inline.tpl");
        assert!(report.contains("inline.tpl"));
        assert!(report.contains("unterminated tag"));
    }
}
