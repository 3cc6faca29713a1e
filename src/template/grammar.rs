//! Tag body grammar using chumsky
//!
//! ```text
//! tag      := "!"? kind? name filter* "?"? property*
//! kind     := "++" | "+" | "$" | "%" | "*" | "~"
//! filter   := ":" name ("=" `value`)?
//! property := "&" name "=" `value`
//! ```

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::TagSyntaxError;

use super::lexer::{lex, Token};

/// What a tag refers to
#[derive(Debug, Clone, PartialEq)]
pub enum TagKind {
    Placeholder,
    Setting,
    Chunk,
    Lexicon,
    Field,
    Link,
    Snippet,
}

/// A parsed tag body
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub uncacheable: bool,
    pub kind: TagKind,
    pub name: String,
    pub filters: Vec<(String, Option<String>)>,
    pub properties: Vec<(String, String)>,
}

/// Parse a tag body (without delimiters). Error spans are relative to `body`.
pub fn parse_tag(body: &str) -> Result<Tag, TagSyntaxError> {
    let len = body.len();

    let tokens = lex(body).map_err(|span| TagSyntaxError::InvalidTag {
        message: format!(
            "unexpected character '{}'",
            body.get(span.clone()).unwrap_or_default()
        ),
        span,
    })?;

    let token_stream = Stream::from_iter(tokens.into_iter().map(|(tok, span)| (tok, SimpleSpan::from(span))))
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    tag_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => err.into(),
            None => TagSyntaxError::InvalidTag {
                span: 0..len,
                message: "invalid tag".to_string(),
            },
        })
}

fn tag_parser<'a, I>() -> impl Parser<'a, I, Tag, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let name = select! {
        Token::Ident(s) => s,
    };

    let quoted = select! {
        Token::Quoted(s) => s,
    };

    // A bare name is a snippet call
    let kind = select! {
        Token::PlusPlus => TagKind::Setting,
        Token::Plus => TagKind::Placeholder,
        Token::Dollar => TagKind::Chunk,
        Token::Percent => TagKind::Lexicon,
        Token::Star => TagKind::Field,
        Token::Tilde => TagKind::Link,
    }
    .or_not()
    .map(|kind| kind.unwrap_or(TagKind::Snippet));

    // :name or :name=`arg`
    let filter = just(Token::Colon)
        .ignore_then(name.clone())
        .then(just(Token::Equals).ignore_then(quoted.clone()).or_not());

    // &name=`value`
    let property = just(Token::Amp)
        .ignore_then(name.clone())
        .then_ignore(just(Token::Equals))
        .then(quoted);

    just(Token::Bang)
        .or_not()
        .map(|bang| bang.is_some())
        .then(kind)
        .then(name)
        .then(filter.repeated().collect::<Vec<_>>())
        .then_ignore(just(Token::Question).or_not())
        .then(property.repeated().collect::<Vec<_>>())
        .map(|((((uncacheable, kind), name), filters), properties)| Tag {
            uncacheable,
            kind,
            name,
            filters,
            properties,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_structure() {
        let tag = parse_tag("!$rowTpl:default=`x`? &id=`5`").expect("Should parse");
        assert_eq!(
            tag,
            Tag {
                uncacheable: true,
                kind: TagKind::Chunk,
                name: "rowTpl".to_string(),
                filters: vec![("default".to_string(), Some("x".to_string()))],
                properties: vec![("id".to_string(), "5".to_string())],
            }
        );
    }

    #[test]
    fn test_parse_tag_kinds() {
        let kind = |body: &str| parse_tag(body).expect("Should parse").kind;
        assert_eq!(kind("++site_name"), TagKind::Setting);
        assert_eq!(kind("+a.b"), TagKind::Placeholder);
        assert_eq!(kind("%perm.list"), TagKind::Lexicon);
        assert_eq!(kind("*pagetitle"), TagKind::Field);
        assert_eq!(kind("~5"), TagKind::Link);
        assert_eq!(kind("getResources? &parents=`1`"), TagKind::Snippet);
    }

    #[test]
    fn test_parse_tag_filter_without_argument() {
        let tag = parse_tag("+name:ucase:default=`n/a`").expect("Should parse");
        assert_eq!(
            tag.filters,
            vec![
                ("ucase".to_string(), None),
                ("default".to_string(), Some("n/a".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_tag_errors() {
        assert!(parse_tag("+").is_err());
        assert!(parse_tag("$row? &id").is_err());
        assert!(parse_tag("+a b").is_err());
    }

    #[test]
    fn test_error_span_points_at_token() {
        let err = parse_tag("+a b").unwrap_err();
        assert!(matches!(err, TagSyntaxError::InvalidTag { ref span, .. } if *span == (3..4)));

        let err = parse_tag("+a<").unwrap_err();
        assert!(matches!(err, TagSyntaxError::InvalidTag { ref span, .. } if *span == (2..3)));
    }

    #[test]
    fn test_missing_name_points_at_end() {
        let err = parse_tag("+").unwrap_err();
        assert_eq!(err.span(), &(1..1));
    }
}
