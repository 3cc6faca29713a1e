//! Lexer for the body of a template tag using logos
//!
//! The outer delimiters (`[[` / `]]` by default) are located by the tag
//! parser; this lexer only sees what is between them, e.g.
//! `!+price:default=`0`` or `$rowTpl? &id=`5``.

use logos::Logos;

use crate::error::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Cache marker
    #[token("!")]
    Bang,

    // Tag kind sigils (longer patterns first)
    #[token("++")]
    PlusPlus,
    #[token("+")]
    Plus,
    #[token("$")]
    Dollar,
    #[token("%")]
    Percent,
    #[token("*")]
    Star,
    #[token("~")]
    Tilde,

    // Delimiters
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token("?")]
    Question,
    #[token("&")]
    Amp,

    #[regex(r"[a-zA-Z0-9_][a-zA-Z0-9_.\-]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"`[^`]*`", |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    Quoted(String),
}

/// Lex a tag body into tokens with spans.
///
/// Unlike a lenient filter, an unrecognised character is reported as the
/// span of the offending slice so callers can point at it.
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, Span> {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| tok.map(|t| (t, span.clone())).map_err(|_| span))
        .collect()
}
