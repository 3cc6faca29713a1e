//! Built-in tag engine
//!
//! Understands the bracketed tag syntax of the host platform:
//!
//! ```text
//! [[+placeholder]]            value from the placeholder scope
//! [[++setting]]               system setting
//! [[$chunk? &prop=`value`]]   another chunk, with extra placeholders
//! [[%lexicon.key]]            lexicon entry
//! [[- comment]]               always removed
//! [[!+placeholder]]           uncacheable, deferred to a later pass
//! [[+name:default=`x`]]       output filters
//! ```
//!
//! Tags nest; inner tags are resolved before the tag around them is
//! evaluated. Field, link and snippet tags are recognised but cannot be
//! resolved here, so they are kept (or removed, when the pass asks for it).

use tracing::warn;

use crate::error::TagSyntaxError;
use crate::entities;
use crate::placeholders::Placeholders;
use crate::settings::OptionSource;

use super::grammar::{parse_tag, Tag, TagKind};
use super::renderer::{RenderEnv, Renderer, TagPass, DEFAULT_MAX_ITERATIONS};

/// Outcome of evaluating one tag
#[derive(Debug, PartialEq)]
enum Evaluation {
    Resolved(String),
    Unresolved,
    /// Uncacheable tag in a pass that leaves those alone
    Deferred,
}

/// State shared by one walk over the content
#[derive(Clone, Copy)]
struct PassContext<'p, 'e> {
    env: &'p RenderEnv<'e>,
    pass: &'p TagPass,
    placeholders: &'p Placeholders,
    /// Names of the chunks being expanded, outermost first
    chain: &'p [String],
}

/// The built-in [`Renderer`]
#[derive(Debug, Clone, Default)]
pub struct TagParser;

impl TagParser {
    pub fn new() -> Self {
        Self
    }

    /// Run `pass` over `content` until it stops changing or the iteration
    /// bound is reached.
    pub fn process(
        &self,
        env: &RenderEnv<'_>,
        content: &str,
        placeholders: &Placeholders,
        pass: &TagPass,
    ) -> String {
        let ctx = PassContext {
            env,
            pass,
            placeholders,
            chain: &[],
        };

        let mut current = content.to_string();
        for _ in 0..pass.max_iterations {
            let next = self.walk(&ctx, &current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Report unterminated and malformed tags in `source`
    pub fn check(&self, source: &str, pass: &TagPass) -> Vec<TagSyntaxError> {
        let mut errors = Vec::new();
        check_text(source, 0, pass, &mut errors);
        errors
    }

    /// One left-to-right walk, resolving innermost tags first
    fn walk(&self, ctx: &PassContext<'_, '_>, input: &str) -> String {
        let (open, close) = (ctx.pass.open.as_str(), ctx.pass.close.as_str());
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find(open) {
            out.push_str(&rest[..pos]);
            let after_open = &rest[pos + open.len()..];

            let Some(end) = find_close(after_open, open, close) else {
                // Unterminated: the rest is literal text
                out.push_str(&rest[pos..]);
                return out;
            };

            let body = self.walk(ctx, &after_open[..end]);
            match self.evaluate(ctx, &body) {
                Evaluation::Resolved(text) => out.push_str(&text),
                Evaluation::Unresolved if ctx.pass.remove_unprocessed => {}
                Evaluation::Unresolved | Evaluation::Deferred => {
                    out.push_str(open);
                    out.push_str(&body);
                    out.push_str(close);
                }
            }
            rest = &after_open[end + close.len()..];
        }

        out.push_str(rest);
        out
    }

    fn evaluate(&self, ctx: &PassContext<'_, '_>, body: &str) -> Evaluation {
        let trimmed = body.trim_start();
        if trimmed.starts_with('-') {
            return Evaluation::Resolved(String::new());
        }

        let Ok(tag) = parse_tag(trimmed) else {
            return Evaluation::Unresolved;
        };
        if tag.uncacheable && !ctx.pass.process_uncacheable {
            return Evaluation::Deferred;
        }

        let value = match tag.kind {
            TagKind::Placeholder => ctx.placeholders.get(&tag.name).cloned(),
            TagKind::Setting => ctx.env.settings.option(&tag.name),
            TagKind::Lexicon => ctx
                .env
                .lexicon
                .get(&tag.name)
                .map(|entry| substitute_properties(entry, &tag.properties)),
            TagKind::Chunk => self.include_chunk(ctx, &tag),
            TagKind::Field | TagKind::Link | TagKind::Snippet => None,
        };

        match apply_filters(value, &tag.filters) {
            Some(text) => Evaluation::Resolved(text),
            None => Evaluation::Unresolved,
        }
    }

    /// Expand `[[$name]]` with its properties layered over the current scope.
    ///
    /// A chunk that includes itself, directly or through others, expands
    /// to nothing at the point where the cycle closes. So does an include
    /// nested deeper than the iteration bound.
    fn include_chunk(&self, ctx: &PassContext<'_, '_>, tag: &Tag) -> Option<String> {
        let chunk = ctx.env.registry.get_chunk(&tag.name)?;
        if ctx.chain.contains(&tag.name) {
            warn!(
                cycle = %format!("{} -> {}", ctx.chain.join(" -> "), tag.name),
                "circular chunk include"
            );
            return Some(String::new());
        }
        if ctx.chain.len() >= ctx.pass.max_iterations {
            warn!(chunk = %tag.name, depth = ctx.chain.len(), "chunk include too deep");
            return Some(String::new());
        }

        let mut chain = ctx.chain.to_vec();
        chain.push(tag.name.clone());

        let mut scope = ctx.placeholders.clone();
        scope.extend(tag.properties.iter().cloned());

        let child = PassContext {
            env: ctx.env,
            pass: ctx.pass,
            placeholders: &scope,
            chain: &chain,
        };
        Some(self.walk(&child, chunk.content()))
    }

    fn max_iterations(env: &RenderEnv<'_>) -> usize {
        env.settings
            .option("parser_max_iterations")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_ITERATIONS)
    }
}

impl Renderer for TagParser {
    fn render(&self, env: &RenderEnv<'_>, source: &str, placeholders: &Placeholders) -> String {
        let pass = TagPass::default().with_max_iterations(Self::max_iterations(env));
        self.process(env, source, placeholders, &pass)
    }

    fn process_element_tags(
        &self,
        env: &RenderEnv<'_>,
        content: &mut String,
        placeholders: &Placeholders,
        pass: &TagPass,
    ) {
        *content = self.process(env, content, placeholders, pass);
    }
}

/// Byte offset of the `close` that matches an already consumed `open`
fn find_close(input: &str, open: &str, close: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = 0;

    while i < input.len() {
        let tail = &input[i..];
        if tail.starts_with(close) {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
            i += close.len();
        } else if tail.starts_with(open) {
            depth += 1;
            i += open.len();
        } else {
            i += tail.chars().next().map_or(1, char::len_utf8);
        }
    }
    None
}

/// Collect syntax errors, with spans offset to absolute positions
fn check_text(input: &str, offset: usize, pass: &TagPass, errors: &mut Vec<TagSyntaxError>) {
    let (open, close) = (pass.open.as_str(), pass.close.as_str());
    let mut cursor = 0;

    while let Some(pos) = input[cursor..].find(open) {
        let tag_start = cursor + pos;
        let body_start = tag_start + open.len();

        let Some(end) = find_close(&input[body_start..], open, close) else {
            errors.push(TagSyntaxError::Unterminated {
                span: offset + tag_start..offset + input.len(),
                close: close.to_string(),
            });
            return;
        };

        let body = &input[body_start..body_start + end];
        check_text(body, offset + body_start, pass, errors);

        // Nested tags make the raw body unparseable until they resolve
        if !body.contains(open) && !body.trim_start().starts_with('-') {
            if let Err(err) = parse_tag(body) {
                errors.push(err.offset(offset + body_start));
            }
        }

        cursor = body_start + end + close.len();
    }
}

fn substitute_properties(text: &str, properties: &[(String, String)]) -> String {
    properties.iter().fold(text.to_string(), |acc, (k, v)| {
        acc.replace(&format!("[[+{}]]", k), v)
    })
}

/// Apply output filters left to right. A missing value counts as empty.
fn apply_filters(value: Option<String>, filters: &[(String, Option<String>)]) -> Option<String> {
    filters.iter().fold(value, |value, (name, arg)| {
        let arg = arg.clone().unwrap_or_default();
        match name.to_ascii_lowercase().as_str() {
            "default" => match value {
                Some(v) if !v.is_empty() => Some(v),
                _ => Some(arg),
            },
            "notempty" => match value {
                Some(v) if !v.is_empty() => Some(arg),
                _ => Some(String::new()),
            },
            "isempty" => match value {
                Some(v) if !v.is_empty() => Some(v),
                _ => Some(arg),
            },
            "ucase" | "uppercase" => value.map(|v| v.to_uppercase()),
            "lcase" | "lowercase" => value.map(|v| v.to_lowercase()),
            "ucfirst" => value.map(|v| {
                let mut chars = v.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }),
            "htmlent" | "esc" => value.map(|v| entities::encode(&v)),
            _ => value,
        }
    })
}
