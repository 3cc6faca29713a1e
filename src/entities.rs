//! HTML entity encoding for the placeholder sanitizer
//!
//! Only the characters the sanitizer cares about get named entities: the
//! markup-significant ASCII set plus the non-breaking space and `Â`, which
//! rich-text editors leave behind when UTF-8 `&nbsp;` is double-decoded.
//! `decode` is the exact inverse of `encode`, and also understands numeric
//! references.

const NAMED: &[(char, &str)] = &[
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#039;"),
    ('\u{a0}', "&nbsp;"),
    ('\u{c2}', "&Acirc;"),
];

pub fn encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match NAMED.iter().find(|(ch, _)| *ch == c) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

pub fn decode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        match rest.find(';').and_then(|end| decode_entity(&rest[..=end]).map(|c| (c, end))) {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode a single `&...;` reference
fn decode_entity(entity: &str) -> Option<char> {
    if let Some((c, _)) = NAMED.iter().find(|(_, e)| *e == entity) {
        return Some(*c);
    }

    let body = entity.strip_prefix("&#")?.strip_suffix(';')?;
    let code = match body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => body.parse().ok()?,
    };
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_markup() {
        assert_eq!(encode(r#"<a href="x">Tom & Jerry's</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;");
    }

    #[test]
    fn test_encode_editor_artifacts() {
        assert_eq!(encode("a\u{a0}\u{c2}b"), "a&nbsp;&Acirc;b");
    }

    #[test]
    fn test_decode_inverts_encode() {
        let input = "<p>\u{a0}caf\u{e9} & \"more\" &amp; '</p>";
        assert_eq!(decode(&encode(input)), input);
    }

    #[test]
    fn test_decode_numeric_references() {
        assert_eq!(decode("&#65;&#x42;&#X43;"), "ABC");
    }

    #[test]
    fn test_decode_leaves_unknown_references() {
        assert_eq!(decode("a & b &copy; &;"), "a & b &copy; &;");
    }
}
