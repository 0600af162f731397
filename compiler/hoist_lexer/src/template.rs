//! Splitting template literal bodies into text and `${}` holes.
//!
//! The lexer emits a template literal as one token carrying its raw body.
//! The parser splits that body here, cooks the text chunks with
//! [`unescape`](crate::unescape), and re-lexes each hole with
//! [`lex_at`](crate::lex_at) at the hole's offset in the file.

use std::ops::Range;

/// One piece of a template literal body, as byte ranges into the body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TemplateChunk {
    /// Raw text, escapes not yet processed.
    Text(Range<usize>),
    /// Source of a `${...}` hole, without the delimiters.
    Hole(Range<usize>),
}

/// Split a raw template body.
///
/// Returns the byte offset of the `${` whose closing brace is missing.
pub fn split_template(body: &str) -> Result<Vec<TemplateChunk>, usize> {
    let bytes = body.as_bytes();
    let mut chunks = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                if text_start < i {
                    chunks.push(TemplateChunk::Text(text_start..i));
                }
                let hole_start = i + 2;
                let hole_end = find_hole_end(bytes, hole_start).ok_or(i)?;
                chunks.push(TemplateChunk::Hole(hole_start..hole_end));
                i = hole_end + 1;
                text_start = i;
            }
            _ => i += 1,
        }
    }

    if text_start < bytes.len() {
        chunks.push(TemplateChunk::Text(text_start..bytes.len()));
    }
    Ok(chunks)
}

/// Index of the backtick closing a template whose body starts at `bytes[0]`.
///
/// A `${` whose hole never closes is scanned as plain text, leaving
/// [`split_template`] to report it against the finished body.
pub(crate) fn template_end(bytes: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return Some(i),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i = find_hole_end(bytes, i + 2).map_or(i + 2, |end| end + 1);
            }
            _ => i += 1,
        }
    }
    None
}

/// Index of the `}` closing a hole that starts at `start`.
///
/// Tracks brace depth so object literals inside a hole work, and skips
/// quoted strings and nested templates so a `}` inside one does not end
/// the hole.
fn find_hole_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(i),
            b'}' => depth -= 1,
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'`' => i += 1 + template_end(&bytes[i + 1..])?,
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pieces(body: &str) -> Vec<String> {
        split_template(body)
            .unwrap()
            .into_iter()
            .map(|chunk| match chunk {
                TemplateChunk::Text(r) => format!("text:{}", &body[r]),
                TemplateChunk::Hole(r) => format!("hole:{}", &body[r]),
            })
            .collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(pieces("no holes here"), vec!["text:no holes here"]);
        assert!(split_template("").unwrap().is_empty());
    }

    #[test]
    fn test_holes_between_text() {
        assert_eq!(
            pieces("${name} is ${age} years"),
            vec!["hole:name", "text: is ", "hole:age", "text: years"]
        );
    }

    #[test]
    fn test_nested_braces_and_strings() {
        assert_eq!(
            pieces("${ {a: 1}.a } and ${'}'}"),
            vec!["hole: {a: 1}.a ", "text: and ", "hole:'}'"]
        );
    }

    #[test]
    fn test_escaped_dollar_is_text() {
        assert_eq!(pieces(r"cost: \${x}"), vec![r"text:cost: \${x}"]);
    }

    #[test]
    fn test_unclosed_hole() {
        assert_eq!(split_template("total: ${sum"), Err(7));
    }

    #[test]
    fn test_template_inside_hole() {
        assert_eq!(
            pieces("a ${`b ${c}`} d"),
            vec!["text:a ", "hole:`b ${c}`", "text: d"]
        );
        assert_eq!(pieces("${`}`}"), vec!["hole:`}`"]);
    }

    #[test]
    fn test_template_end() {
        assert_eq!(template_end(b"abc` rest"), Some(3));
        assert_eq!(template_end(br"a\`b`"), Some(4));
        assert_eq!(template_end(b"a ${`b ${c}`} d` rest"), Some(15));
        assert_eq!(template_end(b"${ '`' }`"), Some(8));
        assert_eq!(template_end(b"${sum` rest"), Some(5));
        assert_eq!(template_end(b"abc"), None);
        assert_eq!(template_end(b"a ${`b"), None);
    }
}
