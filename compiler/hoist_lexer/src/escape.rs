//! Escape sequence processing for string and template literals.

use std::ops::Range;

/// A malformed escape: where it is in the literal body and what it was.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscapeError {
    /// Byte range of the sequence (from the backslash) within the body.
    pub range: Range<usize>,
    /// The sequence text after the backslash.
    pub sequence: String,
}

/// Process escapes in a literal body (the text between the delimiters).
///
/// Unknown escapes such as `\q` stand for the character itself, and a
/// backslash before a newline joins the lines. Only malformed `\x` and
/// `\u` sequences are errors.
pub fn unescape(body: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, escaped)) = chars.next() else {
            // A trailing lone backslash cannot come out of the lexer
            // regexes, but keep it literal rather than dropping it.
            out.push('\\');
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            '\n' => {}
            'x' => {
                let digits: String = take_while_max(&mut chars, 2, |c| c.is_ascii_hexdigit());
                let code = (digits.len() == 2)
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or_else(|| error(body, start, format!("x{digits}")))?;
                out.push(code);
            }
            'u' => {
                let ch = if chars.peek().map(|(_, c)| *c) == Some('{') {
                    chars.next();
                    let digits = take_while_max(&mut chars, 6, |c| c.is_ascii_hexdigit());
                    let closed = chars.peek().map(|(_, c)| *c) == Some('}');
                    if closed {
                        chars.next();
                    }
                    (closed && !digits.is_empty())
                        .then(|| u32::from_str_radix(&digits, 16).ok())
                        .flatten()
                        .and_then(char::from_u32)
                        .ok_or_else(|| error(body, start, format!("u{{{digits}")))?
                } else {
                    let digits = take_while_max(&mut chars, 4, |c| c.is_ascii_hexdigit());
                    (digits.len() == 4)
                        .then(|| u32::from_str_radix(&digits, 16).ok())
                        .flatten()
                        .and_then(char::from_u32)
                        .ok_or_else(|| error(body, start, format!("u{digits}")))?
                };
                out.push(ch);
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

fn take_while_max(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    max: usize,
    pred: impl Fn(char) -> bool,
) -> String {
    let mut taken = String::new();
    while taken.len() < max {
        match chars.peek() {
            Some(&(_, c)) if pred(c) => {
                taken.push(c);
                chars.next();
            }
            _ => break,
        }
    }
    taken
}

fn error(body: &str, start: usize, sequence: String) -> EscapeError {
    let end = (start + 1 + sequence.len()).min(body.len());
    EscapeError {
        range: start..end,
        sequence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_escapes() {
        assert_eq!(unescape(r"a\nb\tc").as_deref(), Ok("a\nb\tc"));
        assert_eq!(unescape(r#"\'\"\\"#).as_deref(), Ok("'\"\\"));
        assert_eq!(unescape(r"\`\$").as_deref(), Ok("`$"));
    }

    #[test]
    fn test_unknown_escape_is_identity() {
        assert_eq!(unescape(r"\q").as_deref(), Ok("q"));
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(unescape(r"\u00e9").as_deref(), Ok("é"));
        assert_eq!(unescape(r"\u{1F600}").as_deref(), Ok("\u{1F600}"));
        assert_eq!(unescape(r"\x41").as_deref(), Ok("A"));
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(unescape("one \\\ntwo").as_deref(), Ok("one two"));
    }

    #[test]
    fn test_malformed_unicode() {
        let err = unescape(r"ab\u12").unwrap_err();
        assert_eq!(err.sequence, "u12");
        assert_eq!(err.range, 2..6);
    }

    #[test]
    fn test_malformed_braced_unicode() {
        let err = unescape(r"\u{zz}").unwrap_err();
        assert_eq!(err.sequence, "u{");
    }
}
