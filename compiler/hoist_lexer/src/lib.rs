//! Lexer for hoist scripts using logos with string interning.
//!
//! This lexer:
//! - Interns identifiers and string literal contents
//! - Drops trivia, recording on each token whether a newline, whitespace
//!   or a comment preceded it (the parser's semicolon insertion reads the
//!   newline flag)
//! - Keeps going after an error, so one pass reports every bad token

mod escape;
mod lex_error;
mod raw_token;
mod template;

use std::ops::Range;

use hoist_ir::{Span, StringInterner, Token, TokenFlags, TokenKind, TokenList};
use logos::Logos;

use raw_token::RawToken;

pub use escape::{unescape, EscapeError};
pub use lex_error::{LexError, LexErrorKind};
pub use template::{split_template, TemplateChunk};

/// Tokens plus every error found along the way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexOutput {
    /// Always ends with `Eof`.
    pub tokens: TokenList,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Lex a whole source file.
pub fn lex(source: &str, interner: &StringInterner) -> LexOutput {
    Lexer::new(source, 0, interner).lex_all()
}

/// Lex a fragment that starts at byte `base` of the enclosing file.
///
/// Every span in the output is relative to the enclosing file.
pub fn lex_at(source: &str, base: u32, interner: &StringInterner) -> LexOutput {
    Lexer::new(source, base, interner).lex_all()
}

struct Lexer<'src, 'i> {
    source: &'src str,
    base: u32,
    interner: &'i StringInterner,
}

impl<'src, 'i> Lexer<'src, 'i> {
    fn new(source: &'src str, base: u32, interner: &'i StringInterner) -> Self {
        Lexer {
            source,
            base,
            interner,
        }
    }

    fn span(&self, range: Range<usize>) -> Span {
        Span::try_from_range(range)
            .unwrap_or(Span::point(u32::MAX))
            .shifted(self.base)
    }

    fn lex_all(&self) -> LexOutput {
        let mut output = LexOutput::default();
        let mut logos = RawToken::lexer(self.source);
        let mut flags = TokenFlags::empty();
        let mut prev_end = 0usize;

        while let Some(result) = logos.next() {
            let range = logos.span();
            let slice = logos.slice();
            let span = self.span(range.clone());

            if range.start > prev_end {
                flags |= TokenFlags::SPACE_BEFORE;
            }
            prev_end = range.end;

            let raw = match result {
                Ok(raw) => raw,
                Err(()) => {
                    let ch = slice.chars().next().unwrap_or('\u{FFFD}');
                    output
                        .errors
                        .push(LexError::new(span, LexErrorKind::InvalidCharacter { ch }));
                    continue;
                }
            };

            if raw.is_trivia() {
                if raw == RawToken::Newline || slice.contains('\n') {
                    flags |= TokenFlags::NEWLINE_BEFORE;
                }
                if raw != RawToken::Newline {
                    flags |= TokenFlags::TRIVIA_BEFORE;
                }
                continue;
            }

            if matches!(raw, RawToken::Number | RawToken::HexNumber) {
                let tail = self.number_suffix_len(range.end);
                if tail > 0 {
                    let text = &self.source[range.start..range.end + tail];
                    output.errors.push(invalid_number(text, self.span(range.start..range.end + tail)));
                    logos.bump(tail);
                    prev_end += tail;
                    continue;
                }
            }

            match self.convert(raw, slice, span) {
                Ok(kind) => {
                    output.tokens.push(Token { kind, span, flags });
                    flags = TokenFlags::empty();
                }
                Err(err) => output.errors.push(err),
            }
        }

        let eof = self.span(self.source.len()..self.source.len());
        output.tokens.push(Token {
            kind: TokenKind::Eof,
            span: eof,
            flags,
        });
        output
    }

    /// Convert a raw token to a `TokenKind`, interning and cooking literals.
    fn convert(&self, raw: RawToken, slice: &str, span: Span) -> Result<TokenKind, LexError> {
        let kind = match raw {
            RawToken::Number => {
                let value = slice
                    .parse::<f64>()
                    .map_err(|_| invalid_number(slice, span))?;
                TokenKind::number(value)
            }
            RawToken::HexNumber => {
                let value = u64::from_str_radix(&slice[2..], 16)
                    .map_err(|_| invalid_number(slice, span))?;
                TokenKind::number(value as f64)
            }
            RawToken::EmptyExponent => return Err(invalid_number(slice, span)),
            RawToken::Str => {
                let body = &slice[1..slice.len() - 1];
                let cooked = unescape(body).map_err(|e| escape_error(&e, span.start + 1))?;
                TokenKind::Str(self.interner.intern(&cooked))
            }
            RawToken::UnterminatedStr => {
                return Err(LexError::new(span, LexErrorKind::UnterminatedString))
            }
            RawToken::Template(true) => {
                TokenKind::Template(self.interner.intern(&slice[1..slice.len() - 1]))
            }
            RawToken::Template(false) => {
                return Err(LexError::new(span, LexErrorKind::UnterminatedTemplate))
            }
            RawToken::BlockComment(_) => {
                return Err(LexError::new(
                    Span::new(span.start, span.start.saturating_add(2)),
                    LexErrorKind::UnterminatedComment,
                ))
            }
            RawToken::Ident => TokenKind::Ident(self.interner.intern(slice)),

            // Keywords
            RawToken::Var => TokenKind::Var,
            RawToken::Let => TokenKind::Let,
            RawToken::Const => TokenKind::Const,
            RawToken::Function => TokenKind::Function,
            RawToken::Return => TokenKind::Return,
            RawToken::If => TokenKind::If,
            RawToken::Else => TokenKind::Else,
            RawToken::For => TokenKind::For,
            RawToken::Of => TokenKind::Of,
            RawToken::While => TokenKind::While,
            RawToken::Break => TokenKind::Break,
            RawToken::Continue => TokenKind::Continue,
            RawToken::True => TokenKind::True,
            RawToken::False => TokenKind::False,
            RawToken::Null => TokenKind::Null,
            RawToken::Typeof => TokenKind::Typeof,

            // Delimiters
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Question => TokenKind::Question,
            RawToken::Arrow => TokenKind::Arrow,

            // Operators
            RawToken::Eq => TokenKind::Eq,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::EqEqEq => TokenKind::EqEqEq,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::NotEqEq => TokenKind::NotEqEq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::Gt => TokenKind::Gt,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::Plus => TokenKind::Plus,
            RawToken::PlusPlus => TokenKind::PlusPlus,
            RawToken::PlusEq => TokenKind::PlusEq,
            RawToken::Minus => TokenKind::Minus,
            RawToken::MinusMinus => TokenKind::MinusMinus,
            RawToken::MinusEq => TokenKind::MinusEq,
            RawToken::Star => TokenKind::Star,
            RawToken::StarStar => TokenKind::StarStar,
            RawToken::StarEq => TokenKind::StarEq,
            RawToken::Slash => TokenKind::Slash,
            RawToken::SlashEq => TokenKind::SlashEq,
            RawToken::Percent => TokenKind::Percent,
            RawToken::PercentEq => TokenKind::PercentEq,
            RawToken::Bang => TokenKind::Bang,
            RawToken::AndAnd => TokenKind::AndAnd,
            RawToken::OrOr => TokenKind::OrOr,

            RawToken::Newline | RawToken::LineComment => {
                unreachable!("trivia is filtered before conversion")
            }
        };
        Ok(kind)
    }

    /// Length of identifier characters glued to the end of a number.
    ///
    /// `3px` and `0x1g` are single bad tokens, not a number then a name.
    fn number_suffix_len(&self, end: usize) -> usize {
        let rest = &self.source[end..];
        rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(rest.len())
    }
}

fn invalid_number(slice: &str, span: Span) -> LexError {
    LexError::new(
        span,
        LexErrorKind::InvalidNumber {
            text: slice.to_owned(),
        },
    )
}

/// Map an escape error in a literal body to a file span.
fn escape_error(err: &EscapeError, body_start: u32) -> LexError {
    LexError::new(
        Span::new(
            body_start + err.range.start as u32,
            body_start + err.range.end as u32,
        ),
        LexErrorKind::InvalidEscape {
            sequence: err.sequence.clone(),
        },
    )
}

#[cfg(test)]
mod tests;
