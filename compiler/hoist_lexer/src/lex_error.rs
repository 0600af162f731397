//! Lexer errors.

use hoist_diagnostic::{Diagnostic, ErrorCode};
use hoist_ir::Span;
use thiserror::Error;

/// A lexer error: what went wrong and where.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
#[error("{kind}")]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated template literal")]
    UnterminatedTemplate,
    /// `${` inside a template literal with no matching `}`.
    #[error("unterminated `${{` in template literal")]
    UnterminatedTemplateHole,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid character {ch:?}")]
    InvalidCharacter { ch: char },
    #[error("invalid number literal `{text}`")]
    InvalidNumber { text: String },
    #[error("invalid escape sequence `\\{sequence}`")]
    InvalidEscape { sequence: String },
}

impl LexError {
    pub fn new(span: Span, kind: LexErrorKind) -> Self {
        LexError { span, kind }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::InvalidCharacter { .. } => ErrorCode::E0002,
            LexErrorKind::InvalidNumber { .. } => ErrorCode::E0003,
            LexErrorKind::UnterminatedComment => ErrorCode::E0004,
            LexErrorKind::InvalidEscape { .. } => ErrorCode::E0005,
            LexErrorKind::UnterminatedTemplate | LexErrorKind::UnterminatedTemplateHole => {
                ErrorCode::E0006
            }
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match &self.kind {
            LexErrorKind::UnterminatedString => "string starts here and is never closed",
            LexErrorKind::UnterminatedTemplate => "template starts here and is never closed",
            LexErrorKind::UnterminatedTemplateHole => "expected `}` to close this hole",
            LexErrorKind::UnterminatedComment => "comment starts here and is never closed",
            LexErrorKind::InvalidCharacter { .. } => "not valid here",
            LexErrorKind::InvalidNumber { .. } => "invalid number",
            LexErrorKind::InvalidEscape { .. } => "invalid escape",
        };
        let diag = Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(self.span, label);
        match &self.kind {
            LexErrorKind::UnterminatedString => {
                diag.with_suggestion("strings cannot span lines; use a template literal for multi-line text")
            }
            LexErrorKind::InvalidNumber { .. } => {
                diag.with_note("numbers cannot be followed directly by letters, and `e` needs exponent digits")
            }
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_messages() {
        let err = LexError::new(Span::new(0, 1), LexErrorKind::InvalidCharacter { ch: '@' });
        assert_eq!(err.to_string(), "invalid character '@'");

        let err = LexError::new(
            Span::new(0, 4),
            LexErrorKind::InvalidEscape {
                sequence: "u12".into(),
            },
        );
        assert_eq!(err.to_string(), r"invalid escape sequence `\u12`");

        let err = LexError::new(Span::new(0, 2), LexErrorKind::UnterminatedTemplateHole);
        assert_eq!(err.to_string(), "unterminated `${` in template literal");
    }

    #[test]
    fn test_diagnostic_code_and_span() {
        let err = LexError::new(Span::new(3, 8), LexErrorKind::UnterminatedString);
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E0001);
        assert_eq!(diag.primary_span(), Some(Span::new(3, 8)));
        assert_eq!(diag.suggestions.len(), 1);
    }
}
