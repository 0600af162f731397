//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.

use hoist_diagnostic::ErrorCode;
use hoist_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList};

use crate::ParseError;

/// Marks a bracket with no matching closer.
const UNMATCHED: usize = usize::MAX;

/// Cursor over a token list. The last token is always `Eof`.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    interner: &'a StringInterner,
    pos: usize,
    /// For each opening bracket, the index of the bracket that closes it.
    closers: Vec<usize>,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Cursor {
            tokens,
            interner,
            pos: 0,
            closers: match_brackets(tokens),
        }
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Current position, for progress checks during error recovery.
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn current(&self) -> &Token {
        self.nth(0)
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    /// Token `n` positions ahead, clamped to the trailing `Eof`.
    #[inline]
    pub fn nth(&self, n: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + n).min(last)]
    }

    #[inline]
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.nth(n).kind
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// A line break separates the current token from the previous one.
    #[inline]
    pub fn newline_before(&self) -> bool {
        self.current().has_newline_before()
    }

    /// Advance past the current token and return it. Never moves past `Eof`.
    #[inline]
    pub fn advance(&mut self) -> Token {
        let token = *self.current();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches.
    #[inline]
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(kind))
        }
    }

    #[cold]
    #[inline(never)]
    fn make_expect_error(&self, kind: TokenKind) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "unexpected token: expected {}, found {}",
                kind.display_name(),
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
        .with_label(format!("expected {}", kind.display_name()))
    }

    /// Expect a closing delimiter, pointing back at the opener on failure.
    pub fn expect_closing(&mut self, close: TokenKind, open_span: Span) -> Result<Token, ParseError> {
        if self.check(close) {
            return Ok(self.advance());
        }
        let delimiter = match close {
            TokenKind::RParen => '(',
            TokenKind::RBracket => '[',
            _ => '{',
        };
        Err(ParseError::new(
            ErrorCode::E1003,
            format!(
                "unclosed delimiter `{delimiter}`: expected {}, found {}",
                close.display_name(),
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
        .with_label(format!("expected {}", close.display_name()))
        .with_related(open_span, "unclosed delimiter opened here"))
    }

    pub fn expect_ident(&mut self) -> Result<Name, ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            self.advance();
            Ok(name)
        } else {
            Err(self.make_expect_ident_error())
        }
    }

    #[cold]
    #[inline(never)]
    fn make_expect_ident_error(&self) -> ParseError {
        let found = self.current_kind();
        let err = ParseError::new(
            ErrorCode::E1004,
            format!("expected identifier, found {}", found.display_name()),
            self.current_span(),
        )
        .with_label("expected a name here");
        if keyword_text(found).is_some() {
            err.with_help(format!(
                "{} is a reserved word and cannot be used as a name",
                found.display_name()
            ))
        } else {
            err
        }
    }

    /// Property names after `.` and object keys accept reserved words.
    pub fn expect_property_name(&mut self) -> Result<Name, ParseError> {
        let kind = self.current_kind();
        if let TokenKind::Ident(name) = kind {
            self.advance();
            return Ok(name);
        }
        if let Some(text) = keyword_text(kind) {
            self.advance();
            return Ok(self.interner.intern(text));
        }
        Err(self.make_expect_ident_error())
    }

    /// At `(`: is the matching `)` followed by `=>`?
    ///
    /// Lets the parser choose between a parenthesized expression and an
    /// arrow parameter list without consuming anything.
    pub fn paren_starts_arrow(&self) -> bool {
        match self.closers.get(self.pos) {
            Some(&close) if close != UNMATCHED => self
                .tokens
                .get(close + 1)
                .is_some_and(|token| token.kind == TokenKind::Arrow),
            _ => false,
        }
    }
}

/// Pair every opening bracket with its closer in one pass. Bracket kinds
/// are not checked against each other; a mismatch is reported when the
/// parser reaches it.
fn match_brackets(tokens: &TokenList) -> Vec<usize> {
    let mut closers = vec![UNMATCHED; tokens.len()];
    let mut open = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => open.push(i),
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                if let Some(start) = open.pop() {
                    closers[start] = i;
                }
            }
            _ => {}
        }
    }
    closers
}

/// Source text of a keyword token.
pub(crate) fn keyword_text(kind: TokenKind) -> Option<&'static str> {
    Some(match kind {
        TokenKind::Var => "var",
        TokenKind::Let => "let",
        TokenKind::Const => "const",
        TokenKind::Function => "function",
        TokenKind::Return => "return",
        TokenKind::If => "if",
        TokenKind::Else => "else",
        TokenKind::For => "for",
        TokenKind::Of => "of",
        TokenKind::While => "while",
        TokenKind::Break => "break",
        TokenKind::Continue => "continue",
        TokenKind::True => "true",
        TokenKind::False => "false",
        TokenKind::Null => "null",
        TokenKind::Typeof => "typeof",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoist_lexer::lex;

    fn with_cursor(source: &str, f: impl FnOnce(&mut Cursor<'_>, &StringInterner)) {
        let interner = StringInterner::new();
        let output = lex(source, &interner);
        let mut cursor = Cursor::new(&output.tokens, &interner);
        f(&mut cursor, &interner);
    }

    #[test]
    fn test_advance_stops_at_eof() {
        with_cursor("a", |cursor, _| {
            cursor.advance();
            assert!(cursor.is_at_end());
            cursor.advance();
            assert!(cursor.is_at_end());
        });
    }

    #[test]
    fn test_paren_starts_arrow() {
        with_cursor("(a, b) => a", |cursor, _| assert!(cursor.paren_starts_arrow()));
        with_cursor("(a, (b)) => a", |cursor, _| assert!(cursor.paren_starts_arrow()));
        with_cursor("(a + b) * 2", |cursor, _| assert!(!cursor.paren_starts_arrow()));
        with_cursor("(a, b", |cursor, _| assert!(!cursor.paren_starts_arrow()));
        with_cursor("((a) => a)", |cursor, _| {
            assert!(!cursor.paren_starts_arrow());
            cursor.advance();
            assert!(cursor.paren_starts_arrow());
        });
        with_cursor("(a]) => a", |cursor, _| assert!(!cursor.paren_starts_arrow()));
    }

    #[test]
    fn test_property_name_accepts_keywords() {
        with_cursor("for", |cursor, interner| {
            let name = cursor.expect_property_name().unwrap();
            assert_eq!(interner.lookup(name), "for");
        });
    }

    #[test]
    fn test_expect_ident_rejects_keyword_with_help() {
        with_cursor("const", |cursor, _| {
            let err = cursor.expect_ident().unwrap_err();
            assert_eq!(err.code, ErrorCode::E1004);
            assert_eq!(err.help.len(), 1);
        });
    }
}
