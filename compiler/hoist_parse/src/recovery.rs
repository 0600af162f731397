//! Error recovery for the parser.
//!
//! After a statement fails to parse, the parser skips ahead to a point where
//! the next statement plausibly begins and keeps going, so one run reports
//! every independent syntax error.

use hoist_ir::TokenKind;

use crate::cursor::Cursor;

/// A set of token kinds, tested by a bit per variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TokenSet(u128);

impl TokenSet {
    pub const fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u128 << discriminant_index(kind)))
    }

    pub const fn contains(&self, kind: TokenKind) -> bool {
        (self.0 & (1u128 << discriminant_index(kind))) != 0
    }
}

/// Bit position for a token kind. Payload-carrying kinds share one bit per
/// variant.
const fn discriminant_index(kind: TokenKind) -> u32 {
    match kind {
        TokenKind::Ident(_) => 0,
        TokenKind::Number(_) => 1,
        TokenKind::Str(_) => 2,
        TokenKind::Template(_) => 3,
        TokenKind::Var => 4,
        TokenKind::Let => 5,
        TokenKind::Const => 6,
        TokenKind::Function => 7,
        TokenKind::Return => 8,
        TokenKind::If => 9,
        TokenKind::Else => 10,
        TokenKind::For => 11,
        TokenKind::Of => 12,
        TokenKind::While => 13,
        TokenKind::Break => 14,
        TokenKind::Continue => 15,
        TokenKind::True => 16,
        TokenKind::False => 17,
        TokenKind::Null => 18,
        TokenKind::Typeof => 19,
        TokenKind::LParen => 20,
        TokenKind::RParen => 21,
        TokenKind::LBrace => 22,
        TokenKind::RBrace => 23,
        TokenKind::LBracket => 24,
        TokenKind::RBracket => 25,
        TokenKind::Comma => 26,
        TokenKind::Semicolon => 27,
        TokenKind::Dot => 28,
        TokenKind::Colon => 29,
        TokenKind::Question => 30,
        TokenKind::Arrow => 31,
        TokenKind::Eq => 32,
        TokenKind::EqEq => 33,
        TokenKind::EqEqEq => 34,
        TokenKind::NotEq => 35,
        TokenKind::NotEqEq => 36,
        TokenKind::Lt => 37,
        TokenKind::Gt => 38,
        TokenKind::LtEq => 39,
        TokenKind::GtEq => 40,
        TokenKind::Plus => 41,
        TokenKind::Minus => 42,
        TokenKind::Star => 43,
        TokenKind::StarStar => 44,
        TokenKind::Slash => 45,
        TokenKind::Percent => 46,
        TokenKind::Bang => 47,
        TokenKind::AndAnd => 48,
        TokenKind::OrOr => 49,
        TokenKind::PlusPlus => 50,
        TokenKind::MinusMinus => 51,
        TokenKind::PlusEq => 52,
        TokenKind::MinusEq => 53,
        TokenKind::StarEq => 54,
        TokenKind::SlashEq => 55,
        TokenKind::PercentEq => 56,
        TokenKind::Eof => 57,
    }
}

/// Keywords that begin a statement.
pub const STMT_START: TokenSet = TokenSet::new()
    .with(TokenKind::Var)
    .with(TokenKind::Let)
    .with(TokenKind::Const)
    .with(TokenKind::Function)
    .with(TokenKind::If)
    .with(TokenKind::For)
    .with(TokenKind::While)
    .with(TokenKind::Return)
    .with(TokenKind::Break)
    .with(TokenKind::Continue);

/// Skip to the start of the next statement.
///
/// Stops after a `;`, before a `}` that closes the enclosing block, before a
/// statement keyword that begins a new line, or at `Eof`. Balanced `{ }`
/// groups are skipped whole. Always consumes at least one token when the
/// error left the cursor at `start`, so a token no rule accepts cannot
/// stall the parser.
pub fn synchronize(cursor: &mut Cursor<'_>, start: usize) {
    let mut depth = 0usize;
    if cursor.position() == start && !cursor.is_at_end() {
        match cursor.advance().kind {
            TokenKind::Semicolon => return,
            TokenKind::LBrace => depth = 1,
            _ => {}
        }
    }
    loop {
        let kind = cursor.current_kind();
        match kind {
            TokenKind::Eof => return,
            TokenKind::RBrace if depth == 0 => return,
            TokenKind::Semicolon if depth == 0 => {
                cursor.advance();
                return;
            }
            _ if depth == 0 && STMT_START.contains(kind) && cursor.newline_before() => return,
            TokenKind::LBrace => {
                depth += 1;
                cursor.advance();
            }
            TokenKind::RBrace => {
                depth -= 1;
                cursor.advance();
            }
            _ => {
                cursor.advance();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoist_ir::StringInterner;
    use hoist_lexer::lex;

    fn sync_from(source: &str, skip: usize) -> TokenKind {
        let interner = StringInterner::new();
        let output = lex(source, &interner);
        let mut cursor = Cursor::new(&output.tokens, &interner);
        for _ in 0..skip {
            cursor.advance();
        }
        let start = cursor.position();
        synchronize(&mut cursor, start);
        cursor.current_kind()
    }

    #[test]
    fn test_token_set() {
        assert!(STMT_START.contains(TokenKind::Let));
        assert!(!STMT_START.contains(TokenKind::Plus));
        assert!(!TokenSet::new().contains(TokenKind::Eof));
    }

    #[test]
    fn test_stops_after_semicolon() {
        assert_eq!(sync_from("1 + ; let", 2), TokenKind::Let);
    }

    #[test]
    fn test_stops_before_closing_brace() {
        assert_eq!(sync_from("{ a b }", 2), TokenKind::RBrace);
    }

    #[test]
    fn test_stops_at_keyword_on_new_line() {
        assert_eq!(sync_from("x = = 2\nlet y = 1", 2), TokenKind::Let);
    }

    #[test]
    fn test_always_makes_progress() {
        // a stray `)` at the error position is skipped
        assert_eq!(sync_from(")\nlet", 0), TokenKind::Let);
    }

    #[test]
    fn test_skips_balanced_braces() {
        assert_eq!(sync_from("f ( ) { a; b; }\nlet x", 0), TokenKind::Let);
    }

    #[test]
    fn test_reaches_eof() {
        assert_eq!(sync_from("a b c", 0), TokenKind::Eof);
    }
}
