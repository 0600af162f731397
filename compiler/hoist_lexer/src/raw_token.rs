//! Raw tokens recognized by logos, before interning and escape processing.

use logos::{Lexer, Logos};

use crate::template::template_end;

fn block_comment(lex: &mut Lexer<'_, RawToken>) -> bool {
    if let Some(end) = lex.remainder().find("*/") {
        lex.bump(end + 2);
        true
    } else {
        lex.bump(lex.remainder().len());
        false
    }
}

fn template(lex: &mut Lexer<'_, RawToken>) -> bool {
    if let Some(end) = template_end(lex.remainder().as_bytes()) {
        lex.bump(end + 1);
        true
    } else {
        lex.bump(lex.remainder().len());
        false
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f\u{FEFF}]+")]
pub(crate) enum RawToken {
    // === Trivia ===
    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    /// `/* ... */`. The payload is false when the closing `*/` is missing
    /// and the comment runs to the end of the source.
    #[token("/*", block_comment)]
    BlockComment(bool),

    // === Keywords ===
    #[token("var")]
    Var,
    #[token("let")]
    Let,
    #[token("const")]
    Const,
    #[token("function")]
    Function,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("of")]
    Of,
    #[token("while")]
    While,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("typeof")]
    Typeof,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("=>")]
    Arrow,

    // === Operators ===
    #[token("===")]
    EqEqEq,
    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("!==")]
    NotEqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("++")]
    PlusPlus,
    #[token("+=")]
    PlusEq,
    #[token("+")]
    Plus,
    #[token("--")]
    MinusMinus,
    #[token("-=")]
    MinusEq,
    #[token("-")]
    Minus,
    #[token("**")]
    StarStar,
    #[token("*=")]
    StarEq,
    #[token("*")]
    Star,
    #[token("/=")]
    SlashEq,
    #[token("/")]
    Slash,
    #[token("%=")]
    PercentEq,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexNumber,

    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Number,

    /// Exponent marker with no digits after it (`1e`, `2.5e+`).
    #[regex(r"[0-9]+(\.[0-9]*)?[eE][+-]?")]
    EmptyExponent,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Str,

    #[regex(r#""([^"\\\n]|\\.)*"#)]
    #[regex(r"'([^'\\\n]|\\.)*")]
    UnterminatedStr,

    /// A template literal, including any templates nested in its holes.
    /// The payload is false when the closing backtick is missing.
    #[token("`", template)]
    Template(bool),

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
}

impl RawToken {
    pub(crate) fn is_trivia(self) -> bool {
        matches!(
            self,
            RawToken::Newline | RawToken::LineComment | RawToken::BlockComment(true)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(source: &str) -> Vec<RawToken> {
        RawToken::lexer(source).filter_map(Result::ok).collect()
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            raw("a === b !== c => d **= e"),
            vec![
                RawToken::Ident,
                RawToken::EqEqEq,
                RawToken::Ident,
                RawToken::NotEqEq,
                RawToken::Ident,
                RawToken::Arrow,
                RawToken::Ident,
                RawToken::StarStar,
                RawToken::Eq,
                RawToken::Ident,
            ]
        );
    }

    #[test]
    fn test_keywords_beat_identifiers_only_on_exact_match() {
        assert_eq!(
            raw("let letter const constant"),
            vec![
                RawToken::Let,
                RawToken::Ident,
                RawToken::Const,
                RawToken::Ident
            ]
        );
    }

    #[test]
    fn test_comments_and_newlines() {
        assert_eq!(
            raw("a // note\n/* block\n */ b"),
            vec![
                RawToken::Ident,
                RawToken::LineComment,
                RawToken::Newline,
                RawToken::BlockComment(true),
                RawToken::Ident,
            ]
        );
    }

    #[test]
    fn test_unterminated_literals() {
        assert_eq!(raw("'abc"), vec![RawToken::UnterminatedStr]);
        assert_eq!(raw("`abc"), vec![RawToken::Template(false)]);
        assert_eq!(raw("/* abc"), vec![RawToken::BlockComment(false)]);
    }

    #[test]
    fn test_template_with_nested_template() {
        assert_eq!(
            raw("`a ${`b ${c}`}` x"),
            vec![RawToken::Template(true), RawToken::Ident]
        );
        assert_eq!(raw("`a ${`b ${c}`}"), vec![RawToken::Template(false)]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            raw("1 2.5 .5 1e3 0xff 1e"),
            vec![
                RawToken::Number,
                RawToken::Number,
                RawToken::Number,
                RawToken::Number,
                RawToken::HexNumber,
                RawToken::EmptyExponent,
            ]
        );
    }
}
