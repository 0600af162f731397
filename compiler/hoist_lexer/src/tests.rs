use super::*;
use hoist_ir::Name;
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> (StringInterner, Vec<TokenKind>) {
    let interner = StringInterner::new();
    let output = lex(source, &interner);
    assert!(output.errors.is_empty(), "unexpected errors: {:?}", output.errors);
    let kinds = output.tokens.kinds();
    (interner, kinds)
}

fn errors(source: &str) -> Vec<LexError> {
    let interner = StringInterner::new();
    lex(source, &interner).errors
}

#[test]
fn test_declaration() {
    let (interner, kinds) = kinds("const radius = 2.5;");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Const,
            TokenKind::Ident(interner.intern("radius")),
            TokenKind::Eq,
            TokenKind::number(2.5),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_arrow_function() {
    let (interner, kinds) = kinds("(a, b) => a ** b");
    let a = interner.intern("a");
    let b = interner.intern("b");
    assert_eq!(
        kinds,
        vec![
            TokenKind::LParen,
            TokenKind::Ident(a),
            TokenKind::Comma,
            TokenKind::Ident(b),
            TokenKind::RParen,
            TokenKind::Arrow,
            TokenKind::Ident(a),
            TokenKind::StarStar,
            TokenKind::Ident(b),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_identifiers_with_dollar_and_underscore() {
    let (interner, kinds) = kinds("$el _private");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident(interner.intern("$el")),
            TokenKind::Ident(interner.intern("_private")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_string_escapes_are_cooked() {
    let (interner, kinds) = kinds(r#"'it\'s' "tab\there""#);
    assert_eq!(
        kinds,
        vec![
            TokenKind::Str(interner.intern("it's")),
            TokenKind::Str(interner.intern("tab\there")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_template_keeps_raw_body() {
    let (interner, kinds) = kinds("`Hi ${name}\\n`");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Template(interner.intern("Hi ${name}\\n")),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_numbers() {
    let (_, kinds) = kinds("0 42 2.5 .5 1e3 0xff");
    let values: Vec<f64> = kinds.iter().filter_map(|k| k.as_number()).collect();
    assert_eq!(values, vec![0.0, 42.0, 2.5, 0.5, 1000.0, 255.0]);
}

#[test]
fn test_newline_flag() {
    let interner = StringInterner::new();
    let output = lex("let a = 1\nlet b = 2", &interner);
    let flagged: Vec<bool> = output.tokens.iter().map(Token::has_newline_before).collect();
    // let a = 1 \n let b = 2 Eof
    assert_eq!(
        flagged,
        vec![false, false, false, false, true, false, false, false, false]
    );
}

#[test]
fn test_newline_inside_block_comment_sets_flag() {
    let interner = StringInterner::new();
    let output = lex("return /* a\n b */ x", &interner);
    assert!(output.tokens[1].has_newline_before());
    assert!(output.tokens[1].flags.contains(TokenFlags::TRIVIA_BEFORE));
}

#[test]
fn test_line_comment_then_eof() {
    let (_, kinds) = kinds("// only a comment");
    assert_eq!(kinds, vec![TokenKind::Eof]);
}

#[test]
fn test_spans() {
    let interner = StringInterner::new();
    let output = lex("let  x", &interner);
    assert_eq!(output.tokens[0].span, Span::new(0, 3));
    assert_eq!(output.tokens[1].span, Span::new(5, 6));
    assert_eq!(output.tokens[2].span, Span::point(6));
}

#[test]
fn test_lex_at_shifts_spans() {
    let interner = StringInterner::new();
    let output = lex_at("a + b", 100, &interner);
    assert_eq!(output.tokens[0].span, Span::new(100, 101));
    assert_eq!(output.tokens[2].span, Span::new(104, 105));
    assert_eq!(output.tokens[3].span, Span::point(105));
}

#[test]
fn test_invalid_character_recovers() {
    let interner = StringInterner::new();
    let output = lex("a # b", &interner);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(
        output.errors[0].kind,
        LexErrorKind::InvalidCharacter { ch: '#' }
    );
    assert_eq!(output.errors[0].span, Span::new(2, 3));
    assert_eq!(output.tokens.len(), 3);
}

#[test]
fn test_unterminated_string() {
    let errs = errors("let s = 'abc\nlet t = 1");
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].kind, LexErrorKind::UnterminatedString);
    assert_eq!(errs[0].code(), hoist_diagnostic::ErrorCode::E0001);
}

#[test]
fn test_unterminated_template_and_comment() {
    assert_eq!(
        errors("`never closed")[0].kind,
        LexErrorKind::UnterminatedTemplate
    );
    assert_eq!(
        errors("x /* never closed")[0].kind,
        LexErrorKind::UnterminatedComment
    );
}

#[test]
fn test_number_glued_to_letters() {
    let interner = StringInterner::new();
    let output = lex("let w = 3px;", &interner);
    assert_eq!(
        output.errors,
        vec![LexError::new(
            Span::new(8, 11),
            LexErrorKind::InvalidNumber { text: "3px".into() }
        )]
    );
    // the suffix is not lexed as a separate identifier
    assert!(!output
        .tokens
        .kinds()
        .contains(&TokenKind::Ident(interner.intern("px"))));
}

#[test]
fn test_empty_exponent() {
    let errs = errors("1e + 2");
    assert_eq!(
        errs[0].kind,
        LexErrorKind::InvalidNumber { text: "1e".into() }
    );
}

#[test]
fn test_invalid_escape_span() {
    let errs = errors(r"x = '\u12'");
    assert_eq!(errs.len(), 1);
    // the body starts after the quote at byte 4
    assert_eq!(errs[0].span, Span::new(5, 9));
}

#[test]
fn test_keywords_are_not_names() {
    let (_, kinds) = kinds("typeof null");
    assert_eq!(kinds, vec![TokenKind::Typeof, TokenKind::Null, TokenKind::Eof]);
    assert!(!kinds.contains(&TokenKind::Ident(Name::EMPTY)));
}

// === Property tests ===

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_lexer {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn never_panics_and_ends_with_eof(source in "\\PC{0,200}") {
            let interner = StringInterner::new();
            let output = lex(&source, &interner);
            let last = output.tokens.iter().last().map(|t| t.kind);
            prop_assert_eq!(last, Some(TokenKind::Eof));
        }

        #[test]
        fn spans_stay_within_source(source in "[a-z0-9 +*/(){}\\[\\].,;'\"`$\\n=<>!&|-]{0,120}") {
            let interner = StringInterner::new();
            let output = lex(&source, &interner);
            let len = source.len() as u32;
            for token in &output.tokens {
                prop_assert!(token.span.start <= token.span.end);
                prop_assert!(token.span.end <= len);
            }
            for err in &output.errors {
                prop_assert!(err.span.end <= len);
            }
        }

        #[test]
        fn identifiers_round_trip_through_interner(name in "[a-zA-Z_$][a-zA-Z0-9_$]{0,16}") {
            let interner = StringInterner::new();
            let output = lex(&name, &interner);
            match output.tokens[0].kind {
                TokenKind::Ident(interned) => prop_assert_eq!(interner.lookup(interned), name.as_str()),
                // keywords lex as their own kinds
                other => prop_assert_ne!(other, TokenKind::Eof),
            }
        }
    }
}
