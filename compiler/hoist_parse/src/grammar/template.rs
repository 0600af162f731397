//! Template literals: cooked text chunks and `${}` holes.
//!
//! The lexer hands over the raw body. Each hole is lexed again at its file
//! offset and parsed by a nested parser that shares this parser's arena, so
//! spans and ids inside holes are indistinguishable from ordinary ones.

use hoist_diagnostic::ErrorCode;
use hoist_ir::{ExprId, ExprKind, Name, Span, TemplatePart};
use hoist_lexer::{lex_at, split_template, unescape, LexError, LexErrorKind, TemplateChunk};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `token_span` covers the whole literal, backticks included.
    pub(crate) fn parse_template(&mut self, raw: Name, token_span: Span) -> Result<ExprId, ParseError> {
        let body = self.interner().lookup(raw);
        let body_start = token_span.start + 1;

        let chunks = split_template(body).map_err(|offset| {
            let at = body_start + offset as u32;
            ParseError::from(&LexError::new(
                Span::new(at, at + 2),
                LexErrorKind::UnterminatedTemplateHole,
            ))
            .with_related(token_span, "in this template literal")
        })?;

        let mut parts = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            match chunk {
                TemplateChunk::Text(range) => {
                    let text_start = body_start + range.start as u32;
                    let cooked = unescape(&body[range]).map_err(|err| {
                        ParseError::from(&LexError::new(
                            Span::new(
                                text_start + err.range.start as u32,
                                text_start + err.range.end as u32,
                            ),
                            LexErrorKind::InvalidEscape {
                                sequence: err.sequence,
                            },
                        ))
                    })?;
                    parts.push(TemplatePart::Text(self.interner().intern(&cooked)));
                }
                TemplateChunk::Hole(range) => {
                    let hole_start = body_start + range.start as u32;
                    let hole = &body[range];
                    parts.push(TemplatePart::Expr(self.parse_template_hole(hole, hole_start)?));
                }
            }
        }

        let parts = self.arena.alloc_template(parts);
        Ok(self.arena.alloc_expr(ExprKind::Template(parts), token_span))
    }

    /// Parse the source of one hole as a single expression.
    fn parse_template_hole(&mut self, source: &str, base: u32) -> Result<ExprId, ParseError> {
        let interner = self.interner();
        let lexed = lex_at(source, base, interner);
        if let Some(err) = lexed.errors.first() {
            return Err(ParseError::from(err));
        }

        let mut nested = Parser::new(&lexed.tokens, interner);
        nested.arena = std::mem::take(&mut self.arena);
        nested.function_depth = self.function_depth;

        let result = nested.parse_expression().and_then(|expr| {
            if nested.is_at_end() {
                Ok(expr)
            } else {
                Err(ParseError::new(
                    ErrorCode::E1001,
                    format!(
                        "unexpected token: expected `}}`, found {}",
                        nested.current_kind().display_name()
                    ),
                    nested.current_span(),
                )
                .with_label("a template hole holds exactly one expression"))
            }
        });

        self.arena = nested.arena;
        self.errors.append(&mut nested.errors);
        result
    }
}
