//! Recursive descent parser for hoist scripts.
//!
//! Produces a flat AST in an [`ExprArena`]. Statement-level errors are
//! collected and the parser resynchronizes, so a single run reports every
//! independent syntax error.

mod cursor;
mod error;
mod grammar;
mod recovery;

pub use cursor::Cursor;
pub use error::{ErrorContext, ParseError};
pub use recovery::{synchronize, TokenSet};

use hoist_diagnostic::ErrorCode;
use hoist_ir::{ExprArena, Module, Span, StmtId, StringInterner, TokenKind, TokenList};
use tracing::debug;

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ExprArena,
    /// Non-fatal errors: the statement still parsed, but is not allowed here.
    errors: Vec<ParseError>,
    /// Enclosing function bodies; `return` needs at least one.
    function_depth: u32,
    /// Enclosing loops within the current function; `break` and `continue`
    /// need at least one.
    loop_depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
            arena: ExprArena::new(),
            errors: Vec::new(),
            function_depth: 0,
            loop_depth: 0,
        }
    }

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn eat(&mut self, kind: TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    #[inline]
    fn interner(&self) -> &'a StringInterner {
        self.cursor.interner()
    }

    /// Parse the whole token stream as a script.
    pub fn parse_module(mut self) -> ParseOutput {
        let mut body = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.parse_statement_recovering(&mut errors) {
                body.push(stmt);
            }
        }

        let body = self.arena.alloc_stmt_list(body);
        errors.append(&mut self.errors);
        errors.sort_by_key(|e| e.span.start);

        ParseOutput {
            module: Module {
                arena: self.arena,
                body,
            },
            errors,
        }
    }

    /// Parse one statement; on failure, record the error and resynchronize.
    fn parse_statement_recovering(&mut self, errors: &mut Vec<ParseError>) -> Option<StmtId> {
        let start = self.cursor.position();
        match self.parse_statement() {
            Ok(stmt) => Some(stmt),
            Err(e) => {
                debug!(code = %e.code, "parse error, resynchronizing");
                errors.push(e);
                synchronize(&mut self.cursor, start);
                None
            }
        }
    }

    /// Record an error that does not stop the current rule.
    fn report(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Consume a statement terminator.
    ///
    /// A `;` may be left out before `}`, at the end of input, or when the
    /// next token starts a new line.
    fn consume_semicolon(&mut self) -> Result<(), ParseError> {
        if self.eat(TokenKind::Semicolon)
            || self.check(TokenKind::RBrace)
            || self.is_at_end()
            || self.cursor.newline_before()
        {
            return Ok(());
        }
        Err(ParseError::new(
            ErrorCode::E1001,
            format!(
                "unexpected token: expected `;`, found {}",
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
        .with_label("expected `;` or a line break before this")
        .with_help("put statements on separate lines or separate them with `;`"))
    }
}

/// Parsed module plus every syntax error, in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseOutput {
    pub module: Module,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse a token list into a module.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> ParseOutput {
    let output = Parser::new(tokens, interner).parse_module();
    debug!(
        statements = output.module.body.len(),
        errors = output.errors.len(),
        "parsed module"
    );
    output
}

/// Lex and parse in one step. Lexer errors come first, as parse errors.
pub fn parse_source(source: &str, interner: &StringInterner) -> ParseOutput {
    let lexed = hoist_lexer::lex(source, interner);
    let mut output = parse(&lexed.tokens, interner);
    if lexed.has_errors() {
        let mut errors: Vec<ParseError> = lexed.errors.iter().map(ParseError::from).collect();
        errors.append(&mut output.errors);
        output.errors = errors;
    }
    output
}
