//! Function declarations, function expressions, arrows and object methods.

use hoist_ir::{
    ExprId, ExprKind, FunctionBody, FunctionDef, FunctionId, FunctionKind, Name, Span, TokenKind,
};
use smallvec::SmallVec;

use crate::{ErrorContext, ParseError, Parser};

type Params = SmallVec<[Name; 4]>;

impl Parser<'_> {
    /// `function name? (params) { body }`, starting at `function`.
    ///
    /// Declarations must be named; expressions may be anonymous.
    pub(crate) fn parse_function(&mut self, kind: FunctionKind) -> Result<FunctionId, ParseError> {
        let start = self.cursor.expect(TokenKind::Function)?.span;
        let name = if kind == FunctionKind::Declaration || self.cursor.check_ident() {
            Some(self.cursor.expect_ident()?)
        } else {
            None
        };
        let params = self.parse_params()?;
        let body = self.parse_function_block()?;
        Ok(self.alloc_function(name, params, FunctionBody::Block(body), kind, start))
    }

    /// Shorthand method `key(params) { body }` in an object literal.
    pub(crate) fn parse_method(&mut self, start: Span) -> Result<FunctionId, ParseError> {
        let params = self.parse_params()?;
        let body = self.parse_function_block()?;
        Ok(self.alloc_function(
            None,
            params,
            FunctionBody::Block(body),
            FunctionKind::Expression,
            start,
        ))
    }

    /// `x => body` or `(a, b) => body`.
    pub(crate) fn parse_arrow_function(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let params = if let TokenKind::Ident(name) = self.current_kind() {
            self.cursor.advance();
            let mut params = Params::new();
            params.push(name);
            params
        } else {
            self.parse_params()?
        };
        self.cursor.expect(TokenKind::Arrow)?;

        let body = if self.check(TokenKind::LBrace) {
            FunctionBody::Block(self.parse_function_block()?)
        } else {
            FunctionBody::Expr(self.in_function_body(Self::parse_assignment)?)
        };
        let function = self.alloc_function(None, params, body, FunctionKind::Arrow, start);
        let span = start.merge(self.previous_span());
        Ok(self.arena.alloc_expr(ExprKind::Function(function), span))
    }

    /// `( name, name, ... )`. Trailing comma allowed, duplicates rejected.
    fn parse_params(&mut self) -> Result<Params, ParseError> {
        let open = self
            .cursor
            .expect(TokenKind::LParen)
            .map_err(|e| e.in_context(ErrorContext::Parameters))?
            .span;
        let mut params = Params::new();
        let mut spans: SmallVec<[Span; 4]> = SmallVec::new();

        while !self.check(TokenKind::RParen) {
            let span = self.current_span();
            let name = self
                .cursor
                .expect_ident()
                .map_err(|e| e.in_context(ErrorContext::Parameters))?;
            if let Some(pos) = params.iter().position(|&p| p == name) {
                let text = self.interner().lookup(name);
                return Err(ParseError::new(
                    hoist_diagnostic::ErrorCode::E1001,
                    format!("duplicate parameter name `{text}`"),
                    span,
                )
                .with_label("declared again here")
                .with_related(spans[pos], "first declared here")
                .in_context(ErrorContext::Parameters));
            }
            params.push(name);
            spans.push(span);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        self.cursor
            .expect_closing(TokenKind::RParen, open)
            .map_err(|e| e.in_context(ErrorContext::Parameters))?;
        Ok(params)
    }

    /// A function body block. `return` becomes legal; `break` and
    /// `continue` cannot reach loops outside the function.
    fn parse_function_block(&mut self) -> Result<hoist_ir::StmtRange, ParseError> {
        self.in_function_body(Self::parse_block)
    }

    fn in_function_body<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        self.function_depth += 1;
        let result = rule(self);
        self.function_depth -= 1;
        self.loop_depth = saved_loop_depth;
        result
    }

    fn alloc_function(
        &mut self,
        name: Option<Name>,
        params: Params,
        body: FunctionBody,
        kind: FunctionKind,
        start: Span,
    ) -> FunctionId {
        let span = start.merge(self.previous_span());
        self.arena.alloc_function(FunctionDef {
            name,
            params,
            body,
            kind,
            span,
        })
    }
}
