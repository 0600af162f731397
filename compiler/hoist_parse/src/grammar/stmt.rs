//! Statement parsing: declarations, control flow and blocks.

use hoist_diagnostic::ErrorCode;
use hoist_ir::{
    ensure_sufficient_stack, DeclKind, Declarator, FunctionKind, Span, StmtId, StmtKind,
    StmtRange, TokenKind,
};

use crate::{ErrorContext, ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_statement(&mut self) -> Result<StmtId, ParseError> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<StmtId, ParseError> {
        match self.current_kind() {
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let stmt = self.parse_declaration()?;
                self.consume_semicolon()?;
                Ok(stmt)
            }
            TokenKind::Function => self.parse_function_declaration(),
            TokenKind::LBrace => {
                let start = self.current_span();
                let body = self.parse_block()?;
                Ok(self.alloc_stmt(StmtKind::Block(body), start))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break | TokenKind::Continue => self.parse_jump(),
            TokenKind::Semicolon => {
                let span = self.cursor.advance().span;
                Ok(self.arena.alloc_stmt(StmtKind::Empty, span))
            }
            _ => {
                let start = self.current_span();
                let expr = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(self.alloc_stmt(StmtKind::Expr(expr), start))
            }
        }
    }

    /// Allocate a statement spanning from `start` to the last consumed token.
    fn alloc_stmt(&mut self, kind: StmtKind, start: Span) -> StmtId {
        let span = start.merge(self.previous_span());
        self.arena.alloc_stmt(kind, span)
    }

    /// `var|let|const name (= init)? (, name (= init)?)*`, without the
    /// terminator so `for` headers can reuse it.
    fn parse_declaration(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        let kind = match self.cursor.advance().kind {
            TokenKind::Let => DeclKind::Let,
            TokenKind::Const => DeclKind::Const,
            _ => DeclKind::Var,
        };

        let mut declarators = Vec::new();
        loop {
            let declarator = self
                .parse_declarator(kind)
                .map_err(|e| e.in_context(ErrorContext::Declaration))?;
            declarators.push(declarator);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        let declarators = self.arena.alloc_declarators(declarators);
        Ok(self.alloc_stmt(StmtKind::Declaration { kind, declarators }, start))
    }

    fn parse_declarator(&mut self, kind: DeclKind) -> Result<Declarator, ParseError> {
        let name_span = self.current_span();
        let name = self.cursor.expect_ident()?;
        let init = if self.eat(TokenKind::Eq) {
            Some(self.parse_assignment()?)
        } else {
            None
        };
        let span = name_span.merge(self.previous_span());

        if kind == DeclKind::Const && init.is_none() {
            let name_text = self.interner().lookup(name);
            return Err(ParseError::new(
                ErrorCode::E1006,
                format!("missing initializer in const declaration of `{name_text}`"),
                span,
            )
            .with_label("const declared without a value")
            .with_help(format!("give it a value: `const {name_text} = ...`"))
            .with_help("or use `let` if the value is assigned later"));
        }

        Ok(Declarator { name, init, span })
    }

    fn parse_function_declaration(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        let function = self
            .parse_function(FunctionKind::Declaration)
            .map_err(|e| e.in_context(ErrorContext::FunctionDeclaration))?;
        Ok(self.alloc_stmt(StmtKind::Function(function), start))
    }

    /// `{ statements }`. Errors inside the block are recorded and skipped
    /// so the rest of the block still parses.
    pub(crate) fn parse_block(&mut self) -> Result<StmtRange, ParseError> {
        let open = self.cursor.expect(TokenKind::LBrace)?.span;
        let mut stmts = Vec::new();
        let mut errors = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if let Some(stmt) = self.parse_statement_recovering(&mut errors) {
                stmts.push(stmt);
            }
        }
        self.errors.append(&mut errors);

        self.cursor
            .expect_closing(TokenKind::RBrace, open)
            .map_err(|e| e.in_context(ErrorContext::Block))?;
        Ok(self.arena.alloc_stmt_list(stmts))
    }

    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.advance().span;
        let test = self
            .parse_paren_expression()
            .map_err(|e| e.in_context(ErrorContext::IfStatement))?;
        let consequent = self.parse_statement()?;
        let alternate = if self.eat(TokenKind::Else) {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self.alloc_stmt(
            StmtKind::If {
                test,
                consequent,
                alternate,
            },
            start,
        ))
    }

    fn parse_while(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.advance().span;
        let test = self
            .parse_paren_expression()
            .map_err(|e| e.in_context(ErrorContext::WhileLoop))?;
        let body = self.parse_loop_body()?;
        Ok(self.alloc_stmt(StmtKind::While { test, body }, start))
    }

    /// `for (init; test; update) body` or `for (kind? name of iterable) body`.
    fn parse_for(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.advance().span;
        let open = self
            .cursor
            .expect(TokenKind::LParen)
            .map_err(|e| e.in_context(ErrorContext::ForLoop))?
            .span;

        if self.at_for_of_head() {
            return self.parse_for_of(start, open);
        }

        let init = match self.current_kind() {
            TokenKind::Semicolon => None,
            TokenKind::Var | TokenKind::Let | TokenKind::Const => Some(
                self.parse_declaration()
                    .map_err(|e| e.in_context(ErrorContext::ForLoop))?,
            ),
            _ => {
                let expr_start = self.current_span();
                let expr = self
                    .parse_expression()
                    .map_err(|e| e.in_context(ErrorContext::ForLoop))?;
                Some(self.alloc_stmt(StmtKind::Expr(expr), expr_start))
            }
        };
        self.cursor
            .expect(TokenKind::Semicolon)
            .map_err(|e| e.in_context(ErrorContext::ForLoop))?;

        let test = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(
                self.parse_expression()
                    .map_err(|e| e.in_context(ErrorContext::ForLoop))?,
            )
        };
        self.cursor
            .expect(TokenKind::Semicolon)
            .map_err(|e| e.in_context(ErrorContext::ForLoop))?;

        let update = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(
                self.parse_expression()
                    .map_err(|e| e.in_context(ErrorContext::ForLoop))?,
            )
        };
        self.cursor
            .expect_closing(TokenKind::RParen, open)
            .map_err(|e| e.in_context(ErrorContext::ForLoop))?;

        let body = self.parse_loop_body()?;
        Ok(self.alloc_stmt(
            StmtKind::For {
                init,
                test,
                update,
                body,
            },
            start,
        ))
    }

    /// After `for (`: `name of` or `var|let|const name of`.
    fn at_for_of_head(&self) -> bool {
        let is_ident = |kind: TokenKind| matches!(kind, TokenKind::Ident(_));
        match self.current_kind() {
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                is_ident(self.cursor.peek_kind(1)) && self.cursor.peek_kind(2) == TokenKind::Of
            }
            kind => is_ident(kind) && self.cursor.peek_kind(1) == TokenKind::Of,
        }
    }

    fn parse_for_of(&mut self, start: Span, open: Span) -> Result<StmtId, ParseError> {
        let kind = match self.current_kind() {
            TokenKind::Var => Some(DeclKind::Var),
            TokenKind::Let => Some(DeclKind::Let),
            TokenKind::Const => Some(DeclKind::Const),
            _ => None,
        };
        if kind.is_some() {
            self.cursor.advance();
        }
        let binding = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::Of)?;
        let iterable = self
            .parse_expression()
            .map_err(|e| e.in_context(ErrorContext::ForLoop))?;
        self.cursor
            .expect_closing(TokenKind::RParen, open)
            .map_err(|e| e.in_context(ErrorContext::ForLoop))?;

        let body = self.parse_loop_body()?;
        Ok(self.alloc_stmt(
            StmtKind::ForOf {
                kind,
                binding,
                iterable,
                body,
            },
            start,
        ))
    }

    fn parse_loop_body(&mut self) -> Result<StmtId, ParseError> {
        self.loop_depth += 1;
        let body = self.parse_statement();
        self.loop_depth -= 1;
        body
    }

    fn parse_return(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.advance().span;
        if self.function_depth == 0 {
            self.report(
                ParseError::new(
                    ErrorCode::E1008,
                    "`return` outside of a function",
                    start,
                )
                .with_label("not inside a function body"),
            );
        }

        // a line break after `return` ends the statement
        let value = if self.check(TokenKind::Semicolon)
            || self.check(TokenKind::RBrace)
            || self.is_at_end()
            || self.cursor.newline_before()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;
        Ok(self.alloc_stmt(StmtKind::Return(value), start))
    }

    fn parse_jump(&mut self) -> Result<StmtId, ParseError> {
        let token = self.cursor.advance();
        let (kind, keyword) = if token.kind == TokenKind::Break {
            (StmtKind::Break, "break")
        } else {
            (StmtKind::Continue, "continue")
        };
        if self.loop_depth == 0 {
            self.report(
                ParseError::new(
                    ErrorCode::E1007,
                    format!("`{keyword}` outside of a loop"),
                    token.span,
                )
                .with_label("not inside a loop body"),
            );
        }
        self.consume_semicolon()?;
        Ok(self.alloc_stmt(kind, token.span))
    }
}
