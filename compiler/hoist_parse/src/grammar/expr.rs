//! Expression parsing.
//!
//! Precedence, lowest to highest:
//!
//! | Level | Operators |
//! |-------|-----------|
//! | assignment | `=` `+=` `-=` `*=` `/=` `%=` (right-assoc), arrows |
//! | conditional | `? :` |
//! | logical or | `\|\|` |
//! | logical and | `&&` |
//! | equality | `===` `!==` `==` `!=` |
//! | relational | `<` `<=` `>` `>=` |
//! | additive | `+` `-` |
//! | multiplicative | `*` `/` `%` |
//! | exponent | `**` (right-assoc) |
//! | unary | `!` `-` `+` `typeof` `++x` `--x` |
//! | postfix | `x++` `x--` |
//! | call/member | `f()` `a.b` `a[i]` |

use hoist_diagnostic::ErrorCode;
use hoist_ir::{
    ensure_sufficient_stack, format_number, BinaryOp, ExprId, ExprKind, FunctionKind, LogicalOp,
    Property, Span, TokenKind, UnaryOp, UpdateOp,
};

use crate::{ErrorContext, ParseError, Parser};

impl Parser<'_> {
    /// Parse an expression.
    #[inline]
    pub(crate) fn parse_expression(&mut self) -> Result<ExprId, ParseError> {
        self.parse_assignment()
    }

    /// `( expression )`, as in `if` and `while` headers.
    pub(crate) fn parse_paren_expression(&mut self) -> Result<ExprId, ParseError> {
        let open = self.cursor.expect(TokenKind::LParen)?.span;
        let expr = self.parse_expression()?;
        self.cursor.expect_closing(TokenKind::RParen, open)?;
        Ok(expr)
    }

    fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span())
    }

    fn expr_span(&self, id: ExprId) -> Span {
        self.arena.expr(id).span
    }

    pub(crate) fn parse_assignment(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_assignment_inner())
    }

    fn parse_assignment_inner(&mut self) -> Result<ExprId, ParseError> {
        if self.at_arrow_function() {
            return self
                .parse_arrow_function()
                .map_err(|e| e.in_context(ErrorContext::ArrowFunction));
        }

        let target = self.parse_conditional()?;
        let op = match self.current_kind() {
            TokenKind::Eq => None,
            TokenKind::PlusEq => Some(BinaryOp::Add),
            TokenKind::MinusEq => Some(BinaryOp::Sub),
            TokenKind::StarEq => Some(BinaryOp::Mul),
            TokenKind::SlashEq => Some(BinaryOp::Div),
            TokenKind::PercentEq => Some(BinaryOp::Rem),
            _ => return Ok(target),
        };
        let op_span = self.cursor.advance().span;
        self.check_assignment_target(target, op_span)?;

        let value = self.parse_assignment()?;
        let span = self.expr_span(target).merge(self.expr_span(value));
        Ok(self
            .arena
            .alloc_expr(ExprKind::Assign { op, target, value }, span))
    }

    /// Only names, `obj.prop` and `obj[key]` can be assigned or updated.
    fn check_assignment_target(&self, target: ExprId, op_span: Span) -> Result<(), ParseError> {
        let expr = self.arena.expr(target);
        if expr.kind.is_assignment_target() {
            return Ok(());
        }
        Err(ParseError::new(
            ErrorCode::E1005,
            "invalid assignment target",
            expr.span,
        )
        .with_label("cannot assign to this expression")
        .with_related(op_span, "assignment here"))
    }

    fn at_arrow_function(&self) -> bool {
        match self.current_kind() {
            TokenKind::Ident(_) => self.cursor.peek_kind(1) == TokenKind::Arrow,
            TokenKind::LParen => self.cursor.paren_starts_arrow(),
            _ => false,
        }
    }

    fn parse_conditional(&mut self) -> Result<ExprId, ParseError> {
        let test = self.parse_logical_or()?;
        if !self.eat(TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.parse_assignment()?;
        self.cursor.expect(TokenKind::Colon)?;
        let alternate = self.parse_assignment()?;
        let span = self.expr_span(test).merge(self.expr_span(alternate));
        Ok(self.arena.alloc_expr(
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            },
            span,
        ))
    }

    fn parse_logical_or(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_logical_and()?;
        while self.eat(TokenKind::OrOr) {
            let right = self.parse_logical_and()?;
            left = self.alloc_logical(LogicalOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_equality()?;
        while self.eat(TokenKind::AndAnd) {
            let right = self.parse_equality()?;
            left = self.alloc_logical(LogicalOp::And, left, right);
        }
        Ok(left)
    }

    fn alloc_logical(&mut self, op: LogicalOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self.expr_span(left).merge(self.expr_span(right));
        self.arena
            .alloc_expr(ExprKind::Logical { op, left, right }, span)
    }

    fn parse_equality(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_relational()?;
        while let Some(op) = self.match_equality_op() {
            self.cursor.advance();
            let right = self.parse_relational()?;
            left = self.alloc_binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.match_relational_op() {
            self.cursor.advance();
            let right = self.parse_additive()?;
            left = self.alloc_binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.match_additive_op() {
            self.cursor.advance();
            let right = self.parse_multiplicative()?;
            left = self.alloc_binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_exponent()?;
        while let Some(op) = self.match_multiplicative_op() {
            self.cursor.advance();
            let right = self.parse_exponent()?;
            left = self.alloc_binary(op, left, right);
        }
        Ok(left)
    }

    /// `a ** b ** c` groups as `a ** (b ** c)`. A unary operator directly
    /// before `**` is ambiguous (`-2 ** 2`) and must be parenthesized.
    fn parse_exponent(&mut self) -> Result<ExprId, ParseError> {
        let unary_start = self.match_unary_op().is_some();
        let base = self.parse_unary()?;
        if !self.check(TokenKind::StarStar) {
            return Ok(base);
        }
        if unary_start {
            return Err(ParseError::new(
                ErrorCode::E1001,
                "unary operator used immediately before `**`",
                self.expr_span(base),
            )
            .with_label("parenthesize this operand")
            .with_related(self.current_span(), "exponent operator here")
            .with_help("write `(-x) ** y` or `-(x ** y)`"));
        }
        self.cursor.advance();
        let exponent = self.parse_exponent()?;
        Ok(self.alloc_binary(BinaryOp::Pow, base, exponent))
    }

    fn alloc_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self.expr_span(left).merge(self.expr_span(right));
        self.arena
            .alloc_expr(ExprKind::Binary { op, left, right }, span)
    }

    fn match_equality_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::EqEqEq => Some(BinaryOp::StrictEq),
            TokenKind::NotEqEq => Some(BinaryOp::StrictNotEq),
            TokenKind::EqEq => Some(BinaryOp::LooseEq),
            TokenKind::NotEq => Some(BinaryOp::LooseNotEq),
            _ => None,
        }
    }

    fn match_relational_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            _ => None,
        }
    }

    fn match_additive_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        }
    }

    fn match_multiplicative_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Rem),
            _ => None,
        }
    }

    fn match_unary_op(&self) -> Option<UnaryOp> {
        match self.current_kind() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            _ => None,
        }
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_unary_inner())
    }

    fn parse_unary_inner(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();

        if let Some(op) = self.match_unary_op() {
            self.cursor.advance();
            let operand = self.parse_unary()?;
            let span = self.span_from(start);
            return Ok(self.arena.alloc_expr(ExprKind::Unary { op, operand }, span));
        }

        let update = match self.current_kind() {
            TokenKind::PlusPlus => Some(UpdateOp::Increment),
            TokenKind::MinusMinus => Some(UpdateOp::Decrement),
            _ => None,
        };
        if let Some(op) = update {
            self.cursor.advance();
            let target = self.parse_unary()?;
            self.check_assignment_target(target, start)?;
            let span = self.span_from(start);
            return Ok(self.arena.alloc_expr(
                ExprKind::Update {
                    op,
                    prefix: true,
                    target,
                },
                span,
            ));
        }

        self.parse_postfix()
    }

    /// `x++` / `x--`. A line break before the operator ends the expression
    /// instead, so `a\n++b` is two statements.
    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let target = self.parse_call()?;
        let op = match self.current_kind() {
            TokenKind::PlusPlus => UpdateOp::Increment,
            TokenKind::MinusMinus => UpdateOp::Decrement,
            _ => return Ok(target),
        };
        if self.cursor.newline_before() {
            return Ok(target);
        }
        let op_span = self.cursor.advance().span;
        self.check_assignment_target(target, op_span)?;
        let span = self.expr_span(target).merge(op_span);
        Ok(self.arena.alloc_expr(
            ExprKind::Update {
                op,
                prefix: false,
                target,
            },
            span,
        ))
    }

    /// Calls, member access and indexing, left to right.
    fn parse_call(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let start = self.expr_span(expr);
            match self.current_kind() {
                TokenKind::Dot => {
                    self.cursor.advance();
                    let property = self.cursor.expect_property_name()?;
                    let span = self.span_from(start);
                    expr = self
                        .arena
                        .alloc_expr(ExprKind::Member { object: expr, property }, span);
                }
                TokenKind::LBracket => {
                    let open = self.cursor.advance().span;
                    let index = self
                        .parse_expression()
                        .and_then(|index| {
                            self.cursor.expect_closing(TokenKind::RBracket, open)?;
                            Ok(index)
                        })
                        .map_err(|e| e.in_context(ErrorContext::IndexExpression))?;
                    let span = self.span_from(start);
                    expr = self
                        .arena
                        .alloc_expr(ExprKind::Index { object: expr, index }, span);
                }
                TokenKind::LParen => {
                    let open = self.cursor.advance().span;
                    let args = self
                        .parse_comma_list(TokenKind::RParen, open)
                        .map_err(|e| e.in_context(ErrorContext::CallArguments))?;
                    let args = self.arena.alloc_expr_list(args);
                    let span = self.span_from(start);
                    expr = self
                        .arena
                        .alloc_expr(ExprKind::Call { callee: expr, args }, span);
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Comma-separated expressions up to `close`, which is consumed. A
    /// trailing comma is allowed.
    fn parse_comma_list(&mut self, close: TokenKind, open: Span) -> Result<Vec<ExprId>, ParseError> {
        let mut items = Vec::new();
        while !self.check(close) {
            items.push(self.parse_assignment()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect_closing(close, open)?;
        Ok(items)
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = *self.cursor.current();
        let kind = match token.kind {
            TokenKind::Number(_) => ExprKind::Number(token.kind.as_number().unwrap_or(f64::NAN)),
            TokenKind::Str(value) => ExprKind::Str(value),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Null => ExprKind::Null,
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::Template(raw) => {
                self.cursor.advance();
                return self
                    .parse_template(raw, token.span)
                    .map_err(|e| e.in_context(ErrorContext::TemplateLiteral));
            }
            TokenKind::LParen => {
                return self.parse_paren_expression();
            }
            TokenKind::LBracket => {
                let open = self.cursor.advance().span;
                let items = self
                    .parse_comma_list(TokenKind::RBracket, open)
                    .map_err(|e| e.in_context(ErrorContext::ArrayLiteral))?;
                let items = self.arena.alloc_expr_list(items);
                let span = self.span_from(open);
                return Ok(self.arena.alloc_expr(ExprKind::Array(items), span));
            }
            TokenKind::LBrace => {
                return self
                    .parse_object()
                    .map_err(|e| e.in_context(ErrorContext::ObjectLiteral));
            }
            TokenKind::Function => {
                let function = self
                    .parse_function(FunctionKind::Expression)
                    .map_err(|e| e.in_context(ErrorContext::FunctionExpression))?;
                let span = self.span_from(token.span);
                return Ok(self.arena.alloc_expr(ExprKind::Function(function), span));
            }
            _ => return Err(self.expected_expression()),
        };
        self.cursor.advance();
        Ok(self.arena.alloc_expr(kind, token.span))
    }

    #[cold]
    fn expected_expression(&self) -> ParseError {
        let found = self.current_kind();
        let err = ParseError::new(
            ErrorCode::E1002,
            format!("expected expression, found {}", found.display_name()),
            self.current_span(),
        )
        .with_label("expected an expression here");
        if found == TokenKind::Eof {
            err.with_help("the input ended in the middle of an expression")
        } else {
            err
        }
    }

    /// `{ key: value, shorthand, method() { ... } }`
    fn parse_object(&mut self) -> Result<ExprId, ParseError> {
        let open = self.cursor.expect(TokenKind::LBrace)?.span;
        let mut properties = Vec::new();

        while !self.check(TokenKind::RBrace) {
            properties.push(self.parse_property()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect_closing(TokenKind::RBrace, open)?;

        let properties = self.arena.alloc_properties(properties);
        let span = self.span_from(open);
        Ok(self.arena.alloc_expr(ExprKind::Object(properties), span))
    }

    fn parse_property(&mut self) -> Result<Property, ParseError> {
        let start = self.current_span();
        let key_token = *self.cursor.current();
        let key = match key_token.kind {
            TokenKind::Str(value) => {
                self.cursor.advance();
                value
            }
            TokenKind::Number(_) => {
                self.cursor.advance();
                let value = key_token.kind.as_number().unwrap_or(f64::NAN);
                self.interner().intern(&format_number(value))
            }
            _ => self.cursor.expect_property_name()?,
        };

        let value = match self.current_kind() {
            TokenKind::Colon => {
                self.cursor.advance();
                self.parse_assignment()?
            }
            TokenKind::LParen => {
                let function = self.parse_method(start)?;
                let span = self.span_from(start);
                self.arena.alloc_expr(ExprKind::Function(function), span)
            }
            _ if matches!(key_token.kind, TokenKind::Ident(_)) => {
                self.arena.alloc_expr(ExprKind::Ident(key), key_token.span)
            }
            found => {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    format!(
                        "unexpected token: expected `:`, found {}",
                        found.display_name()
                    ),
                    self.current_span(),
                )
                .with_label("expected `:` after the property name"))
            }
        };

        Ok(Property {
            key,
            value,
            span: self.span_from(start),
        })
    }
}
