//! Statements and loops.

use hoist_ir::{
    ensure_sufficient_stack, DeclKind, Declarator, DeclaratorRange, ExprId, ExprKind, Name, Span,
    StmtId, StmtKind, StmtRange,
};
use smallvec::SmallVec;
use tracing::trace;

use super::{Flow, Interpreter};
use crate::environment::ScopeKind;
use crate::errors::{custom, EvalResult};
use crate::operators::truthy;
use crate::Value;

/// Names a `for (let ...)` head carries from one iteration to the next.
type LoopBindings = SmallVec<[(Name, DeclKind); 2]>;

impl Interpreter<'_> {
    /// Run a statement list, stopping at the first abrupt completion.
    pub(crate) fn exec_stmts(&mut self, stmts: StmtRange) -> EvalResult<Flow> {
        let arena = self.arena;
        for &id in arena.stmt_list(stmts) {
            match self.exec_stmt(id)? {
                Flow::Normal => {}
                abrupt => return Ok(abrupt),
            }
        }
        Ok(Flow::Normal)
    }

    pub(crate) fn exec_stmt(&mut self, id: StmtId) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.exec_stmt_inner(id))
    }

    fn exec_stmt_inner(&mut self, id: StmtId) -> EvalResult<Flow> {
        let arena = self.arena;
        let stmt = arena.stmt(id);
        match &stmt.kind {
            StmtKind::Declaration { kind, declarators } => {
                self.exec_declaration(*kind, *declarators)?;
                Ok(Flow::Normal)
            }
            StmtKind::Function(function) => {
                // Hoisted at scope entry unless it sits where no statement
                // list was hoisted, such as an unbraced `if` branch.
                let def = arena.function(*function);
                if let Some(name) = def.name {
                    if !self.env.has_own(name) {
                        let value = self.make_closure(*function, Some(name));
                        self.env
                            .declare_function(name, value)
                            .map_err(|e| self.scope_error(e, def.span))?;
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::Expr(expr) => {
                self.eval_expr(*expr)?;
                Ok(Flow::Normal)
            }
            StmtKind::Block(stmts) => self.exec_block(*stmts),
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                if truthy(&self.eval_expr(*test)?) {
                    self.exec_stmt(*consequent)
                } else if let Some(alternate) = alternate {
                    self.exec_stmt(*alternate)
                } else {
                    Ok(Flow::Normal)
                }
            }
            StmtKind::While { test, body } => {
                while truthy(&self.eval_expr(*test)?) {
                    match self.exec_stmt(*body)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => self.exec_for(*init, *test, *update, *body),
            StmtKind::ForOf {
                kind,
                binding,
                iterable,
                body,
            } => self.exec_for_of(*kind, *binding, *iterable, *body, stmt.span),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(*expr)?,
                    None => Value::Undefined,
                };
                Ok(Flow::Return(value))
            }
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
            StmtKind::Empty => Ok(Flow::Normal),
        }
    }

    /// `{ ... }`: a new block scope with its own hoisted names.
    pub(crate) fn exec_block(&mut self, stmts: StmtRange) -> EvalResult<Flow> {
        self.with_scope(ScopeKind::Block, |scoped| {
            scoped.hoist_block(stmts)?;
            scoped.exec_stmts(stmts)
        })
    }

    /// Run a declaration line.
    ///
    /// `var` re-declares, which sets the hoisted binding and catches a
    /// lexical declaration of the same name in a scope between here and
    /// the function scope. `let` and `const` end their dead zone.
    fn exec_declaration(&mut self, kind: DeclKind, declarators: DeclaratorRange) -> EvalResult<()> {
        let arena = self.arena;
        for declarator in arena.declarators(declarators) {
            let Declarator { name, init, span } = *declarator;
            let value = match init {
                Some(init) => Some(self.eval_named(init, name)?),
                None => None,
            };
            let result = match kind {
                DeclKind::Var => self.env.declare(name, DeclKind::Var, value),
                DeclKind::Let | DeclKind::Const => {
                    let value = value.unwrap_or(Value::Undefined);
                    if self.env.has_own(name) {
                        self.env.initialize(name, value)
                    } else {
                        self.env.declare(name, kind, Some(value))
                    }
                }
            };
            result.map_err(|e| self.scope_error(e, span))?;
            trace!(name = self.name_str(name), ?kind, "declared");
        }
        Ok(())
    }

    /// C-style `for`.
    ///
    /// A `let` head gets a fresh copy of its bindings for every iteration,
    /// so closures created in the body each see their own counter. The
    /// update expression runs in the new iteration's scope, after the copy.
    fn exec_for(
        &mut self,
        init: Option<StmtId>,
        test: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    ) -> EvalResult<Flow> {
        self.with_scope(ScopeKind::Block, |scoped| {
            let carried = match init {
                Some(init) => scoped.exec_for_init(init)?,
                None => LoopBindings::new(),
            };

            if carried.is_empty() {
                loop {
                    if let Some(test) = test {
                        if !truthy(&scoped.eval_expr(test)?) {
                            return Ok(Flow::Normal);
                        }
                    }
                    match scoped.exec_stmt(body)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => return Ok(Flow::Normal),
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                    if let Some(update) = update {
                        scoped.eval_expr(update)?;
                    }
                }
            }

            let mut values = scoped.read_bindings(&carried)?;
            let mut first = true;
            loop {
                let (flow, next) = scoped.with_scope(ScopeKind::Block, |iteration| {
                    iteration.run_iteration(&carried, values, !first, test, update, body)
                })?;
                first = false;
                values = next;
                match flow {
                    Flow::Normal | Flow::Continue => {}
                    Flow::Break => return Ok(Flow::Normal),
                    ret @ Flow::Return(_) => return Ok(ret),
                }
            }
        })
    }

    /// One iteration of a `for (let ...)` loop, inside its own scope.
    /// Returns how the body finished and the values to carry forward.
    fn run_iteration(
        &mut self,
        carried: &LoopBindings,
        values: Vec<Value>,
        run_update: bool,
        test: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    ) -> EvalResult<(Flow, Vec<Value>)> {
        for (&(name, kind), value) in carried.iter().zip(values) {
            self.env
                .declare(name, kind, Some(value))
                .map_err(|e| self.scope_error(e, Span::DUMMY))?;
        }
        if run_update {
            if let Some(update) = update {
                self.eval_expr(update)?;
            }
        }
        if let Some(test) = test {
            if !truthy(&self.eval_expr(test)?) {
                return Ok((Flow::Break, Vec::new()));
            }
        }
        let flow = self.exec_stmt(body)?;
        Ok((flow, self.read_bindings(carried)?))
    }

    /// Run a `for` head. Returns the bindings to copy per iteration, which
    /// is empty unless the head declares with `let` or `const`.
    fn exec_for_init(&mut self, init: StmtId) -> EvalResult<LoopBindings> {
        let arena = self.arena;
        let mut carried = LoopBindings::new();
        if let StmtKind::Declaration { kind, declarators } = &arena.stmt(init).kind {
            if kind.is_block_scoped() {
                for declarator in arena.declarators(*declarators) {
                    self.env
                        .declare(declarator.name, *kind, None)
                        .map_err(|e| self.scope_error(e, declarator.span))?;
                    carried.push((declarator.name, *kind));
                }
            }
        }
        self.exec_stmt(init)?;
        Ok(carried)
    }

    fn read_bindings(&self, bindings: &LoopBindings) -> EvalResult<Vec<Value>> {
        bindings
            .iter()
            .map(|&(name, _)| {
                self.env
                    .lookup(name)
                    .map_err(|e| self.scope_error(e, Span::DUMMY))
            })
            .collect()
    }

    /// `for (kind? name of iterable)`. Arrays are read live by index, so
    /// elements pushed during the loop are visited. Strings iterate by
    /// character.
    fn exec_for_of(
        &mut self,
        kind: Option<DeclKind>,
        binding: Name,
        iterable: ExprId,
        body: StmtId,
        span: Span,
    ) -> EvalResult<Flow> {
        let collection = self.eval_expr(iterable)?;
        let mut index = 0;
        loop {
            let item = match &collection {
                Value::Array(items) => match items.borrow().get(index) {
                    Some(item) => item.clone(),
                    None => break,
                },
                Value::Str(text) => match text.chars().nth(index) {
                    Some(c) => Value::from(c.to_string()),
                    None => break,
                },
                _ => {
                    let shown = self.expr_text(iterable);
                    return Err(custom(format!("{shown} is not iterable"))
                        .with_span(self.arena.expr(iterable).span));
                }
            };
            index += 1;

            let flow = match kind {
                Some(kind @ (DeclKind::Let | DeclKind::Const)) => {
                    self.with_scope(ScopeKind::Block, |scoped| {
                        scoped
                            .env
                            .declare(binding, kind, Some(item))
                            .map_err(|e| scoped.scope_error(e, span))?;
                        scoped.exec_stmt(body)
                    })?
                }
                Some(DeclKind::Var) => {
                    self.env
                        .declare(binding, DeclKind::Var, Some(item))
                        .map_err(|e| self.scope_error(e, span))?;
                    self.exec_stmt(body)?
                }
                None => {
                    self.env
                        .assign(binding, item)
                        .map_err(|e| self.scope_error(e, span))?;
                    self.exec_stmt(body)?
                }
            };
            match flow {
                Flow::Normal | Flow::Continue => {}
                Flow::Break => break,
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }
        Ok(Flow::Normal)
    }

    /// Evaluate `expr`; an anonymous function takes `name` as its name.
    pub(crate) fn eval_named(&mut self, expr: ExprId, name: Name) -> EvalResult {
        let arena = self.arena;
        match arena.expr(expr).kind {
            ExprKind::Function(function) => self.eval_function_expr(function, Some(name)),
            _ => self.eval_expr(expr),
        }
    }
}
