//! Closure creation and calls.

use hoist_ir::{DeclKind, FunctionBody, FunctionId, FunctionKind, Name, Span, StmtRange};
use tracing::trace;

use super::{Flow, Interpreter};
use crate::environment::ScopeKind;
use crate::errors::{not_callable, stack_overflow, EvalError, EvalErrorKind, EvalResult};
use crate::format::inspect;
use crate::value::FunctionValue;
use crate::Value;

/// Call frames named in an error's notes, innermost first.
const MAX_TRACE_NOTES: usize = 4;

impl Interpreter<'_> {
    /// Close `function` over the current scope.
    ///
    /// `name` is the declared name or, for anonymous functions, the name
    /// of the binding or property the function is assigned to.
    pub(crate) fn make_closure(&self, function: FunctionId, name: Option<Name>) -> Value {
        Value::function(FunctionValue {
            id: function,
            name,
            env: self.env.capture(),
        })
    }

    /// Evaluate a function expression.
    ///
    /// A named function expression sees its own name, and nothing outside
    /// it does: the name lives in a scope between the closure and the
    /// surrounding code.
    pub(crate) fn eval_function_expr(
        &mut self,
        function: FunctionId,
        name_hint: Option<Name>,
    ) -> EvalResult {
        let arena = self.arena;
        let def = arena.function(function);
        match (def.kind, def.name) {
            (FunctionKind::Expression, Some(own_name)) => {
                self.with_scope(ScopeKind::Block, |scoped| {
                    let value = scoped.make_closure(function, Some(own_name));
                    scoped
                        .env
                        .declare(own_name, DeclKind::Const, Some(value.clone()))
                        .map_err(|e| scoped.scope_error(e, def.span))?;
                    Ok(value)
                })
            }
            (_, name) => Ok(self.make_closure(function, name.or(name_hint))),
        }
    }

    /// Call any callable value. `describe_callee` names the callee in the
    /// `is not a function` message.
    pub(crate) fn call_value(
        &mut self,
        callee: &Value,
        args: &[Value],
        span: Span,
        describe_callee: impl FnOnce(&Self) -> String,
    ) -> EvalResult {
        match callee {
            Value::Function(function) => self.call_function(function, args, span),
            Value::Native(native) => self.call_native(*native, args),
            _ => Err(not_callable(describe_callee(self)).with_span(span)),
        }
    }

    /// Call a callback passed to a built-in method.
    pub(crate) fn call_callback(&mut self, callback: &Value, args: &[Value], span: Span) -> EvalResult {
        self.call_value(callback, args, span, |this| inspect(callback, this.interner))
    }

    /// Call a script function.
    ///
    /// The body runs in a fresh function scope whose parent is the scope the
    /// function was created in, not the caller's. Parameters bind like
    /// `var`; missing arguments are `undefined` and extra ones are ignored.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(function = function.name.map_or("<anonymous>", |n| self.name_str(n)), depth = self.call_depth)
    )]
    pub(crate) fn call_function(
        &mut self,
        function: &FunctionValue,
        args: &[Value],
        span: Span,
    ) -> EvalResult {
        if self.call_depth >= self.max_call_depth {
            return Err(stack_overflow(self.max_call_depth).with_span(span));
        }
        let arena = self.arena;
        let def = arena.function(function.id);

        self.call_depth += 1;
        let result = {
            let mut scoped = self.scoped_function(function.env.clone());
            scoped
                .bind_params(&def.params, args, def.span)
                .and_then(|()| match &def.body {
                    FunctionBody::Expr(expr) => scoped.eval_expr(*expr),
                    FunctionBody::Block(body) => scoped.run_function_body(*body),
                })
        };
        self.call_depth -= 1;

        trace!(ok = result.is_ok(), "return");
        result.map_err(|err| self.note_frame(err, function))
    }

    /// Record the function an error passed through.
    fn note_frame(&self, err: EvalError, function: &FunctionValue) -> EvalError {
        if err.notes.len() >= MAX_TRACE_NOTES
            || matches!(err.kind, EvalErrorKind::StackOverflow { .. })
        {
            return err;
        }
        let name = function.name.map_or("<anonymous>", |n| self.name_str(n));
        err.with_note(format!("in call to `{name}`"))
    }

    /// Bind parameters in the fresh function scope. Missing arguments are
    /// `undefined`.
    pub(crate) fn bind_params(
        &mut self,
        params: &[Name],
        args: &[Value],
        span: Span,
    ) -> EvalResult<()> {
        for (i, &param) in params.iter().enumerate() {
            let value = args.get(i).cloned().unwrap_or(Value::Undefined);
            self.env
                .declare(param, DeclKind::Var, Some(value))
                .map_err(|e| self.scope_error(e, span))?;
        }
        Ok(())
    }

    fn run_function_body(&mut self, body: StmtRange) -> EvalResult {
        self.hoist_function_body(body)?;
        match self.exec_stmts(body)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal | Flow::Break | Flow::Continue => Ok(Value::Undefined),
        }
    }
}
