//! Tree-walking interpreter.
//!
//! Evaluation walks the arena AST directly. Every scope the program enters
//! becomes a scope in the [`Environment`]; entering and leaving goes through
//! [`ScopedInterpreter`] so scopes are popped on every exit path, errors
//! included.
//!
//! - `hoisting` declares a scope's names before its statements run
//! - `exec` runs statements and loops
//! - `expr` evaluates expressions, assignment and property access
//! - `function_call` creates closures and performs calls

mod builder;
mod expr;
mod exec;
mod function_call;
mod hoisting;
mod scope_guard;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use hoist_ir::{ExprArena, Name, Span, StmtRange, StringInterner};
use tracing::debug;

use crate::environment::{Environment, ScopeError};
use crate::errors::{
    constant_reassignment, duplicate_declaration, uninitialized_access, unresolved_identifier,
    EvalError, EvalResult,
};
use crate::print_handler::SharedPrintHandler;
use crate::random::XorShift64;
use crate::Value;

/// Default limit on nested script calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Property names the interpreter checks on hot paths, interned once.
#[derive(Clone, Copy)]
pub(crate) struct PropNames {
    pub(crate) length: Name,
}

impl PropNames {
    fn new(interner: &StringInterner) -> Self {
        PropNames {
            length: interner.intern("length"),
        }
    }
}

/// How a statement finished.
#[derive(Clone, Debug)]
pub(crate) enum Flow {
    Normal,
    Return(Value),
    Break,
    Continue,
}

pub struct Interpreter<'a> {
    pub(crate) interner: &'a StringInterner,
    pub(crate) arena: &'a ExprArena,
    pub(crate) env: Environment,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) call_depth: usize,
    pub(crate) max_call_depth: usize,
    pub(crate) rng: XorShift64,
    pub(crate) prop_names: PropNames,
}

impl<'a> Interpreter<'a> {
    /// Run a program's top-level statements in the global scope.
    ///
    /// Stops at the first error. Output printed before it stays printed.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = body.len()))]
    pub fn eval_program(&mut self, body: StmtRange) -> EvalResult<()> {
        self.hoist_function_body(body)?;
        // The parser rejects top-level `return`, `break` and `continue`.
        self.exec_stmts(body)?;
        debug!("program finished");
        Ok(())
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Look up a global after the program ran. Used by embedders and tests.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.env.lookup(self.interner.intern(name)).ok()
    }

    #[inline]
    pub(crate) fn name_str(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    /// Turn a resolver failure into a runtime error at `span`.
    #[cold]
    pub(crate) fn scope_error(&self, err: ScopeError, span: Span) -> EvalError {
        let name = self.name_str(err.name());
        let error = match err {
            ScopeError::Unresolved { .. } => unresolved_identifier(name),
            ScopeError::Uninitialized { .. } => uninitialized_access(name),
            ScopeError::ConstAssignment { .. } => constant_reassignment(name),
            ScopeError::Duplicate { .. } => duplicate_declaration(name),
        };
        error.with_span(span)
    }
}
