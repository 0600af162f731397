//! RAII scope guards for the interpreter's environment.
//!
//! [`ScopedInterpreter`] holds `&mut Interpreter` and pops the scope it
//! entered when dropped, so an error (or panic) inside a block, loop
//! iteration or call never leaves a stale scope behind.
//!
//! ```text
//! self.with_scope(ScopeKind::Block, |scoped| {
//!     scoped.hoist_block(stmts)?;
//!     scoped.exec_stmts(stmts)
//! })
//! ```

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::environment::{LocalScope, Scope, ScopeKind};

/// Access the interpreter through this guard; it derefs to
/// [`Interpreter`]. Dropping it pops the scope it pushed.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Enter a nested scope of the current one.
    pub fn scoped(&mut self, kind: ScopeKind) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope(kind);
        ScopedInterpreter { interpreter: self }
    }

    /// Enter a function body whose parent is the function's closure scope.
    pub fn scoped_function(&mut self, closure: LocalScope<Scope>) -> ScopedInterpreter<'_, 'a> {
        self.env.push_function_scope(closure);
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` inside a new scope of `kind`.
    pub fn with_scope<T, F>(&mut self, kind: ScopeKind, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        let mut scoped = self.scoped(kind);
        f(&mut scoped)
    }
}
