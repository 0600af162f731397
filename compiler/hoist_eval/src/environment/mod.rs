//! Lexical environment resolver.
//!
//! Scopes form a tree through parent links: every scope knows its enclosing
//! scope, and lookup walks those links outward. The [`Environment`] keeps a
//! stack of the scopes the interpreter is currently executing in; a function
//! call pushes a scope whose parent is the function's captured scope rather
//! than the caller's, which is what makes scoping lexical.
//!
//! Declaration kinds decide where a name lands:
//!
//! - `var` is hoisted to the nearest function (or global) scope and reads as
//!   `undefined` until its declaration line runs.
//! - `let` and `const` belong to the nearest block and sit in a dead zone
//!   (bound, but unreadable) until their declaration line initializes them.

// Rc is the intentional implementation detail of LocalScope<T>
#![expect(
    clippy::disallowed_types,
    reason = "Rc is the implementation of LocalScope<T>"
)]

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use hoist_ir::{DeclKind, Name};
use thiserror::Error;
use tracing::trace;

use crate::value::Teardown;
use crate::Value;

/// A single-threaded, shared, mutable scope handle.
///
/// Closures hold one of these to their defining scope, so the scope outlives
/// the block that created it for as long as some function value refers to it.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Whether both handles refer to the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether this is the only handle.
    #[inline]
    pub(crate) fn is_unique(&self) -> bool {
        Rc::strong_count(&self.0) == 1
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// What created a scope. `var` declarations stop at the first
/// `Function` or `Global` scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

impl ScopeKind {
    #[inline]
    pub fn is_var_target(self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::Function)
    }
}

/// Why a resolver operation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// No scope on the chain binds the name.
    #[error("identifier is not defined")]
    Unresolved { name: Name },
    /// The binding exists but its declaration line has not run yet.
    #[error("binding used before initialization")]
    Uninitialized { name: Name },
    /// Reassignment of an initialized `const`.
    #[error("assignment to constant binding")]
    ConstAssignment { name: Name },
    /// The name is already declared where the new declaration would go.
    #[error("identifier has already been declared")]
    Duplicate { name: Name },
}

impl ScopeError {
    pub fn name(self) -> Name {
        match self {
            ScopeError::Unresolved { name }
            | ScopeError::Uninitialized { name }
            | ScopeError::ConstAssignment { name }
            | ScopeError::Duplicate { name } => name,
        }
    }
}

/// A variable binding. `value` is `None` while the binding is in its dead
/// zone.
#[derive(Clone, Debug)]
struct Binding {
    value: Option<Value>,
    kind: DeclKind,
}

/// A single scope: its bindings and the scope it is nested in.
#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    bindings: FxHashMap<Name, Binding>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn new(kind: ScopeKind, parent: Option<LocalScope<Scope>>) -> Self {
        Scope {
            kind,
            bindings: FxHashMap::default(),
            parent,
        }
    }

    /// Whether this scope itself binds `name`, ignoring parents.
    pub fn has_own(&self, name: Name) -> bool {
        self.bindings.contains_key(&name)
    }

    fn insert(&mut self, name: Name, kind: DeclKind, value: Option<Value>) {
        self.bindings.insert(name, Binding { value, kind });
    }

    /// Move every binding value and the parent link onto `teardown`.
    pub(crate) fn drain_into(&mut self, teardown: &mut Teardown) {
        teardown.push_values(self.bindings.drain().filter_map(|(_, binding)| binding.value));
        if let Some(parent) = self.parent.take() {
            teardown.push_scope(parent);
        }
    }
}

/// Scope chains and the closures stored in them can be arbitrarily deep, so
/// dropping a scope hands its contents to an iterative teardown.
impl Drop for Scope {
    fn drop(&mut self) {
        if self.bindings.is_empty() && self.parent.is_none() {
            return;
        }
        let mut teardown = Teardown::default();
        self.drain_into(&mut teardown);
        teardown.run();
    }
}

/// Walk from `start` outward until `found` produces a result.
fn walk<R>(
    start: &LocalScope<Scope>,
    mut found: impl FnMut(&mut Scope) -> Option<R>,
) -> Option<R> {
    let mut current = start.clone();
    loop {
        let next = {
            let mut scope = current.borrow_mut();
            if let Some(result) = found(&mut scope) {
                return Some(result);
            }
            scope.parent.clone()
        };
        current = next?;
    }
}

/// The resolver: a stack of active scopes over the scope tree.
///
/// The bottom of the stack is the program's global scope. Its parent holds
/// the built-in globals, so scripts may shadow `Math` or `console` with
/// their own declarations.
pub struct Environment {
    /// Active scopes, innermost last. Never empty.
    scopes: Vec<LocalScope<Scope>>,
    global: LocalScope<Scope>,
    intrinsics: LocalScope<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        let intrinsics = LocalScope::new(Scope::new(ScopeKind::Global, None));
        let global = LocalScope::new(Scope::new(ScopeKind::Global, Some(intrinsics.clone())));
        Environment {
            scopes: vec![global.clone()],
            global,
            intrinsics,
        }
    }

    /// Number of active scopes, the global scope included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    fn current(&self) -> &LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global)
    }

    /// Kind of the innermost active scope.
    pub fn current_kind(&self) -> ScopeKind {
        self.current().borrow().kind
    }

    /// Enter a nested scope of the current one.
    pub fn push_scope(&mut self, kind: ScopeKind) {
        let parent = self.current().clone();
        trace!(?kind, depth = self.scopes.len() + 1, "push scope");
        self.scopes
            .push(LocalScope::new(Scope::new(kind, Some(parent))));
    }

    /// Enter a function body whose enclosing scope is `closure`, the scope
    /// the function was created in.
    pub fn push_function_scope(&mut self, closure: LocalScope<Scope>) {
        trace!(depth = self.scopes.len() + 1, "push function scope");
        self.scopes
            .push(LocalScope::new(Scope::new(ScopeKind::Function, Some(closure))));
    }

    /// Leave the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            trace!(depth = self.scopes.len(), "pop scope");
        }
    }

    /// Shared handle to the current scope, for closures.
    ///
    /// The handle is live: writes through it are seen by every other holder.
    pub fn capture(&self) -> LocalScope<Scope> {
        self.current().clone()
    }

    /// Register a built-in global. Scripts can shadow it.
    pub fn define_intrinsic(&mut self, name: Name, value: Value) {
        self.intrinsics
            .borrow_mut()
            .insert(name, DeclKind::Var, Some(value));
    }

    /// Declare `name` according to its declaration kind.
    ///
    /// `let` and `const` go into the current scope, uninitialized unless a
    /// value is given, and fail if the scope already binds the name. `var`
    /// goes into the nearest function or global scope; redeclaring an
    /// existing `var` keeps the binding and only overwrites it when a value
    /// is given. A `var` fails if any scope on the way there declares the
    /// name with `let` or `const`.
    pub fn declare(
        &mut self,
        name: Name,
        kind: DeclKind,
        value: Option<Value>,
    ) -> Result<(), ScopeError> {
        trace!(?name, ?kind, initialized = value.is_some(), "declare");
        if kind.is_block_scoped() {
            let mut scope = self.current().borrow_mut();
            if scope.has_own(name) {
                return Err(ScopeError::Duplicate { name });
            }
            scope.insert(name, kind, value);
            return Ok(());
        }

        let mut value = Some(value);
        walk(self.current(), |scope| {
            if let Some(existing) = scope.bindings.get_mut(&name) {
                if existing.kind.is_block_scoped() {
                    return Some(Err(ScopeError::Duplicate { name }));
                }
                if scope.kind.is_var_target() {
                    if let Some(Some(v)) = value.take() {
                        existing.value = Some(v);
                    }
                    return Some(Ok(()));
                }
            }
            if scope.kind.is_var_target() {
                let initial = value.take().flatten().unwrap_or(Value::Undefined);
                scope.insert(name, DeclKind::Var, Some(initial));
                return Some(Ok(()));
            }
            None
        })
        .unwrap_or(Ok(()))
    }

    /// Declare a function in the current scope with its value.
    ///
    /// In a function or global scope this behaves like an initialized `var`;
    /// in a block the function is local to the block.
    pub fn declare_function(&mut self, name: Name, value: Value) -> Result<(), ScopeError> {
        let mut scope = self.current().borrow_mut();
        let kind = if scope.kind.is_var_target() {
            DeclKind::Var
        } else {
            DeclKind::Let
        };
        match scope.bindings.get_mut(&name) {
            Some(existing) if existing.kind.is_block_scoped() => {
                Err(ScopeError::Duplicate { name })
            }
            Some(existing) => {
                existing.value = Some(value);
                Ok(())
            }
            None => {
                scope.insert(name, kind, Some(value));
                Ok(())
            }
        }
    }

    /// Run a declaration line: end the dead zone of a `let`/`const` or set a
    /// hoisted `var` to its initializer.
    ///
    /// The first initialization of a `const` is its one permitted
    /// assignment; initializing it again fails.
    pub fn initialize(&mut self, name: Name, value: Value) -> Result<(), ScopeError> {
        let mut value = Some(value);
        walk(self.current(), |scope| {
            let binding = scope.bindings.get_mut(&name)?;
            if binding.kind == DeclKind::Const && binding.value.is_some() {
                return Some(Err(ScopeError::ConstAssignment { name }));
            }
            binding.value = value.take();
            Some(Ok(()))
        })
        .unwrap_or(Err(ScopeError::Unresolved { name }))
    }

    /// Resolve `name`, innermost scope first.
    pub fn lookup(&self, name: Name) -> Result<Value, ScopeError> {
        walk(self.current(), |scope| {
            let binding = scope.bindings.get(&name)?;
            Some(
                binding
                    .value
                    .clone()
                    .ok_or(ScopeError::Uninitialized { name }),
            )
        })
        .unwrap_or(Err(ScopeError::Unresolved { name }))
    }

    /// Whether `name` resolves anywhere on the chain, initialized or not.
    pub fn is_declared(&self, name: Name) -> bool {
        walk(self.current(), |scope| scope.has_own(name).then_some(())).is_some()
    }

    /// Whether the innermost scope itself binds `name`.
    pub fn has_own(&self, name: Name) -> bool {
        self.current().borrow().has_own(name)
    }

    /// Assign to the nearest existing binding of `name`.
    ///
    /// There are no implicit globals: assigning an undeclared name fails.
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), ScopeError> {
        let mut value = Some(value);
        walk(self.current(), |scope| {
            let binding = scope.bindings.get_mut(&name)?;
            if binding.value.is_none() {
                return Some(Err(ScopeError::Uninitialized { name }));
            }
            if !binding.kind.is_mutable() {
                return Some(Err(ScopeError::ConstAssignment { name }));
            }
            binding.value = value.take();
            Some(Ok(()))
        })
        .unwrap_or(Err(ScopeError::Unresolved { name }))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
