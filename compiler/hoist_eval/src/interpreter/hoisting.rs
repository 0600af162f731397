//! Declaration hoisting.
//!
//! Before a scope's statements run, every name it will declare is bound:
//!
//! - at function (and program) entry, each `var` anywhere in the body,
//!   nested blocks and loops included but nested functions excluded, is
//!   bound to `undefined` in the function scope;
//! - at any scope entry, function declarations directly in that statement
//!   list are bound to their closures, so they can be called earlier in the
//!   source than they appear;
//! - `let` and `const` directly in the list are bound uninitialized, which
//!   is what makes an early reference fail instead of reaching an outer
//!   binding of the same name.

use hoist_ir::{DeclKind, Name, Span, StmtId, StmtKind, StmtRange};
use tracing::{debug, trace};

use super::Interpreter;
use crate::errors::EvalResult;

impl Interpreter<'_> {
    /// Hoist for a function body or the program.
    pub(crate) fn hoist_function_body(&mut self, body: StmtRange) -> EvalResult<()> {
        self.hoist_vars(body)?;
        self.hoist_block(body)
    }

    /// Hoist function declarations and lexical names of one statement list.
    pub(crate) fn hoist_block(&mut self, stmts: StmtRange) -> EvalResult<()> {
        let arena = self.arena;
        for &id in arena.stmt_list(stmts) {
            match &arena.stmt(id).kind {
                StmtKind::Function(function) => {
                    let def = arena.function(*function);
                    let Some(name) = def.name else { continue };
                    let value = self.make_closure(*function, Some(name));
                    trace!(name = self.name_str(name), "hoist function");
                    self.env
                        .declare_function(name, value)
                        .map_err(|e| self.scope_error(e, def.span))?;
                }
                StmtKind::Declaration { kind, declarators } if kind.is_block_scoped() => {
                    for declarator in arena.declarators(*declarators) {
                        trace!(name = self.name_str(declarator.name), ?kind, "hoist lexical");
                        self.env
                            .declare(declarator.name, *kind, None)
                            .map_err(|e| self.scope_error(e, declarator.span))?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn hoist_vars(&mut self, body: StmtRange) -> EvalResult<()> {
        let mut found = Vec::new();
        for &id in self.arena.stmt_list(body) {
            self.collect_vars(id, &mut found);
        }
        if !found.is_empty() {
            debug!(count = found.len(), "hoist var declarations");
        }
        for (name, span) in found {
            self.env
                .declare(name, DeclKind::Var, None)
                .map_err(|e| self.scope_error(e, span))?;
        }
        Ok(())
    }

    fn collect_vars(&self, id: StmtId, found: &mut Vec<(Name, Span)>) {
        let stmt = self.arena.stmt(id);
        match &stmt.kind {
            StmtKind::Declaration {
                kind: DeclKind::Var,
                declarators,
            } => {
                found.extend(
                    self.arena
                        .declarators(*declarators)
                        .iter()
                        .map(|d| (d.name, d.span)),
                );
            }
            StmtKind::Block(stmts) => {
                for &inner in self.arena.stmt_list(*stmts) {
                    self.collect_vars(inner, found);
                }
            }
            StmtKind::If {
                consequent,
                alternate,
                ..
            } => {
                self.collect_vars(*consequent, found);
                if let Some(alternate) = alternate {
                    self.collect_vars(*alternate, found);
                }
            }
            StmtKind::For { init, body, .. } => {
                if let Some(init) = init {
                    self.collect_vars(*init, found);
                }
                self.collect_vars(*body, found);
            }
            StmtKind::ForOf {
                kind: Some(DeclKind::Var),
                binding,
                body,
                ..
            } => {
                found.push((*binding, stmt.span));
                self.collect_vars(*body, found);
            }
            StmtKind::ForOf { body, .. } | StmtKind::While { body, .. } => {
                self.collect_vars(*body, found);
            }
            StmtKind::Declaration { .. }
            | StmtKind::Function(_)
            | StmtKind::Expr(_)
            | StmtKind::Return(_)
            | StmtKind::Break
            | StmtKind::Continue
            | StmtKind::Empty => {}
        }
    }
}
