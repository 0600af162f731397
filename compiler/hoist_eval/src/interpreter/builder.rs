//! `InterpreterBuilder` for configuring an [`Interpreter`].

use hoist_ir::{ExprArena, StringInterner};

use super::{Interpreter, PropNames, DEFAULT_MAX_CALL_DEPTH};
use crate::builtins::install_globals;
use crate::environment::Environment;
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::random::{XorShift64, DEFAULT_SEED};

/// Builder for [`Interpreter`] instances.
///
/// Output goes to stdout unless a print handler is set; tests pass
/// [`buffer_handler`](crate::buffer_handler) and read the output back.
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    arena: &'a ExprArena,
    print_handler: Option<SharedPrintHandler>,
    max_call_depth: usize,
    seed: u64,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena) -> Self {
        Self {
            interner,
            arena,
            print_handler: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            seed: DEFAULT_SEED,
        }
    }

    /// Where `console.log` writes.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Nested script calls allowed before `StackOverflow`.
    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Seed for `Math.random`.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the interpreter with the built-in globals installed.
    pub fn build(self) -> Interpreter<'a> {
        let mut env = Environment::new();
        install_globals(&mut env, self.interner);
        Interpreter {
            interner: self.interner,
            arena: self.arena,
            env,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            call_depth: 0,
            max_call_depth: self.max_call_depth,
            rng: XorShift64::new(self.seed),
            prop_names: PropNames::new(self.interner),
        }
    }
}
