//! Hoist Eval - lexical environment resolver and interpreter.
//!
//! This crate resolves every identifier in a hoist script against a chain of
//! scopes and runs the program with a tree-walking interpreter.
//!
//! # Architecture
//!
//! - [`Environment`]: the scope chain. Owns declaration rules for `var`,
//!   `let` and `const`, hoisting targets and the temporal dead zone
//! - [`Interpreter`]: walks the arena AST; built with [`InterpreterBuilder`]
//! - [`Value`]: runtime values, with arrays, objects and closures behind
//!   shared handles
//! - [`EvalError`]: runtime errors, convertible to a [`hoist_diagnostic::Diagnostic`]
//!
//! # Example
//!
//! ```text
//! let mut interpreter = InterpreterBuilder::new(&interner, &module.arena)
//!     .print_handler(buffer_handler())
//!     .build();
//! interpreter.eval_program(module.body)?;
//! ```

mod builtins;
pub mod environment;
pub mod errors;
mod format;
pub mod interpreter;
mod methods;
mod operators;
mod print_handler;
mod random;
mod value;

pub use builtins::NativeFunction;
pub use environment::{Environment, LocalScope, Scope, ScopeError, ScopeKind};
pub use errors::{AssignmentFault, EvalError, EvalErrorKind, EvalResult, PropertyAccess};
pub use format::{format_log_line, inspect};
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter, DEFAULT_MAX_CALL_DEPTH};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandlerImpl, SharedPrintHandler,
};
pub use random::DEFAULT_SEED;
pub use value::{FunctionValue, Heap, HeapPayload, ObjectValue, Teardown, Value};
