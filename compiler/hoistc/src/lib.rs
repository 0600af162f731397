//! Hoist - command-line runner for hoist scripts.
//!
//! # Pipeline
//!
//! ```text
//! source ──► hoist_lexer::lex ──► TokenList
//!     │
//!     ▼
//! hoist_parse::parse ──► Module (arena AST)
//!     │
//!     ▼
//! hoist_eval::Interpreter ──► console.log output, or a runtime error
//! ```
//!
//! Every phase reports failures as [`Diagnostic`]s. The [`commands`] module
//! renders them against the source file; [`run_source`] and
//! [`check_source`] return them so tests can assert on codes and messages.

pub mod commands;

use std::sync::Once;

use hoist_diagnostic::Diagnostic;
use hoist_eval::{InterpreterBuilder, SharedPrintHandler, DEFAULT_MAX_CALL_DEPTH, DEFAULT_SEED};
use hoist_ir::StringInterner;
use hoist_parse::ParseOutput;
use tracing::debug;

pub use hoist_diagnostic::ErrorCode;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=hoist_eval=trace hoist run script.js`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .init();
        }
    });
}

/// Settings for evaluating a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Nested script calls allowed before a stack overflow error.
    pub max_call_depth: usize,
    /// Seed for `Math.random`.
    pub seed: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            seed: DEFAULT_SEED,
        }
    }
}

/// Diagnostics for every lexer and parser error in `output`.
pub fn frontend_diagnostics(output: &ParseOutput) -> Vec<Diagnostic> {
    output.errors.iter().map(|e| e.to_diagnostic()).collect()
}

/// Lex and parse `source` without running it.
pub fn check_source(source: &str) -> Vec<Diagnostic> {
    let interner = StringInterner::new();
    frontend_diagnostics(&hoist_parse::parse_source(source, &interner))
}

/// Lex, parse and evaluate `source`, writing `console.log` output to
/// `print_handler`.
///
/// Syntax errors stop before evaluation; a runtime error stops evaluation
/// with whatever was printed up to that point kept. Returns the diagnostics,
/// empty on success.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn run_source(
    source: &str,
    options: RunOptions,
    print_handler: SharedPrintHandler,
) -> Vec<Diagnostic> {
    let interner = StringInterner::new();
    let parsed = hoist_parse::parse_source(source, &interner);
    if parsed.has_errors() {
        debug!(errors = parsed.errors.len(), "syntax errors, not evaluating");
        return frontend_diagnostics(&parsed);
    }

    let mut interpreter = InterpreterBuilder::new(&interner, &parsed.module.arena)
        .print_handler(print_handler)
        .max_call_depth(options.max_call_depth)
        .seed(options.seed)
        .build();
    match interpreter.eval_program(parsed.module.body) {
        Ok(()) => Vec::new(),
        Err(err) => {
            debug!(code = %err.error_code(), "runtime error");
            vec![err.to_diagnostic()]
        }
    }
}
