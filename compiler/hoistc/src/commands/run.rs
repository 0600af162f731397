//! The `run` command: evaluate a script.

use hoist_diagnostic::emitter::ColorMode;
use hoist_eval::stdout_handler;

use super::{read_file, report};
use crate::{run_source, RunOptions};

/// Run a script, printing its output to stdout. Exits with status 1 after
/// reporting a syntax or runtime error.
pub fn run_file(path: &str, options: RunOptions, color: ColorMode) {
    let source = read_file(path);
    let diagnostics = run_source(&source, options, stdout_handler());
    if report(&diagnostics, path, &source, color) {
        std::process::exit(1);
    }
}
