//! The `check` command: report syntax errors without running the script.

use hoist_diagnostic::emitter::ColorMode;

use super::{read_file, report};
use crate::check_source;

/// Lex and parse a file, reporting every syntax error.
///
/// Scope errors are found only by running: whether a name is in its dead
/// zone depends on execution order.
pub fn check_file(path: &str, color: ColorMode) {
    let source = read_file(path);
    let diagnostics = check_source(&source);
    if report(&diagnostics, path, &source, color) {
        std::process::exit(1);
    }
    println!("{path}: no syntax errors");
}
