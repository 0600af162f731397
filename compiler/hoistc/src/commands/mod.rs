//! Command handlers for the `hoist` CLI.
//!
//! Each submodule implements one command. Argument parsing and the helpers
//! every command shares (reading the script, building the emitter) live
//! here in the module root.

use std::io::IsTerminal;

use hoist_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use hoist_diagnostic::Diagnostic;

use crate::RunOptions;

mod check;
mod debug;
mod explain;
mod run;

pub use check::check_file;
pub use debug::{lex_file, parse_file};
pub use explain::explain_error;
pub use run::run_file;

/// Arguments shared by the file commands, parsed from everything after the
/// command name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileArgs {
    pub path: Option<String>,
    pub options: RunOptions,
    pub color: ColorMode,
}

/// Parse `[file] [--max-call-depth=<n>] [--seed=<n>] [--no-color]`.
///
/// Flags may come before or after the path. An unknown flag or a bad number
/// is an error message for the user.
pub fn parse_file_args(args: &[String]) -> Result<FileArgs, String> {
    let mut parsed = FileArgs::default();
    for arg in args {
        if let Some(depth) = arg.strip_prefix("--max-call-depth=") {
            parsed.options.max_call_depth = depth
                .parse()
                .map_err(|_| format!("invalid --max-call-depth value '{depth}'"))?;
        } else if let Some(seed) = arg.strip_prefix("--seed=") {
            parsed.options.seed = seed
                .parse()
                .map_err(|_| format!("invalid --seed value '{seed}'"))?;
        } else if arg == "--no-color" {
            parsed.color = ColorMode::Never;
        } else if arg.starts_with('-') {
            return Err(format!("unknown option '{arg}'"));
        } else if parsed.path.is_none() {
            parsed.path = Some(arg.clone());
        } else {
            return Err(format!("unexpected argument '{arg}'"));
        }
    }
    Ok(parsed)
}

/// Read a file from disk, exiting with a user-friendly error message on failure.
pub(super) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("error: {msg}");
            std::process::exit(1);
        }
    }
}

/// Render `diagnostics` to stderr against `source`, followed by a summary.
///
/// Returns whether any of them was an error.
pub(super) fn report(
    diagnostics: &[Diagnostic],
    path: &str,
    source: &str,
    color: ColorMode,
) -> bool {
    if diagnostics.is_empty() {
        return false;
    }
    let is_tty = std::io::stderr().is_terminal();
    let mut emitter = TerminalEmitter::new(std::io::stderr(), path, source, color, is_tty);
    emitter.emit_all(diagnostics);
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    emitter.emit_summary(errors, diagnostics.len() - errors);
    errors > 0
}

#[cfg(test)]
mod tests;
