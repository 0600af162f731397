//! Where `console.log` output goes.
//!
//! The CLI writes to stdout; tests and embedders capture into a buffer and
//! read it back. Dispatch is a plain enum match.

use std::io::Write;

use parking_lot::Mutex;

/// Output sink for script printing.
pub enum PrintHandlerImpl {
    /// Writes each line to stdout as it is printed.
    Stdout,
    /// Accumulates output for later inspection.
    Buffer(Mutex<String>),
    /// Discards everything.
    Silent,
}

impl PrintHandlerImpl {
    /// Print one line followed by a newline.
    pub fn println(&self, line: &str) {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                // A closed pipe must not abort the script.
                let _ = writeln!(out, "{line}");
            }
            Self::Buffer(buffer) => {
                let mut buf = buffer.lock();
                buf.push_str(line);
                buf.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Everything captured so far. Empty for handlers that don't capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(buffer) => buffer.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }
}

/// Print handler shared between the interpreter and whoever reads its output.
#[expect(
    clippy::disallowed_types,
    reason = "Arc required for SharedPrintHandler shared with the embedder"
)]
pub type SharedPrintHandler = std::sync::Arc<PrintHandlerImpl>;

/// Handler that writes to stdout.
#[expect(
    clippy::disallowed_types,
    reason = "Arc required for SharedPrintHandler"
)]
pub fn stdout_handler() -> SharedPrintHandler {
    std::sync::Arc::new(PrintHandlerImpl::Stdout)
}

/// Handler that captures output into a buffer.
#[expect(
    clippy::disallowed_types,
    reason = "Arc required for SharedPrintHandler"
)]
pub fn buffer_handler() -> SharedPrintHandler {
    std::sync::Arc::new(PrintHandlerImpl::Buffer(Mutex::new(String::new())))
}

/// Handler that discards all output, for `hoist check`-style dry runs.
#[expect(
    clippy::disallowed_types,
    reason = "Arc required for SharedPrintHandler"
)]
pub fn silent_handler() -> SharedPrintHandler {
    std::sync::Arc::new(PrintHandlerImpl::Silent)
}

#[cfg(test)]
mod tests;
