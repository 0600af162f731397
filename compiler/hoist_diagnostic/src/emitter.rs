//! Diagnostic emitter.
//!
//! Renders [`Diagnostic`]s against the source file with `ariadne`, with
//! optional ANSI colors.

use std::io::{self, Write};
use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label as ReportLabel, Report, ReportKind, Source};

use crate::{Diagnostic, Severity};

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Use colors when the output is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean. `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Trait for emitting diagnostics.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Emit multiple diagnostics.
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    /// Emit a summary of errors/warnings.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}

/// Terminal emitter for one source file.
pub struct TerminalEmitter<'src, W: Write> {
    writer: W,
    path: &'src str,
    source: &'src str,
    colors: bool,
}

impl<'src, W: Write> TerminalEmitter<'src, W> {
    pub fn new(writer: W, path: &'src str, source: &'src str, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            path,
            source,
            colors: mode.should_use_colors(is_tty),
        }
    }

    /// Consume the emitter, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn clamp(&self, start: u32, end: u32) -> Range<usize> {
        let len = self.source.len();
        let end = (end as usize).min(len);
        let start = (start as usize).min(end);
        start..end
    }

    fn write_report(&mut self, diag: &Diagnostic) -> io::Result<()> {
        let kind = match diag.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
            Severity::Note => ReportKind::Advice,
        };
        let offset = diag
            .primary_span()
            .map_or(0, |span| self.clamp(span.start, span.end).start);

        let mut report = Report::build(kind, self.path, offset)
            .with_config(
                Config::default()
                    .with_color(self.colors)
                    .with_index_type(IndexType::Byte),
            )
            .with_code(diag.code.as_str())
            .with_message(&diag.message);

        for label in &diag.labels {
            let range = self.clamp(label.span.start, label.span.end);
            let mut report_label = ReportLabel::new((self.path, range)).with_message(&label.message);
            if self.colors {
                report_label = report_label.with_color(if label.is_primary {
                    Color::Red
                } else {
                    Color::Blue
                });
            }
            report = report.with_label(report_label);
        }

        if !diag.notes.is_empty() {
            report = report.with_note(diag.notes.join("\n"));
        }
        if !diag.suggestions.is_empty() {
            report = report.with_help(diag.suggestions.join("\n"));
        }

        report
            .finish()
            .write((self.path, Source::from(self.source)), &mut self.writer)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        if self.write_report(diagnostic).is_err() {
            // ariadne could not render (bad span, closed pipe): plain fallback
            let _ = writeln!(self.writer, "{diagnostic}");
        }
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        let _ = match (error_count, warning_count) {
            (0, 0) => Ok(()),
            (e, 0) => writeln!(self.writer, "error: aborting due to {e} error{}", plural(e)),
            (0, w) => writeln!(self.writer, "warning: {w} warning{} emitted", plural(w)),
            (e, w) => writeln!(
                self.writer,
                "error: aborting due to {e} error{}; {w} warning{} emitted",
                plural(e),
                plural(w)
            ),
        };
        let _ = self.writer.flush();
    }
}

/// Render one diagnostic to a string without colors.
pub fn render_plain(diagnostic: &Diagnostic, path: &str, source: &str) -> String {
    let mut emitter = TerminalEmitter::new(Vec::new(), path, source, ColorMode::Never, false);
    emitter.emit(diagnostic);
    String::from_utf8_lossy(&emitter.into_inner()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use hoist_ir::Span;

    #[test]
    fn test_color_mode() {
        assert!(ColorMode::Auto.should_use_colors(true));
        assert!(!ColorMode::Auto.should_use_colors(false));
        assert!(ColorMode::Always.should_use_colors(false));
        assert!(!ColorMode::Never.should_use_colors(true));
    }

    #[test]
    fn test_render_plain_contains_code_message_and_label() {
        let source = "{\n  const y = 2.5\n}\nconsole.log(y)\n";
        let diag = Diagnostic::error(ErrorCode::E6001)
            .with_message("y is not defined")
            .with_label(Span::new(32, 33), "not found in this scope")
            .with_note("block-scoped bindings are dropped when their block exits");

        let output = render_plain(&diag, "scope.js", source);

        assert!(output.contains("E6001"), "{output}");
        assert!(output.contains("y is not defined"), "{output}");
        assert!(output.contains("scope.js"), "{output}");
        assert!(output.contains("not found in this scope"), "{output}");
        assert!(output.contains("block-scoped bindings"), "{output}");
        assert!(!output.contains("\x1b["), "no ANSI codes expected: {output}");
    }

    #[test]
    fn test_span_past_end_does_not_panic() {
        let diag = Diagnostic::error(ErrorCode::E1002)
            .with_message("expected expression, found end of file")
            .with_label(Span::new(100, 120), "expected expression here");

        let output = render_plain(&diag, "eof.js", "let a =");
        assert!(output.contains("E1002"));
    }

    #[test]
    fn test_summary() {
        let mut emitter = TerminalEmitter::new(Vec::new(), "a.js", "", ColorMode::Never, false);
        emitter.emit_summary(2, 0);
        let output = String::from_utf8(emitter.into_inner()).unwrap_or_default();
        assert_eq!(output, "error: aborting due to 2 errors\n");
    }
}
