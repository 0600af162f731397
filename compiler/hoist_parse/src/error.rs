//! Parse errors and "while parsing X" context.

use hoist_diagnostic::{Diagnostic, ErrorCode};
use hoist_ir::Span;
use hoist_lexer::LexError;
use thiserror::Error;

/// Context describing what was being parsed when an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorContext {
    Declaration,
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunction,
    Parameters,
    IfStatement,
    ForLoop,
    WhileLoop,
    Block,
    ArrayLiteral,
    ObjectLiteral,
    TemplateLiteral,
    CallArguments,
    IndexExpression,
}

impl ErrorContext {
    /// Phrase for "while parsing {description}".
    pub fn description(self) -> &'static str {
        match self {
            Self::Declaration => "a variable declaration",
            Self::FunctionDeclaration => "a function declaration",
            Self::FunctionExpression => "a function expression",
            Self::ArrowFunction => "an arrow function",
            Self::Parameters => "a parameter list",
            Self::IfStatement => "an if statement",
            Self::ForLoop => "a for loop",
            Self::WhileLoop => "a while loop",
            Self::Block => "a block",
            Self::ArrayLiteral => "an array literal",
            Self::ObjectLiteral => "an object literal",
            Self::TemplateLiteral => "a template literal",
            Self::CallArguments => "call arguments",
            Self::IndexExpression => "an index expression",
        }
    }
}

/// Parse error with error code for diagnostics.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// Label text at the primary span.
    pub label: Option<String>,
    /// Innermost construct being parsed.
    pub context: Option<ErrorContext>,
    /// Related location, such as the opening delimiter of an unclosed one.
    pub related: Option<(Span, String)>,
    pub help: Vec<String>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            label: None,
            context: None,
            related: None,
            help: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach a context unless an inner rule already attached one.
    #[must_use]
    pub fn in_context(mut self, context: ErrorContext) -> Self {
        self.context.get_or_insert(context);
        self
    }

    #[must_use]
    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related = Some((span, message.into()));
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, self.label.as_deref().unwrap_or("here"));
        if let Some((span, message)) = &self.related {
            diag = diag.with_secondary_label(*span, message);
        }
        if let Some(context) = self.context {
            diag = diag.with_note(format!("while parsing {}", context.description()));
        }
        for help in &self.help {
            diag = diag.with_suggestion(help);
        }
        diag
    }
}

impl From<&LexError> for ParseError {
    fn from(err: &LexError) -> Self {
        ParseError::new(err.code(), err.to_string(), err.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_innermost_context_wins() {
        let err = ParseError::new(ErrorCode::E1002, "expected expression", Span::new(0, 1))
            .in_context(ErrorContext::ArrayLiteral)
            .in_context(ErrorContext::Declaration);
        assert_eq!(err.context, Some(ErrorContext::ArrayLiteral));
    }

    #[test]
    fn test_to_diagnostic() {
        let err = ParseError::new(ErrorCode::E1003, "unclosed delimiter `(`", Span::new(9, 9))
            .with_label("expected `)`")
            .with_related(Span::new(3, 4), "opened here")
            .in_context(ErrorContext::CallArguments);
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E1003);
        assert_eq!(diag.labels.len(), 2);
        assert_eq!(diag.notes, vec!["while parsing call arguments".to_string()]);
    }
}
