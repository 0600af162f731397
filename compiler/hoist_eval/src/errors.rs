//! Runtime errors and their diagnostics.
//!
//! Every failure the interpreter can report is an [`EvalErrorKind`]. The
//! constructors below are the single place messages are worded; each kind
//! maps to an `E6xxx` code for `hoist explain`.

use std::fmt;

use hoist_diagnostic::{Diagnostic, ErrorCode};
use hoist_ir::Span;
use thiserror::Error;

/// Which rule an invalid assignment or access broke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignmentFault {
    /// The binding is still in its dead zone.
    BeforeInitialization,
    /// The binding is an initialized `const`.
    ConstantReassignment,
}

/// Whether a property access on `undefined`/`null` was a read or a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyAccess {
    Read,
    Write,
}

impl PropertyAccess {
    fn verbs(self) -> (&'static str, &'static str) {
        match self {
            PropertyAccess::Read => ("read", "reading"),
            PropertyAccess::Write => ("set", "setting"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    #[error("{name} is not defined")]
    UnresolvedIdentifier { name: String },

    #[error("{}", invalid_assignment_message(name, *fault))]
    InvalidAssignment {
        name: String,
        fault: AssignmentFault,
    },

    #[error("Identifier '{name}' has already been declared")]
    DuplicateDeclaration { name: String },

    #[error("{callee} is not a function")]
    NotCallable { callee: String },

    #[error(
        "Cannot {} properties of {base} ({} '{property}')",
        access.verbs().0,
        access.verbs().1
    )]
    PropertyOfNullish {
        property: String,
        base: &'static str,
        access: PropertyAccess,
    },

    #[error("Reduce of empty array with no initial value")]
    ReduceOfEmptyArray,

    #[error("Maximum call stack size exceeded")]
    StackOverflow { depth: usize },

    #[error("{message}")]
    Custom { message: String },
}

fn invalid_assignment_message(name: &str, fault: AssignmentFault) -> String {
    match fault {
        AssignmentFault::BeforeInitialization => {
            format!("Cannot access '{name}' before initialization")
        }
        AssignmentFault::ConstantReassignment => {
            format!("Assignment to constant variable '{name}'")
        }
    }
}

impl EvalErrorKind {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnresolvedIdentifier { .. } => ErrorCode::E6001,
            Self::InvalidAssignment { .. } => ErrorCode::E6002,
            Self::DuplicateDeclaration { .. } => ErrorCode::E6003,
            Self::NotCallable { .. } => ErrorCode::E6004,
            Self::PropertyOfNullish { .. } => ErrorCode::E6005,
            Self::ReduceOfEmptyArray => ErrorCode::E6006,
            Self::StackOverflow { .. } => ErrorCode::E6007,
            Self::Custom { .. } => ErrorCode::E6099,
        }
    }

    /// Short label for the primary span.
    pub fn primary_label(&self) -> &'static str {
        match self {
            Self::UnresolvedIdentifier { .. } => "not found in this scope",
            Self::InvalidAssignment {
                fault: AssignmentFault::BeforeInitialization,
                ..
            } => "used before its declaration runs",
            Self::InvalidAssignment {
                fault: AssignmentFault::ConstantReassignment,
                ..
            } => "cannot assign twice to a constant",
            Self::DuplicateDeclaration { .. } => "declared again here",
            Self::NotCallable { .. } => "not callable",
            Self::PropertyOfNullish { .. } => "this value is null or undefined",
            Self::ReduceOfEmptyArray => "array is empty",
            Self::StackOverflow { .. } => "recursion limit exceeded",
            Self::Custom { .. } => "runtime error",
        }
    }

    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::UnresolvedIdentifier { name } => Some(format!(
                "declare `{name}` with `let`, `const` or `var` before using it"
            )),
            Self::InvalidAssignment {
                name,
                fault: AssignmentFault::BeforeInitialization,
            } => Some(format!("move the use of `{name}` below its declaration")),
            Self::InvalidAssignment {
                name,
                fault: AssignmentFault::ConstantReassignment,
            } => Some(format!("declare `{name}` with `let` if it needs to change")),
            Self::DuplicateDeclaration { name } => {
                Some(format!("rename one of the `{name}` declarations"))
            }
            Self::ReduceOfEmptyArray => {
                Some("pass an initial value as the second argument to `reduce`".to_string())
            }
            Self::StackOverflow { depth } => Some(format!(
                "the limit is {depth} nested calls; check the recursion's base case"
            )),
            _ => None,
        }
    }
}

/// A runtime error with the source location it was raised at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Option<Span>,
    pub notes: Vec<String>,
}

pub type EvalResult<T = crate::Value> = Result<T, EvalError>;

impl EvalError {
    #[cold]
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            span: None,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn error_code(&self) -> ErrorCode {
        self.kind.error_code()
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.kind.error_code()).with_message(self.to_string());
        if let Some(span) = self.span {
            diag = diag.with_label(span, self.kind.primary_label());
        }
        for note in &self.notes {
            diag = diag.with_note(note);
        }
        if let Some(suggestion) = self.kind.suggestion() {
            diag = diag.with_suggestion(suggestion);
        }
        diag
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for EvalError {}

#[cold]
pub fn unresolved_identifier(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnresolvedIdentifier {
        name: name.to_string(),
    })
}

#[cold]
pub fn uninitialized_access(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidAssignment {
        name: name.to_string(),
        fault: AssignmentFault::BeforeInitialization,
    })
}

#[cold]
pub fn constant_reassignment(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidAssignment {
        name: name.to_string(),
        fault: AssignmentFault::ConstantReassignment,
    })
}

#[cold]
pub fn duplicate_declaration(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateDeclaration {
        name: name.to_string(),
    })
}

#[cold]
pub fn not_callable(callee: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        callee: callee.into(),
    })
}

#[cold]
pub fn property_of_nullish(property: &str, base: &'static str, access: PropertyAccess) -> EvalError {
    EvalError::from_kind(EvalErrorKind::PropertyOfNullish {
        property: property.to_string(),
        base,
        access,
    })
}

#[cold]
pub fn reduce_of_empty_array() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ReduceOfEmptyArray)
}

#[cold]
pub fn stack_overflow(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

#[cold]
pub fn custom(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Custom {
        message: message.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_messages_match_script_engines() {
        assert_eq!(unresolved_identifier("y").to_string(), "y is not defined");
        assert_eq!(
            uninitialized_access("x").to_string(),
            "Cannot access 'x' before initialization"
        );
        assert_eq!(
            constant_reassignment("x").to_string(),
            "Assignment to constant variable 'x'"
        );
        assert_eq!(
            duplicate_declaration("a").to_string(),
            "Identifier 'a' has already been declared"
        );
        assert_eq!(
            property_of_nullish("name", "undefined", PropertyAccess::Read).to_string(),
            "Cannot read properties of undefined (reading 'name')"
        );
        assert_eq!(
            property_of_nullish("x", "null", PropertyAccess::Write).to_string(),
            "Cannot set properties of null (setting 'x')"
        );
    }

    #[test]
    fn test_diagnostic_carries_code_label_and_help() {
        let diag = unresolved_identifier("y")
            .with_span(Span::new(4, 5))
            .with_note("declared inside a block")
            .to_diagnostic();

        assert_eq!(diag.code, ErrorCode::E6001);
        assert_eq!(diag.message, "y is not defined");
        assert_eq!(diag.primary_span(), Some(Span::new(4, 5)));
        assert_eq!(diag.notes, vec!["declared inside a block".to_string()]);
        assert_eq!(diag.suggestions.len(), 1);
    }

    #[test]
    fn test_every_kind_has_a_runtime_code() {
        let errors = [
            unresolved_identifier("a"),
            uninitialized_access("a"),
            constant_reassignment("a"),
            duplicate_declaration("a"),
            not_callable("a"),
            property_of_nullish("a", "undefined", PropertyAccess::Read),
            reduce_of_empty_array(),
            stack_overflow(10),
            custom("a"),
        ];
        for err in errors {
            assert!(err.error_code().is_runtime_error(), "{err}");
        }
    }
}
