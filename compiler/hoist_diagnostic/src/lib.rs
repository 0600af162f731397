//! Diagnostic system for error reporting.
//!
//! Every phase (lexer, parser, interpreter) converts its typed errors into a
//! [`Diagnostic`]:
//! - an [`ErrorCode`] for searchability (`hoist explain E6001`)
//! - a message saying what went wrong
//! - a primary label saying where
//! - optional notes and suggestions
//!
//! The [`emitter`] renders diagnostics against the source file.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod errors;
pub mod span_utils;

pub use diagnostic::{
    expected_expression, unclosed_delimiter, unexpected_token, unresolved_identifier, Diagnostic,
    Label, Severity,
};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
