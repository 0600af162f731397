//! Hoist IR - shared data types for every phase.
//!
//! - [`Span`]: byte ranges into the source file
//! - [`Name`] / [`StringInterner`]: interned identifiers and string literals
//! - [`Token`] / [`TokenList`]: lexer output consumed by the parser
//! - [`ExprArena`] / [`Module`]: the arena-allocated syntax tree
//! - [`format_number`]: how numbers read as strings
//!
//! Nodes reference each other through compact ids (`ExprId`, `StmtId`,
//! `FunctionId`) and ranges into flattened side tables, so the whole program
//! lives in a single arena that the interpreter borrows.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod interner;
mod name;
mod number;
mod span;
mod stack;
mod token;

pub use ast::{
    BinaryOp, DeclKind, Declarator, DeclaratorRange, Expr, ExprArena, ExprId, ExprKind,
    ExprRange, FunctionBody, FunctionDef, FunctionId, FunctionKind, LogicalOp, Module, Property,
    PropertyRange, Stmt, StmtId, StmtKind, StmtRange, TemplatePart, TemplateRange, UnaryOp,
    UpdateOp,
};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use number::format_number;
pub use span::{Span, SpanError};
pub use stack::ensure_sufficient_stack;
pub use token::{Token, TokenFlags, TokenKind, TokenList};
