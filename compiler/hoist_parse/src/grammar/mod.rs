//! Grammar rules, split by syntactic category.
//!
//! Each submodule adds methods to [`Parser`](crate::Parser).

mod expr;
mod function;
mod stmt;
mod template;
