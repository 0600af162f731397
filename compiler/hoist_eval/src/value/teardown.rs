//! Iterative destruction of reference values.
//!
//! Drop glue frees nested data by recursing once per level, so a long
//! linked list of records would exhaust the stack. Instead, the last handle
//! to an array, object, closure or scope moves its children onto a
//! worklist that is drained in a loop. A container is always emptied
//! before it is freed, which keeps every drop at most one level deep.

#![expect(
    clippy::disallowed_types,
    reason = "closures are Rc<FunctionValue>; unwrapping one reaches its scope"
)]

use std::rc::Rc;

use super::HeapPayload;
use crate::environment::{LocalScope, Scope};
use crate::Value;

enum Pending {
    Value(Value),
    Scope(LocalScope<Scope>),
}

/// Worklist of values and scopes waiting to be emptied.
#[derive(Default)]
pub struct Teardown {
    pending: Vec<Pending>,
}

impl Teardown {
    /// Queue the values that own further data. Primitives drop here.
    pub(crate) fn push_values(&mut self, values: impl IntoIterator<Item = Value>) {
        self.pending.extend(
            values
                .into_iter()
                .filter(|value| {
                    matches!(
                        value,
                        Value::Array(_) | Value::Object(_) | Value::Function(_)
                    )
                })
                .map(Pending::Value),
        );
    }

    pub(crate) fn push_scope(&mut self, scope: LocalScope<Scope>) {
        self.pending.push(Pending::Scope(scope));
    }

    pub(crate) fn run(mut self) {
        while let Some(next) = self.pending.pop() {
            match next {
                Pending::Value(value) => self.release_value(value),
                Pending::Scope(scope) => self.release_scope(scope),
            }
        }
    }

    /// Empty `value` if this is its last handle. Shared values only lose a
    /// reference.
    fn release_value(&mut self, value: Value) {
        match value {
            Value::Array(items) => {
                if let Some(items) = items.take_unique() {
                    items.release(self);
                }
            }
            Value::Object(object) => {
                if let Some(object) = object.take_unique() {
                    object.release(self);
                }
            }
            Value::Function(function) => {
                if let Ok(function) = Rc::try_unwrap(function) {
                    self.push_scope(function.env);
                }
            }
            _ => {}
        }
    }

    fn release_scope(&mut self, scope: LocalScope<Scope>) {
        if !scope.is_unique() {
            return;
        }
        if let Ok(mut scope) = scope.try_borrow_mut() {
            scope.drain_into(self);
        }
    }
}
