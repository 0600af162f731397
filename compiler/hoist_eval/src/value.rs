//! Runtime values.
//!
//! Primitives are stored inline. Arrays and objects live behind [`Heap`], a
//! shared mutable handle, so aliasing works the way scripts expect: pushing
//! to an array through one variable is visible through every other.

#![expect(
    clippy::disallowed_types,
    reason = "Rc is the implementation of Heap<T> and shared script strings"
)]

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use hoist_ir::{FunctionId, Name};
use rustc_hash::FxHashMap;

use crate::builtins::NativeFunction;
use crate::environment::{LocalScope, Scope};

mod teardown;

pub use teardown::Teardown;

/// Contents of a [`Heap`] cell: array elements or object entries.
pub trait HeapPayload: Default {
    /// Hand every child value to `teardown`.
    fn release(self, teardown: &mut Teardown);
}

impl HeapPayload for Vec<Value> {
    fn release(self, teardown: &mut Teardown) {
        teardown.push_values(self);
    }
}

impl HeapPayload for ObjectValue {
    fn release(self, teardown: &mut Teardown) {
        teardown.push_values(self.entries.into_iter().map(|(_, value)| value));
    }
}

/// Shared, mutable storage for reference values.
#[repr(transparent)]
pub struct Heap<T: HeapPayload>(Rc<RefCell<T>>);

impl<T: HeapPayload> Heap<T> {
    pub fn new(value: T) -> Self {
        Heap(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Identity comparison.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable address, used to detect cycles while formatting.
    #[inline]
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Move the contents out when this is the only handle, leaving the
    /// default behind.
    fn take_unique(&self) -> Option<T> {
        if Rc::strong_count(&self.0) != 1 {
            return None;
        }
        self.0
            .try_borrow_mut()
            .ok()
            .map(|mut payload| std::mem::take(&mut *payload))
    }
}

impl<T: HeapPayload> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

/// The last handle releases its contents iteratively, so nesting depth is
/// bounded by memory rather than by the stack.
impl<T: HeapPayload> Drop for Heap<T> {
    fn drop(&mut self) {
        if let Some(payload) = self.take_unique() {
            let mut teardown = Teardown::default();
            payload.release(&mut teardown);
            teardown.run();
        }
    }
}

impl<T: HeapPayload + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.borrow().fmt(f)
    }
}

/// A record: string keys in insertion order.
#[derive(Clone, Debug, Default)]
pub struct ObjectValue {
    entries: Vec<(Name, Value)>,
    index: FxHashMap<Name, usize>,
}

impl ObjectValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: Name) -> Option<&Value> {
        self.index.get(&key).map(|&i| &self.entries[i].1)
    }

    /// Insert or overwrite. A new key goes to the end; an existing key keeps
    /// its position.
    pub fn set(&mut self, key: Name, value: Value) {
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].1 = value;
        } else {
            self.index.insert(key, self.entries.len());
            self.entries.push((key, value));
        }
    }

    pub fn entries(&self) -> &[(Name, Value)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A script function: code plus the scope it was created in.
pub struct FunctionValue {
    pub id: FunctionId,
    /// Declared name, or the name inferred from the binding it was first
    /// assigned to. Used for printing and error messages.
    pub name: Option<Name>,
    /// The defining scope. Read on every call, so later writes to captured
    /// variables are visible.
    pub env: LocalScope<Scope>,
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(Heap<Vec<Value>>),
    Object(Heap<ObjectValue>),
    Function(Rc<FunctionValue>),
    Native(NativeFunction),
}

impl Value {
    pub fn string(text: impl Into<Rc<str>>) -> Self {
        Value::Str(text.into())
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    pub fn object(object: ObjectValue) -> Self {
        Value::Object(Heap::new(object))
    }

    pub fn function(function: FunctionValue) -> Self {
        Value::Function(Rc::new(function))
    }

    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Native(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// `typeof` result.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) | Value::Native(_) => "function",
        }
    }
}

/// Strict equality (`===`): primitives by value, everything else by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrays_compare_by_identity() {
        let a = Value::array(vec![Value::Number(1.0)]);
        let b = Value::array(vec![Value::Number(1.0)]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_nan_is_not_equal_to_itself() {
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_object_keeps_insertion_order_on_overwrite() {
        let interner = hoist_ir::StringInterner::new();
        let (a, b) = (interner.intern("a"), interner.intern("b"));
        let mut object = ObjectValue::new();
        object.set(a, Value::Number(1.0));
        object.set(b, Value::Number(2.0));
        object.set(a, Value::Number(3.0));

        let keys: Vec<_> = object.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![a, b]);
        assert_eq!(object.get(a), Some(&Value::Number(3.0)));
    }

    #[test]
    fn test_dropping_deeply_nested_values() {
        let interner = hoist_ir::StringInterner::new();
        let next = interner.intern("next");

        let mut list = Value::Null;
        let mut nested = Value::array(vec![]);
        for _ in 0..500_000 {
            let mut node = ObjectValue::new();
            node.set(next, list);
            list = Value::object(node);
            nested = Value::array(vec![nested]);
        }
        drop(list);
        drop(nested);
    }

    #[test]
    fn test_shared_child_survives_parent_drop() {
        let child = Value::array(vec![Value::Number(1.0)]);
        let parent = Value::array(vec![child.clone(), child.clone()]);
        drop(parent);

        let Value::Array(items) = &child else {
            panic!("expected an array");
        };
        assert_eq!(items.borrow().as_slice(), &[Value::Number(1.0)]);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "object");
        assert_eq!(Value::array(vec![]).type_name(), "object");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::Undefined.type_name(), "undefined");
    }
}
