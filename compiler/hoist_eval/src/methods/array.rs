//! Array methods.
//!
//! Callbacks get `(element, index, array)`. Iteration covers the elements
//! present when the method started; no borrow of the array is held while a
//! callback runs, so callbacks may read or modify the array freely.

use std::cmp::Ordering;

use hoist_ir::Span;

use super::relative_index;
use crate::errors::{custom, not_callable, reduce_of_empty_array, EvalResult};
use crate::format::inspect;
use crate::interpreter::Interpreter;
use crate::operators::{compare_strings, join_array, strict_equals, to_js_string, to_number, truthy};
use crate::value::Heap;
use crate::Value;

type Items = Heap<Vec<Value>>;

#[expect(clippy::cast_precision_loss, reason = "array indices fit in f64")]
fn index_value(index: usize) -> Value {
    Value::Number(index as f64)
}

/// `includes` equality: like `===`, except `NaN` matches `NaN`.
fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => strict_equals(a, b),
    }
}

impl Interpreter<'_> {
    pub(super) fn call_array_method(
        &mut self,
        items: &Items,
        name: &str,
        args: &[Value],
        span: Span,
    ) -> Option<EvalResult> {
        Some(match name {
            "forEach" => self.array_for_each(items, args, span),
            "map" => self.array_map(items, args, span),
            "filter" => self.array_filter(items, args, span),
            "find" => self
                .array_find(items, args, span)
                .map(|found| found.map_or(Value::Undefined, |(_, element)| element)),
            "findIndex" => self
                .array_find(items, args, span)
                .map(|found| found.map_or(Value::Number(-1.0), |(index, _)| index_value(index))),
            "some" => self.array_find(items, args, span).map(|found| Value::Bool(found.is_some())),
            "every" => self.array_every(items, args, span),
            "sort" => self.array_sort(items, args, span),
            "reduce" => self.array_reduce(items, args, span),
            "push" => {
                let mut items = items.borrow_mut();
                items.extend(args.iter().cloned());
                Ok(index_value(items.len()))
            }
            "pop" => Ok(items.borrow_mut().pop().unwrap_or(Value::Undefined)),
            "includes" => {
                let needle = args.first().unwrap_or(&Value::Undefined);
                Ok(Value::Bool(
                    items.borrow().iter().any(|item| same_value_zero(item, needle)),
                ))
            }
            "indexOf" => {
                let needle = args.first().unwrap_or(&Value::Undefined);
                let position = items.borrow().iter().position(|item| strict_equals(item, needle));
                Ok(position.map_or(Value::Number(-1.0), index_value))
            }
            "join" => {
                let separator = match args.first() {
                    None | Some(Value::Undefined) => ",".to_string(),
                    Some(sep) => to_js_string(sep, self.interner),
                };
                Ok(Value::from(join_array(items, &separator, self.interner)))
            }
            "slice" => {
                let items = items.borrow();
                let start = relative_index(args.first(), items.len(), 0);
                let end = relative_index(args.get(1), items.len(), items.len());
                let slice = items.get(start..end.max(start)).unwrap_or_default();
                Ok(Value::array(slice.to_vec()))
            }
            _ => return None,
        })
    }

    /// The callback argument, checked up front so an empty array still
    /// reports a bad callback.
    fn callback_arg(&self, args: &[Value], span: Span) -> EvalResult<Value> {
        let callback = args.first().cloned().unwrap_or(Value::Undefined);
        if callback.is_callable() {
            Ok(callback)
        } else {
            Err(not_callable(inspect(&callback, self.interner)).with_span(span))
        }
    }

    /// Call `callback(element, index, array)` for element `index`, or
    /// return `None` if the array has shrunk below it.
    fn visit(
        &mut self,
        items: &Items,
        callback: &Value,
        index: usize,
        span: Span,
    ) -> EvalResult<Option<(Value, Value)>> {
        let Some(element) = items.borrow().get(index).cloned() else {
            return Ok(None);
        };
        let args = [element.clone(), index_value(index), Value::Array(items.clone())];
        let result = self.call_callback(callback, &args, span)?;
        Ok(Some((element, result)))
    }

    fn array_for_each(&mut self, items: &Items, args: &[Value], span: Span) -> EvalResult {
        let callback = self.callback_arg(args, span)?;
        let len = items.borrow().len();
        for index in 0..len {
            if self.visit(items, &callback, index, span)?.is_none() {
                break;
            }
        }
        Ok(Value::Undefined)
    }

    fn array_map(&mut self, items: &Items, args: &[Value], span: Span) -> EvalResult {
        let callback = self.callback_arg(args, span)?;
        let len = items.borrow().len();
        let mut mapped = Vec::with_capacity(len);
        for index in 0..len {
            match self.visit(items, &callback, index, span)? {
                Some((_, result)) => mapped.push(result),
                None => break,
            }
        }
        mapped.resize(len, Value::Undefined);
        Ok(Value::array(mapped))
    }

    fn array_filter(&mut self, items: &Items, args: &[Value], span: Span) -> EvalResult {
        let callback = self.callback_arg(args, span)?;
        let len = items.borrow().len();
        let mut kept = Vec::new();
        for index in 0..len {
            match self.visit(items, &callback, index, span)? {
                Some((element, result)) if truthy(&result) => kept.push(element),
                Some(_) => {}
                None => break,
            }
        }
        Ok(Value::array(kept))
    }

    /// First element whose callback result is truthy. Shared by `find`,
    /// `findIndex` and `some`.
    fn array_find(
        &mut self,
        items: &Items,
        args: &[Value],
        span: Span,
    ) -> EvalResult<Option<(usize, Value)>> {
        let callback = self.callback_arg(args, span)?;
        let len = items.borrow().len();
        for index in 0..len {
            match self.visit(items, &callback, index, span)? {
                Some((element, result)) if truthy(&result) => return Ok(Some((index, element))),
                Some(_) => {}
                None => break,
            }
        }
        Ok(None)
    }

    fn array_every(&mut self, items: &Items, args: &[Value], span: Span) -> EvalResult {
        let callback = self.callback_arg(args, span)?;
        let len = items.borrow().len();
        for index in 0..len {
            match self.visit(items, &callback, index, span)? {
                Some((_, result)) if !truthy(&result) => return Ok(Value::Bool(false)),
                Some(_) => {}
                None => break,
            }
        }
        Ok(Value::Bool(true))
    }

    /// `reduce(callback, initial?)`. Without an initial value the first
    /// element seeds the accumulator, and an empty array is an error.
    fn array_reduce(&mut self, items: &Items, args: &[Value], span: Span) -> EvalResult {
        let callback = self.callback_arg(args, span)?;
        let len = items.borrow().len();
        let (mut acc, start) = match args.get(1) {
            Some(initial) => (initial.clone(), 0),
            None => match items.borrow().first() {
                Some(first) => (first.clone(), 1),
                None => return Err(reduce_of_empty_array().with_span(span)),
            },
        };
        for index in start..len {
            let Some(element) = items.borrow().get(index).cloned() else {
                break;
            };
            let call_args = [acc, element, index_value(index), Value::Array(items.clone())];
            acc = self.call_callback(&callback, &call_args, span)?;
        }
        Ok(acc)
    }

    /// In-place stable sort. Without a comparator elements compare as
    /// strings; `undefined` always sorts last.
    fn array_sort(&mut self, items: &Items, args: &[Value], span: Span) -> EvalResult {
        let comparator = match args.first() {
            None | Some(Value::Undefined) => None,
            Some(f) if f.is_callable() => Some(f.clone()),
            Some(_) => {
                return Err(custom(
                    "The comparison function must be either a function or undefined",
                )
                .with_span(span))
            }
        };

        let snapshot = items.borrow().clone();
        let (mut defined, undefined): (Vec<Value>, Vec<Value>) = snapshot
            .into_iter()
            .partition(|v| !matches!(v, Value::Undefined));

        let interner = self.interner;
        defined = merge_sort(defined, &mut |a: &Value, b: &Value| match &comparator {
            Some(compare) => {
                let result = self.call_callback(compare, &[a.clone(), b.clone()], span)?;
                let n = to_number(&result);
                Ok(if n < 0.0 {
                    Ordering::Less
                } else if n > 0.0 {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                })
            }
            None => Ok(compare_strings(
                &to_js_string(a, interner),
                &to_js_string(b, interner),
            )),
        })?;
        defined.extend(undefined);

        *items.borrow_mut() = defined;
        Ok(Value::Array(items.clone()))
    }
}

/// Stable top-down merge sort with a fallible comparator. Tolerates
/// comparators that are not a consistent order, which script code often
/// passes.
fn merge_sort(
    mut items: Vec<Value>,
    compare: &mut impl FnMut(&Value, &Value) -> EvalResult<Ordering>,
) -> EvalResult<Vec<Value>> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare)?;
    let right = merge_sort(right, compare)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        // Take from the right only when the left is strictly greater.
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r)? == Ordering::Greater,
            _ => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}
