//! Built-in methods on arrays, strings and numbers.
//!
//! The receiver types are fixed, so dispatch is a match on the receiver and
//! the method name rather than a lookup table. A name that isn't a built-in
//! falls back to an ordinary property read on the receiver.

mod array;
mod number;
mod string;

use hoist_ir::{Name, Span};

use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::operators::to_number;
use crate::Value;

/// Resolve a possibly negative relative index (`slice(-2)`) against `len`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "the value is clamped to 0..=len before the cast"
)]
pub(crate) fn relative_index(arg: Option<&Value>, len: usize, default: usize) -> usize {
    let Some(arg) = arg.filter(|v| !matches!(v, Value::Undefined)) else {
        return default;
    };
    let n = to_number(arg);
    let n = if n.is_nan() { 0.0 } else { n.trunc() };
    let len_f = len as f64;
    let resolved = if n < 0.0 { (len_f + n).max(0.0) } else { n.min(len_f) };
    resolved as usize
}

impl Interpreter<'_> {
    /// Call `receiver.method(args)` when it names a built-in method.
    ///
    /// Returns `None` when the receiver has no built-in of that name.
    #[tracing::instrument(level = "trace", skip_all, fields(method = self.name_str(method)))]
    pub(crate) fn call_builtin_method(
        &mut self,
        receiver: &Value,
        method: Name,
        args: &[Value],
        span: Span,
    ) -> Option<EvalResult> {
        let name = self.name_str(method);
        match receiver {
            Value::Array(items) => self.call_array_method(items, name, args, span),
            Value::Str(text) => self.call_string_method(text, name, args),
            Value::Number(n) => number::call_number_method(*n, name, args, span),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_index() {
        assert_eq!(relative_index(None, 5, 0), 0);
        assert_eq!(relative_index(Some(&Value::Number(2.0)), 5, 0), 2);
        assert_eq!(relative_index(Some(&Value::Number(-2.0)), 5, 0), 3);
        assert_eq!(relative_index(Some(&Value::Number(-9.0)), 5, 0), 0);
        assert_eq!(relative_index(Some(&Value::Number(9.0)), 5, 0), 5);
        assert_eq!(relative_index(Some(&Value::Undefined), 5, 5), 5);
        assert_eq!(relative_index(Some(&Value::Number(1.7)), 5, 0), 1);
    }
}
