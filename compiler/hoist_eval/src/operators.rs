//! Conversions and operators on [`Value`]s.
//!
//! These follow script-language coercion rules for the primitive cases:
//! `+` concatenates as soon as either side is a string, the other
//! arithmetic operators coerce to numbers, and `==` compares across
//! `null`/`undefined`, numbers, strings and booleans.

use std::cmp::Ordering;

use hoist_ir::{ensure_sufficient_stack, format_number, BinaryOp, StringInterner};
use rustc_hash::FxHashSet;

use crate::value::Heap;
use crate::Value;

/// Truthiness for `if`, `while`, `!`, `&&` and `||`.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::Str(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_) => true,
    }
}

/// Numeric conversion (`Number(x)`, unary `+`, arithmetic).
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Undefined | Value::Object(_) | Value::Function(_) | Value::Native(_) => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => *n,
        Value::Str(s) => string_to_number(s),
        Value::Array(items) => {
            let items = items.borrow();
            match items.as_slice() {
                [] => 0.0,
                [only] => to_number(&Value::string(to_display_string(only))),
                _ => f64::NAN,
            }
        }
    }
}

fn string_to_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) => {
            f64::NAN
        }
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

/// String conversion without an interner. Function values need their
/// names, so callers holding an interner use [`to_js_string`].
fn to_display_string(value: &Value) -> String {
    Stringifier::new(None).string(value)
}

/// String conversion (`String(x)`, template holes, concatenation).
pub fn to_js_string(value: &Value, interner: &StringInterner) -> String {
    Stringifier::new(Some(interner)).string(value)
}

/// `Array.prototype.join`: `undefined` and `null` become empty strings.
pub fn join_array(items: &Heap<Vec<Value>>, separator: &str, interner: &StringInterner) -> String {
    Stringifier::new(Some(interner)).join(items, separator)
}

/// Arrays being joined further up. Meeting one again renders it as an
/// empty string, which is how cyclic arrays terminate.
struct Stringifier<'a> {
    interner: Option<&'a StringInterner>,
    joining: FxHashSet<usize>,
}

impl<'a> Stringifier<'a> {
    fn new(interner: Option<&'a StringInterner>) -> Self {
        Stringifier {
            interner,
            joining: FxHashSet::default(),
        }
    }

    fn string(&mut self, value: &Value) -> String {
        match value {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.to_string(),
            Value::Array(items) => self.join(items, ","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(function) => {
                let name = match (self.interner, function.name) {
                    (Some(interner), Some(name)) => interner.lookup(name),
                    _ => "",
                };
                format!("function {name}() {{ [code] }}")
            }
            Value::Native(native) => format!("function {}() {{ [native code] }}", native.name()),
        }
    }

    fn join(&mut self, items: &Heap<Vec<Value>>, separator: &str) -> String {
        let addr = items.addr();
        if !self.joining.insert(addr) {
            return String::new();
        }
        let joined = ensure_sufficient_stack(|| {
            let items = items.borrow();
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(separator);
                }
                if !item.is_nullish() {
                    out.push_str(&self.string(item));
                }
            }
            out
        });
        self.joining.remove(&addr);
        joined
    }
}

/// `===`.
#[inline]
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    left == right
}

/// `==`.
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (l, r) if l.is_nullish() || r.is_nullish() => l.is_nullish() && r.is_nullish(),
        (Value::Number(_), Value::Str(_) | Value::Bool(_))
        | (Value::Str(_) | Value::Bool(_), Value::Number(_))
        | (Value::Bool(_), Value::Str(_))
        | (Value::Str(_), Value::Bool(_)) => to_number(left) == to_number(right),
        (Value::Array(_) | Value::Object(_), Value::Number(_) | Value::Str(_) | Value::Bool(_)) => {
            loose_equals(&Value::string(to_display_string(left)), right)
        }
        (Value::Number(_) | Value::Str(_) | Value::Bool(_), Value::Array(_) | Value::Object(_)) => {
            loose_equals(left, &Value::string(to_display_string(right)))
        }
        _ => strict_equals(left, right),
    }
}

/// Order two strings by UTF-16 code units, as script comparison does.
pub fn compare_strings(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

fn forces_concatenation(value: &Value) -> bool {
    matches!(
        value,
        Value::Str(_) | Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_)
    )
}

/// Apply a binary operator. `&&`/`||` are handled by the caller since they
/// short-circuit.
pub fn binary_op(op: BinaryOp, left: &Value, right: &Value, interner: &StringInterner) -> Value {
    match op {
        BinaryOp::Add => {
            if forces_concatenation(left) || forces_concatenation(right) {
                let mut text = to_js_string(left, interner);
                text.push_str(&to_js_string(right, interner));
                Value::from(text)
            } else {
                Value::Number(to_number(left) + to_number(right))
            }
        }
        BinaryOp::Sub => Value::Number(to_number(left) - to_number(right)),
        BinaryOp::Mul => Value::Number(to_number(left) * to_number(right)),
        BinaryOp::Div => Value::Number(to_number(left) / to_number(right)),
        BinaryOp::Rem => Value::Number(to_number(left) % to_number(right)),
        BinaryOp::Pow => Value::Number(power(to_number(left), to_number(right))),
        BinaryOp::StrictEq => Value::Bool(strict_equals(left, right)),
        BinaryOp::StrictNotEq => Value::Bool(!strict_equals(left, right)),
        BinaryOp::LooseEq => Value::Bool(loose_equals(left, right)),
        BinaryOp::LooseNotEq => Value::Bool(!loose_equals(left, right)),
        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::LtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::GtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
    }
}

/// Relational comparison. `None` when either side is `NaN`.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Value::Str(a), Value::Str(b)) = (left, right) {
        return Some(compare_strings(a, b));
    }
    to_number(left).partial_cmp(&to_number(right))
}

/// `**`. Differs from `f64::powf` for a `NaN` exponent and for a base of
/// magnitude one with an infinite exponent, which both give `NaN`.
pub fn power(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn add(a: Value, b: Value) -> Value {
        let interner = StringInterner::new();
        binary_op(BinaryOp::Add, &a, &b, &interner)
    }

    #[test]
    fn test_plus_concatenates_when_either_side_is_a_string() {
        assert_eq!(add(Value::from("a"), Value::Number(1.0)), Value::from("a1"));
        assert_eq!(add(Value::Number(1.5), Value::from("b")), Value::from("1.5b"));
        assert_eq!(add(Value::Number(1.0), Value::Number(2.0)), Value::Number(3.0));
        assert_eq!(add(Value::Bool(true), Value::Number(1.0)), Value::Number(2.0));
        assert_eq!(
            add(Value::array(vec![Value::Number(1.0), Value::Number(2.0)]), Value::from("")),
            Value::from("1,2")
        );
    }

    #[test]
    fn test_truthiness() {
        assert!(!truthy(&Value::Number(0.0)));
        assert!(!truthy(&Value::Number(f64::NAN)));
        assert!(!truthy(&Value::from("")));
        assert!(truthy(&Value::from("0")));
        assert!(truthy(&Value::array(vec![])));
        assert!(!truthy(&Value::Null));
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&Value::from(" 42 ")), 42.0);
        assert_eq!(to_number(&Value::from("")), 0.0);
        assert!(to_number(&Value::from("12px")).is_nan());
        assert_eq!(to_number(&Value::from("1e3")), 1000.0);
        assert_eq!(to_number(&Value::Null), 0.0);
        assert!(to_number(&Value::Undefined).is_nan());
        assert_eq!(to_number(&Value::array(vec![Value::from("7")])), 7.0);
    }

    #[test]
    fn test_loose_equality() {
        assert!(loose_equals(&Value::Null, &Value::Undefined));
        assert!(!loose_equals(&Value::Null, &Value::Number(0.0)));
        assert!(loose_equals(&Value::from("1"), &Value::Number(1.0)));
        assert!(loose_equals(&Value::Bool(true), &Value::Number(1.0)));
        assert!(!strict_equals(&Value::from("1"), &Value::Number(1.0)));
    }

    #[test]
    fn test_relational_on_strings_and_nan() {
        let interner = StringInterner::new();
        let lt = |a: Value, b: Value| binary_op(BinaryOp::Lt, &a, &b, &interner);
        assert_eq!(lt(Value::from("apple"), Value::from("banana")), Value::Bool(true));
        assert_eq!(lt(Value::from("10"), Value::from("9")), Value::Bool(true));
        assert_eq!(lt(Value::from("10"), Value::Number(9.0)), Value::Bool(false));
        assert_eq!(lt(Value::Number(f64::NAN), Value::Number(1.0)), Value::Bool(false));
    }

    #[test]
    fn test_power_edge_cases() {
        assert_eq!(power(2.0, 10.0), 1024.0);
        assert!(power(1.0, f64::INFINITY).is_nan());
        assert!(power(2.0, f64::NAN).is_nan());
        assert_eq!(power(f64::NAN, 0.0), 1.0);
    }

    #[test]
    fn test_remainder_keeps_dividend_sign() {
        let interner = StringInterner::new();
        let rem = binary_op(BinaryOp::Rem, &Value::Number(-7.0), &Value::Number(3.0), &interner);
        assert_eq!(rem, Value::Number(-1.0));
    }
}
