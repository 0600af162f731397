//! `console.log` rendering.
//!
//! Output matches what Node.js prints for the same values on one line:
//! strings inside containers are quoted, containers nested deeper than two
//! levels collapse to `[Object]`/`[Array]`, and cycles print as
//! `[Circular *n]` with a `<ref *n>` marker on the target.

use hoist_ir::{format_number, StringInterner};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::Value;

/// Containers deeper than this print as `[Object]` / `[Array]`.
const MAX_DEPTH: usize = 2;

/// Render the arguments of one `console.log` call.
pub fn format_log_line(args: &[Value], interner: &StringInterner) -> String {
    let mut line = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        match arg {
            Value::Str(s) => line.push_str(s),
            other => line.push_str(&inspect(other, interner)),
        }
    }
    line
}

/// Render a single value the way it appears nested inside a container.
pub fn inspect(value: &Value, interner: &StringInterner) -> String {
    let mut inspector = Inspector {
        interner,
        stack: SmallVec::new(),
        refs: FxHashMap::default(),
    };
    inspector.value(value, 0)
}

struct Inspector<'a> {
    interner: &'a StringInterner,
    /// Addresses of the containers currently being printed.
    stack: SmallVec<[usize; 8]>,
    /// Cycle targets and their `*n` labels.
    refs: FxHashMap<usize, usize>,
}

impl Inspector<'_> {
    fn value(&mut self, value: &Value, depth: usize) -> String {
        match value {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) if *n == 0.0 && n.is_sign_negative() => "-0".to_string(),
            Value::Number(n) => format_number(*n),
            Value::Str(s) => quote(s),
            Value::Function(function) => match function.name {
                Some(name) => format!("[Function: {}]", self.interner.lookup(name)),
                None => "[Function (anonymous)]".to_string(),
            },
            Value::Native(native) => format!("[Function: {}]", native.name()),
            Value::Array(items) => {
                let addr = items.addr();
                let items = items.borrow();
                self.container(addr, depth, "[Array]", ('[', ']'), |this| {
                    items.iter().map(|item| this.value(item, depth + 1)).collect()
                })
            }
            Value::Object(object) => {
                let addr = object.addr();
                let object = object.borrow();
                self.container(addr, depth, "[Object]", ('{', '}'), |this| {
                    object
                        .entries()
                        .iter()
                        .map(|(key, item)| {
                            let key = property_key(this.interner.lookup(*key));
                            format!("{key}: {}", this.value(item, depth + 1))
                        })
                        .collect()
                })
            }
        }
    }

    fn container(
        &mut self,
        addr: usize,
        depth: usize,
        collapsed: &str,
        (open, close): (char, char),
        render_items: impl FnOnce(&mut Self) -> Vec<String>,
    ) -> String {
        if self.stack.contains(&addr) {
            let next = self.refs.len() + 1;
            let id = *self.refs.entry(addr).or_insert(next);
            return format!("[Circular *{id}]");
        }
        if depth > MAX_DEPTH {
            return collapsed.to_string();
        }

        self.stack.push(addr);
        let items = render_items(self);
        self.stack.pop();

        let body = if items.is_empty() {
            format!("{open}{close}")
        } else {
            format!("{open} {} {close}", items.join(", "))
        };
        match self.refs.get(&addr) {
            Some(id) => format!("<ref *{id}> {body}"),
            None => body,
        }
    }
}

/// Quote a string the way Node does: single quotes unless the text
/// contains one.
fn quote(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Identifier-like keys print bare; anything else is quoted.
fn property_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        key.to_string()
    } else {
        quote(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObjectValue;
    use pretty_assertions::assert_eq;

    fn numbers(values: &[f64]) -> Value {
        Value::array(values.iter().copied().map(Value::Number).collect())
    }

    #[test]
    fn test_top_level_strings_print_raw() {
        let interner = StringInterner::new();
        let line = format_log_line(
            &[Value::from("total:"), Value::Number(3.0), Value::from("it's")],
            &interner,
        );
        assert_eq!(line, "total: 3 it's");
    }

    #[test]
    fn test_arrays_and_nested_strings() {
        let interner = StringInterner::new();
        assert_eq!(inspect(&numbers(&[1.0, 2.0, 3.0]), &interner), "[ 1, 2, 3 ]");
        assert_eq!(inspect(&numbers(&[]), &interner), "[]");
        let mixed = Value::array(vec![Value::from("a"), Value::from("it's"), Value::Null]);
        assert_eq!(inspect(&mixed, &interner), "[ 'a', \"it's\", null ]");
    }

    #[test]
    fn test_objects_quote_non_identifier_keys() {
        let interner = StringInterner::new();
        let mut object = ObjectValue::new();
        object.set(interner.intern("name"), Value::from("Ann"));
        object.set(interner.intern("first name"), Value::Number(1.0));
        assert_eq!(
            inspect(&Value::object(object), &interner),
            "{ name: 'Ann', 'first name': 1 }"
        );
        assert_eq!(inspect(&Value::object(ObjectValue::new()), &interner), "{}");
    }

    #[test]
    fn test_depth_limit_collapses_containers() {
        let interner = StringInterner::new();
        let deep = Value::array(vec![Value::array(vec![Value::array(vec![numbers(&[
            1.0,
        ])])])]);
        assert_eq!(inspect(&deep, &interner), "[ [ [ [Array] ] ] ]");
    }

    #[test]
    fn test_cycles_are_labelled() {
        let interner = StringInterner::new();
        let array = Value::array(vec![Value::Number(1.0)]);
        if let Value::Array(items) = &array {
            items.borrow_mut().push(array.clone());
        }
        assert_eq!(inspect(&array, &interner), "<ref *1> [ 1, [Circular *1] ]");
    }

    #[test]
    fn test_negative_zero() {
        let interner = StringInterner::new();
        assert_eq!(inspect(&Value::Number(-0.0), &interner), "-0");
    }
}
