//! String methods. Positions and lengths count UTF-16 code units, like
//! the rest of the string API.

use super::relative_index;
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::operators::{to_js_string, to_number};
use crate::Value;

#[expect(clippy::cast_precision_loss, reason = "string offsets fit in f64")]
fn utf16_position(text: &str, byte_offset: usize) -> Value {
    Value::Number(text[..byte_offset].encode_utf16().count() as f64)
}

/// The `limit` argument of `split`, converted like an unsigned 32-bit
/// integer. Absent means no limit.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is reduced into the u32 range first"
)]
fn split_limit(arg: Option<&Value>) -> usize {
    match arg {
        None | Some(Value::Undefined) => usize::MAX,
        Some(value) => {
            let n = to_number(value);
            if n.is_finite() {
                n.trunc().rem_euclid(4_294_967_296.0) as usize
            } else {
                0
            }
        }
    }
}

impl Interpreter<'_> {
    pub(super) fn call_string_method(
        &self,
        text: &str,
        name: &str,
        args: &[Value],
    ) -> Option<EvalResult> {
        let string_arg = |index: usize| match args.get(index) {
            Some(value) => to_js_string(value, self.interner),
            None => "undefined".to_string(),
        };
        Some(Ok(match name {
            "toUpperCase" => Value::from(text.to_uppercase()),
            "toLowerCase" => Value::from(text.to_lowercase()),
            "trim" => Value::from(text.trim()),
            "includes" => Value::Bool(text.contains(string_arg(0).as_str())),
            "startsWith" => Value::Bool(text.starts_with(string_arg(0).as_str())),
            "endsWith" => Value::Bool(text.ends_with(string_arg(0).as_str())),
            "indexOf" => match text.find(string_arg(0).as_str()) {
                Some(offset) => utf16_position(text, offset),
                None => Value::Number(-1.0),
            },
            "slice" => {
                let units: Vec<u16> = text.encode_utf16().collect();
                let start = relative_index(args.first(), units.len(), 0);
                let end = relative_index(args.get(1), units.len(), units.len());
                let slice = units.get(start..end.max(start)).unwrap_or_default();
                Value::from(String::from_utf16_lossy(slice))
            }
            "split" => {
                let limit = split_limit(args.get(1));
                let parts: Vec<Value> = match args.first() {
                    None | Some(Value::Undefined) => {
                        std::iter::once(Value::from(text)).take(limit).collect()
                    }
                    Some(separator) => {
                        let separator = to_js_string(separator, self.interner);
                        if separator.is_empty() {
                            text.encode_utf16()
                                .take(limit)
                                .map(|unit| Value::from(String::from_utf16_lossy(&[unit])))
                                .collect()
                        } else {
                            text.split(separator.as_str())
                                .take(limit)
                                .map(Value::from)
                                .collect()
                        }
                    }
                };
                Value::array(parts)
            }
            _ => return None,
        }))
    }
}
