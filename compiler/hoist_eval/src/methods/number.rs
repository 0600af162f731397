//! Number methods.

use hoist_ir::{format_number, Span};

use crate::errors::{custom, EvalResult};
use crate::operators::to_number;
use crate::Value;

/// Integer digits in `radix`, for `toString(radix)`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is an integer below 2^53"
)]
fn integer_in_radix(value: f64, radix: u32) -> String {
    let negative = value < 0.0;
    let mut n = value.abs() as u64;
    let mut digits = Vec::new();
    loop {
        let digit = (n % u64::from(radix)) as u32;
        digits.push(char::from_digit(digit, radix).unwrap_or('?'));
        n /= u64::from(radix);
        if n == 0 {
            break;
        }
    }
    if negative {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

/// Digits past the decimal point that can be nonzero in an `f64`.
const MAX_FRACTION_DIGITS: usize = 1075;

/// `toFixed`: decimal rounding of the exact binary value, with exact ties
/// rounding away from zero.
fn to_fixed(value: f64, digits: usize) -> String {
    let exact = format!("{:.*}", digits + MAX_FRACTION_DIGITS, value);
    let (kept, rest) = exact.split_at(exact.len() - MAX_FRACTION_DIGITS);
    let is_tie = rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0');
    if !is_tie {
        return format!("{value:.digits$}");
    }
    let kept = kept.strip_suffix('.').unwrap_or(kept);
    round_up_magnitude(kept)
}

/// Add one unit in the last place to a decimal string, away from zero.
fn round_up_magnitude(decimal: &str) -> String {
    let (sign, digits) = match decimal.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", decimal),
    };
    let mut bytes = digits.as_bytes().to_vec();
    let mut carry = true;
    for b in bytes.iter_mut().rev() {
        if !carry {
            break;
        }
        match *b {
            b'.' => {}
            b'9' => *b = b'0',
            _ => {
                *b += 1;
                carry = false;
            }
        }
    }
    let mut out = String::from(sign);
    if carry {
        out.push('1');
    }
    out.push_str(&String::from_utf8_lossy(&bytes));
    out
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "digit counts and radixes are range-checked first"
)]
pub(super) fn call_number_method(
    value: f64,
    name: &str,
    args: &[Value],
    span: Span,
) -> Option<EvalResult> {
    let int_arg = |default: f64| {
        args.first()
            .filter(|v| !matches!(v, Value::Undefined))
            .map_or(default, |v| to_number(v).trunc())
    };
    Some(match name {
        "toFixed" => {
            let digits = int_arg(0.0);
            if !(0.0..=100.0).contains(&digits) {
                return Some(Err(custom(
                    "toFixed() digits argument must be between 0 and 100",
                )
                .with_span(span)));
            }
            if !value.is_finite() || value.abs() >= 1e21 {
                Ok(Value::from(format_number(value)))
            } else {
                Ok(Value::from(to_fixed(value, digits as usize)))
            }
        }
        "toString" => {
            let radix = int_arg(10.0);
            if !(2.0..=36.0).contains(&radix) {
                return Some(Err(custom(
                    "toString() radix must be between 2 and 36",
                )
                .with_span(span)));
            }
            let radix = radix as u32;
            let is_safe_integer = value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0;
            if radix == 10 || !is_safe_integer {
                Ok(Value::from(format_number(value)))
            } else {
                Ok(Value::from(integer_in_radix(value, radix)))
            }
        }
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_in_radix() {
        assert_eq!(integer_in_radix(255.0, 16), "ff");
        assert_eq!(integer_in_radix(5.0, 2), "101");
        assert_eq!(integer_in_radix(-8.0, 8), "-10");
        assert_eq!(integer_in_radix(0.0, 2), "0");
    }

    #[test]
    fn test_to_fixed_ties_round_away_from_zero() {
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(-1.5, 0), "-2");
        assert_eq!(to_fixed(9.995, 2), "9.99");
        assert_eq!(to_fixed(99.5, 0), "100");
        assert_eq!(to_fixed(1.0, 2), "1.00");
    }
}
