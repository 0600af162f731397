//! Built-in globals: `console`, `Math`, `String`, `Number`, `undefined`,
//! `NaN` and `Infinity`.
//!
//! Built-ins live in a scope above the program's global scope, so a script
//! may declare its own `Math` without a duplicate-declaration error.

use std::f64::consts::{E, PI};

use hoist_ir::StringInterner;

use crate::environment::Environment;
use crate::errors::EvalResult;
use crate::format::format_log_line;
use crate::interpreter::Interpreter;
use crate::operators::{power, to_js_string, to_number};
use crate::value::ObjectValue;
use crate::Value;

/// A function implemented by the interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeFunction {
    ConsoleLog,
    MathMax,
    MathMin,
    MathFloor,
    MathCeil,
    MathRound,
    MathAbs,
    MathSqrt,
    MathPow,
    MathRandom,
    String,
    Number,
}

impl NativeFunction {
    /// Name shown by `console.log` and in messages.
    pub fn name(self) -> &'static str {
        match self {
            NativeFunction::ConsoleLog => "log",
            NativeFunction::MathMax => "max",
            NativeFunction::MathMin => "min",
            NativeFunction::MathFloor => "floor",
            NativeFunction::MathCeil => "ceil",
            NativeFunction::MathRound => "round",
            NativeFunction::MathAbs => "abs",
            NativeFunction::MathSqrt => "sqrt",
            NativeFunction::MathPow => "pow",
            NativeFunction::MathRandom => "random",
            NativeFunction::String => "String",
            NativeFunction::Number => "Number",
        }
    }
}

const MATH_FUNCTIONS: [NativeFunction; 9] = [
    NativeFunction::MathMax,
    NativeFunction::MathMin,
    NativeFunction::MathFloor,
    NativeFunction::MathCeil,
    NativeFunction::MathRound,
    NativeFunction::MathAbs,
    NativeFunction::MathSqrt,
    NativeFunction::MathPow,
    NativeFunction::MathRandom,
];

/// Define every built-in global in `env`.
pub fn install_globals(env: &mut Environment, interner: &StringInterner) {
    let mut console = ObjectValue::new();
    console.set(
        interner.intern("log"),
        Value::Native(NativeFunction::ConsoleLog),
    );
    env.define_intrinsic(interner.intern("console"), Value::object(console));

    let mut math = ObjectValue::new();
    for function in MATH_FUNCTIONS {
        math.set(interner.intern(function.name()), Value::Native(function));
    }
    math.set(interner.intern("PI"), Value::Number(PI));
    math.set(interner.intern("E"), Value::Number(E));
    env.define_intrinsic(interner.intern("Math"), Value::object(math));

    for function in [NativeFunction::String, NativeFunction::Number] {
        env.define_intrinsic(interner.intern(function.name()), Value::Native(function));
    }
    env.define_intrinsic(interner.intern("undefined"), Value::Undefined);
    env.define_intrinsic(interner.intern("NaN"), Value::Number(f64::NAN));
    env.define_intrinsic(interner.intern("Infinity"), Value::Number(f64::INFINITY));
}

fn number_arg(args: &[Value], index: usize) -> f64 {
    args.get(index).map_or(f64::NAN, to_number)
}

/// Rounds half up, toward positive infinity: `-2.5` rounds to `-2`.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

impl Interpreter<'_> {
    #[tracing::instrument(level = "trace", skip(self, args), fields(native = native.name()))]
    pub(crate) fn call_native(&mut self, native: NativeFunction, args: &[Value]) -> EvalResult {
        Ok(match native {
            NativeFunction::ConsoleLog => {
                let line = format_log_line(args, self.interner);
                self.print_handler.println(&line);
                Value::Undefined
            }
            NativeFunction::MathMax => Value::Number(fold_numbers(args, f64::NEG_INFINITY, f64::max)),
            NativeFunction::MathMin => Value::Number(fold_numbers(args, f64::INFINITY, f64::min)),
            NativeFunction::MathFloor => Value::Number(number_arg(args, 0).floor()),
            NativeFunction::MathCeil => Value::Number(number_arg(args, 0).ceil()),
            NativeFunction::MathRound => Value::Number(round_half_up(number_arg(args, 0))),
            NativeFunction::MathAbs => Value::Number(number_arg(args, 0).abs()),
            NativeFunction::MathSqrt => Value::Number(number_arg(args, 0).sqrt()),
            NativeFunction::MathPow => {
                Value::Number(power(number_arg(args, 0), number_arg(args, 1)))
            }
            NativeFunction::MathRandom => Value::Number(self.rng.next_f64()),
            NativeFunction::String => match args.first() {
                Some(value) => Value::from(to_js_string(value, self.interner)),
                None => Value::from(""),
            },
            NativeFunction::Number => Value::Number(args.first().map_or(0.0, to_number)),
        })
    }
}

/// `Math.max`/`Math.min`: any `NaN` argument makes the result `NaN`.
fn fold_numbers(args: &[Value], initial: f64, pick: fn(f64, f64) -> f64) -> f64 {
    let mut acc = initial;
    for arg in args {
        let n = to_number(arg);
        if n.is_nan() {
            return f64::NAN;
        }
        acc = pick(acc, n);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(1.4), 1.0);
    }

    #[test]
    fn test_max_min_with_nan_and_no_args() {
        assert_eq!(fold_numbers(&[], f64::NEG_INFINITY, f64::max), f64::NEG_INFINITY);
        let args = [Value::Number(3.0), Value::from("7"), Value::Number(1.0)];
        assert_eq!(fold_numbers(&args, f64::NEG_INFINITY, f64::max), 7.0);
        assert_eq!(fold_numbers(&args, f64::INFINITY, f64::min), 1.0);
        let with_nan = [Value::Number(3.0), Value::from("x")];
        assert!(fold_numbers(&with_nan, f64::NEG_INFINITY, f64::max).is_nan());
    }

    #[test]
    fn test_globals_are_shadowable() {
        let interner = StringInterner::new();
        let mut env = Environment::new();
        install_globals(&mut env, &interner);
        let math = interner.intern("Math");

        assert!(matches!(env.lookup(math), Ok(Value::Object(_))));
        env.declare(math, hoist_ir::DeclKind::Let, Some(Value::Number(1.0)))
            .unwrap();
        assert_eq!(env.lookup(math).unwrap(), Value::Number(1.0));
    }
}
