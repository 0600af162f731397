//! Expression evaluation, assignment targets and property access.

use hoist_ir::{
    ensure_sufficient_stack, format_number, BinaryOp, ExprId, ExprKind, ExprRange, LogicalOp,
    Name, Span, TemplatePart, TemplateRange, UnaryOp, UpdateOp,
};

use super::Interpreter;
use crate::environment::ScopeError;
use crate::errors::{custom, property_of_nullish, EvalResult, PropertyAccess};
use crate::operators::{binary_op, to_js_string, to_number, truthy};
use crate::value::ObjectValue;
use crate::Value;

/// A property key after conversion: array indices stay numeric, every
/// other key is an interned string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PropertyKey {
    Index(usize),
    Name(Name),
}

/// A resolved assignment target. The object and key of a member target are
/// evaluated once, so `a[i()] += 1` calls `i` once.
enum Place {
    Binding(Name),
    Property { object: Value, key: PropertyKey },
}

/// `Some(i)` when `key` is a canonical array index.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "range and integrality are checked before the cast"
)]
pub(crate) fn array_index(key: &Value) -> Option<usize> {
    match key {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n < f64::from(u32::MAX) => {
            Some(*n as usize)
        }
        Value::Str(s) => s
            .parse::<u32>()
            .ok()
            .filter(|i| i.to_string() == **s)
            .and_then(|i| usize::try_from(i).ok()),
        _ => None,
    }
}

/// Longest array a script can create. Elements are stored densely, so a
/// write far past the end would otherwise commit memory for every hole.
pub(crate) const MAX_ARRAY_LENGTH: usize = 1 << 24;

/// Resize `items` to `len`, filling new slots with `undefined`.
fn resize_array(items: &mut Vec<Value>, len: usize, span: Span) -> EvalResult<()> {
    if len > MAX_ARRAY_LENGTH {
        return Err(custom(format!(
            "Array length {len} exceeds the supported maximum of {MAX_ARRAY_LENGTH}"
        ))
        .with_span(span));
    }
    items.resize(len, Value::Undefined);
    Ok(())
}

fn nullish_name(value: &Value) -> &'static str {
    if matches!(value, Value::Null) {
        "null"
    } else {
        "undefined"
    }
}

impl Interpreter<'_> {
    pub(crate) fn eval_expr(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(id))
    }

    fn eval_expr_inner(&mut self, id: ExprId) -> EvalResult {
        let arena = self.arena;
        let expr = arena.expr(id);
        let span = expr.span;
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Str(text) => Ok(Value::from(self.name_str(*text))),
            ExprKind::Template(parts) => self.eval_template(*parts),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Ident(name) => self
                .env
                .lookup(*name)
                .map_err(|e| self.scope_error(e, span)),
            ExprKind::Array(items) => Ok(Value::array(self.eval_list(*items)?)),
            ExprKind::Object(properties) => {
                let mut object = ObjectValue::new();
                for property in arena.properties(*properties) {
                    let value = self.eval_named(property.value, property.key)?;
                    object.set(property.key, value);
                }
                Ok(Value::object(object))
            }
            ExprKind::Function(function) => self.eval_function_expr(*function, None),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, *operand),
            ExprKind::Binary { op, left, right } => {
                let left = self.eval_expr(*left)?;
                let right = self.eval_expr(*right)?;
                Ok(binary_op(*op, &left, &right, self.interner))
            }
            ExprKind::Logical { op, left, right } => {
                let left = self.eval_expr(*left)?;
                let short_circuits = match op {
                    LogicalOp::And => !truthy(&left),
                    LogicalOp::Or => truthy(&left),
                };
                if short_circuits {
                    Ok(left)
                } else {
                    self.eval_expr(*right)
                }
            }
            ExprKind::Assign { op, target, value } => self.eval_assign(*op, *target, *value),
            ExprKind::Update { op, prefix, target } => {
                let place = self.resolve_place(*target)?;
                let old = to_number(&self.read_place(&place, span)?);
                let new = match op {
                    UpdateOp::Increment => old + 1.0,
                    UpdateOp::Decrement => old - 1.0,
                };
                self.write_place(place, Value::Number(new), span)?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if truthy(&self.eval_expr(*test)?) {
                    self.eval_expr(*consequent)
                } else {
                    self.eval_expr(*alternate)
                }
            }
            ExprKind::Call { callee, args } => self.eval_call(*callee, *args),
            ExprKind::Member { object, property } => {
                let object = self.eval_expr(*object)?;
                self.get_property(&object, PropertyKey::Name(*property), span)
            }
            ExprKind::Index { object, index } => {
                let object = self.eval_expr(*object)?;
                let key = self.eval_expr(*index)?;
                let key = self.property_key(&key);
                self.get_property(&object, key, span)
            }
        }
    }

    pub(crate) fn eval_list(&mut self, items: ExprRange) -> EvalResult<Vec<Value>> {
        let arena = self.arena;
        arena
            .expr_list(items)
            .iter()
            .map(|&item| self.eval_expr(item))
            .collect()
    }

    fn eval_template(&mut self, parts: TemplateRange) -> EvalResult {
        let arena = self.arena;
        let mut text = String::new();
        for part in arena.template_parts(parts) {
            match part {
                TemplatePart::Text(chunk) => text.push_str(self.name_str(*chunk)),
                TemplatePart::Expr(expr) => {
                    let value = self.eval_expr(*expr)?;
                    text.push_str(&to_js_string(&value, self.interner));
                }
            }
        }
        Ok(Value::from(text))
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: ExprId) -> EvalResult {
        if op == UnaryOp::Typeof {
            // `typeof` on an undeclared name is the one lookup that does not
            // fail. A binding in its dead zone still does.
            if let ExprKind::Ident(name) = self.arena.expr(operand).kind {
                return match self.env.lookup(name) {
                    Ok(value) => Ok(Value::from(value.type_name())),
                    Err(ScopeError::Unresolved { .. }) => Ok(Value::from("undefined")),
                    Err(e) => Err(self.scope_error(e, self.arena.expr(operand).span)),
                };
            }
        }
        let value = self.eval_expr(operand)?;
        Ok(match op {
            UnaryOp::Not => Value::Bool(!truthy(&value)),
            UnaryOp::Neg => Value::Number(-to_number(&value)),
            UnaryOp::Plus => Value::Number(to_number(&value)),
            UnaryOp::Typeof => Value::from(value.type_name()),
        })
    }

    fn eval_assign(&mut self, op: Option<BinaryOp>, target: ExprId, value: ExprId) -> EvalResult {
        let span = self.arena.expr(target).span;
        let place = self.resolve_place(target)?;
        let value = match op {
            None => match place {
                Place::Binding(name) => self.eval_named(value, name)?,
                Place::Property { .. } => self.eval_expr(value)?,
            },
            Some(op) => {
                let current = self.read_place(&place, span)?;
                let rhs = self.eval_expr(value)?;
                binary_op(op, &current, &rhs, self.interner)
            }
        };
        self.write_place(place, value.clone(), span)?;
        Ok(value)
    }

    fn resolve_place(&mut self, target: ExprId) -> EvalResult<Place> {
        let arena = self.arena;
        match &arena.expr(target).kind {
            ExprKind::Ident(name) => Ok(Place::Binding(*name)),
            ExprKind::Member { object, property } => Ok(Place::Property {
                object: self.eval_expr(*object)?,
                key: PropertyKey::Name(*property),
            }),
            ExprKind::Index { object, index } => {
                let object = self.eval_expr(*object)?;
                let key = self.eval_expr(*index)?;
                Ok(Place::Property {
                    object,
                    key: self.property_key(&key),
                })
            }
            // The parser only builds assignments to the three forms above.
            _ => Err(custom("invalid assignment target")
                .with_span(arena.expr(target).span)),
        }
    }

    fn read_place(&self, place: &Place, span: Span) -> EvalResult {
        match place {
            Place::Binding(name) => self
                .env
                .lookup(*name)
                .map_err(|e| self.scope_error(e, span)),
            Place::Property { object, key } => self.get_property(object, *key, span),
        }
    }

    fn write_place(&mut self, place: Place, value: Value, span: Span) -> EvalResult<()> {
        match place {
            Place::Binding(name) => self
                .env
                .assign(name, value)
                .map_err(|e| self.scope_error(e, span)),
            Place::Property { object, key } => self.set_property(&object, key, value, span),
        }
    }

    pub(crate) fn property_key(&self, key: &Value) -> PropertyKey {
        match array_index(key) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::Name(self.interner.intern(&to_js_string(key, self.interner))),
        }
    }

    fn key_name(&self, key: PropertyKey) -> Name {
        match key {
            PropertyKey::Name(name) => name,
            PropertyKey::Index(index) => self.interner.intern(&index.to_string()),
        }
    }

    fn key_text(&self, key: PropertyKey) -> String {
        match key {
            PropertyKey::Name(name) => self.name_str(name).to_string(),
            PropertyKey::Index(index) => index.to_string(),
        }
    }

    /// Read `object[key]`. Missing properties are `undefined`; reading from
    /// `undefined` or `null` fails.
    #[expect(clippy::cast_precision_loss, reason = "lengths fit in f64")]
    pub(crate) fn get_property(&self, object: &Value, key: PropertyKey, span: Span) -> EvalResult {
        let length = self.prop_names.length;
        Ok(match (object, key) {
            (Value::Undefined | Value::Null, _) => {
                return Err(property_of_nullish(
                    &self.key_text(key),
                    nullish_name(object),
                    PropertyAccess::Read,
                )
                .with_span(span));
            }
            (Value::Array(items), PropertyKey::Index(i)) => {
                items.borrow().get(i).cloned().unwrap_or(Value::Undefined)
            }
            (Value::Array(items), PropertyKey::Name(name)) if name == length => {
                Value::Number(items.borrow().len() as f64)
            }
            (Value::Str(text), PropertyKey::Index(i)) => text
                .encode_utf16()
                .nth(i)
                .map_or(Value::Undefined, |unit| {
                    Value::from(String::from_utf16_lossy(&[unit]))
                }),
            (Value::Str(text), PropertyKey::Name(name)) if name == length => {
                Value::Number(text.encode_utf16().count() as f64)
            }
            (Value::Object(object), key) => object
                .borrow()
                .get(self.key_name(key))
                .cloned()
                .unwrap_or(Value::Undefined),
            _ => Value::Undefined,
        })
    }

    /// Write `object[key] = value`. Arrays grow to fit an index past their
    /// end, up to [`MAX_ARRAY_LENGTH`]; writes to other primitives are
    /// ignored.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the length is checked to be a non-negative integer first"
    )]
    pub(crate) fn set_property(
        &self,
        object: &Value,
        key: PropertyKey,
        value: Value,
        span: Span,
    ) -> EvalResult<()> {
        match (object, key) {
            (Value::Undefined | Value::Null, _) => {
                return Err(property_of_nullish(
                    &self.key_text(key),
                    nullish_name(object),
                    PropertyAccess::Write,
                )
                .with_span(span));
            }
            (Value::Array(items), PropertyKey::Index(i)) => {
                let mut items = items.borrow_mut();
                if i >= items.len() {
                    resize_array(&mut items, i + 1, span)?;
                }
                if let Some(slot) = items.get_mut(i) {
                    *slot = value;
                }
            }
            (Value::Array(items), PropertyKey::Name(name)) if name == self.prop_names.length => {
                let new_len = to_number(&value);
                if new_len >= 0.0 && new_len.fract() == 0.0 && new_len < f64::from(u32::MAX) {
                    resize_array(&mut items.borrow_mut(), new_len as usize, span)?;
                } else {
                    return Err(custom(format!(
                        "Invalid array length: {}",
                        format_number(new_len)
                    ))
                    .with_span(span));
                }
            }
            (Value::Object(object), key) => {
                let name = self.key_name(key);
                object.borrow_mut().set(name, value);
            }
            _ => {}
        }
        Ok(())
    }

    /// A call. Method calls on arrays, strings and numbers go to the
    /// built-in methods; everything else calls the callee's value.
    fn eval_call(&mut self, callee: ExprId, args: ExprRange) -> EvalResult {
        let arena = self.arena;
        let callee_span = arena.expr(callee).span;

        if let ExprKind::Member { object, property } = arena.expr(callee).kind {
            let receiver = self.eval_expr(object)?;
            if receiver.is_nullish() {
                // Fails with the right message.
                self.get_property(&receiver, PropertyKey::Name(property), callee_span)?;
            }
            let args = self.eval_list(args)?;
            if let Some(result) = self.call_builtin_method(&receiver, property, &args, callee_span) {
                return result;
            }
            let function = self.get_property(&receiver, PropertyKey::Name(property), callee_span)?;
            return self.call_value(&function, &args, callee_span, |this| this.expr_text(callee));
        }

        let function = self.eval_expr(callee)?;
        let args = self.eval_list(args)?;
        self.call_value(&function, &args, callee_span, |this| this.expr_text(callee))
    }

    /// Source-like text of an expression for error messages.
    pub(crate) fn expr_text(&self, id: ExprId) -> String {
        match &self.arena.expr(id).kind {
            ExprKind::Ident(name) => self.name_str(*name).to_string(),
            ExprKind::Member { object, property } => {
                format!("{}.{}", self.expr_text(*object), self.name_str(*property))
            }
            ExprKind::Index { object, .. } => format!("{}[...]", self.expr_text(*object)),
            ExprKind::Call { callee, .. } => format!("{}(...)", self.expr_text(*callee)),
            ExprKind::Number(n) => format_number(*n),
            ExprKind::Str(text) => format!("\"{}\"", self.name_str(*text)),
            ExprKind::Bool(b) => b.to_string(),
            ExprKind::Null => "null".to_string(),
            _ => "(intermediate value)".to_string(),
        }
    }
}
