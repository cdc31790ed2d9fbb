//! Unary and binary operators.
//!
//! The value set is closed, so operators dispatch by matching on the
//! operands directly.

use std::rc::Rc;

use pa_ir::{BinaryOp, UnaryOp};

use crate::errors::{type_error, EvalResult};
use crate::stringify::to_display_string;
use crate::value::Value;

/// Evaluate a binary operator. Logical operators short-circuit and are
/// handled by the interpreter.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    let value = match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => Value::Number(to_number(left) - to_number(right)),
        BinaryOp::Mul => Value::Number(to_number(left) * to_number(right)),
        BinaryOp::Div => Value::Number(to_number(left) / to_number(right)),
        BinaryOp::Rem => Value::Number(to_number(left) % to_number(right)),
        BinaryOp::Exp => Value::Number(to_number(left).powf(to_number(right))),
        BinaryOp::LooseEq => Value::Bool(loose_equals(left, right)),
        BinaryOp::LooseNotEq => Value::Bool(!loose_equals(left, right)),
        BinaryOp::StrictEq => Value::Bool(strict_equals(left, right)),
        BinaryOp::StrictNotEq => Value::Bool(!strict_equals(left, right)),
        BinaryOp::Lt => compare(left, right, |o| o.is_lt()),
        BinaryOp::LtEq => compare(left, right, |o| o.is_le()),
        BinaryOp::Gt => compare(left, right, |o| o.is_gt()),
        BinaryOp::GtEq => compare(left, right, |o| o.is_ge()),
        BinaryOp::InstanceOf => Value::Bool(instance_of(left, right)?),
        BinaryOp::In => Value::Bool(has_property(left, right)?),
    };
    Ok(value)
}

pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> Value {
    match op {
        UnaryOp::Not => Value::Bool(!operand.is_truthy()),
        UnaryOp::Neg => Value::Number(-to_number(operand)),
        UnaryOp::Plus => Value::Number(to_number(operand)),
        UnaryOp::TypeOf => Value::string(operand.type_of()),
        UnaryOp::Void => Value::Undefined,
    }
}

fn is_primitive(value: &Value) -> bool {
    matches!(
        value,
        Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::Str(_)
    )
}

fn add(left: &Value, right: &Value) -> Value {
    let concat = matches!(left, Value::Str(_))
        || matches!(right, Value::Str(_))
        || !is_primitive(left)
        || !is_primitive(right);
    if concat {
        let mut text = to_display_string(left);
        text.push_str(&to_display_string(right));
        Value::from(text)
    } else {
        Value::Number(to_number(left) + to_number(right))
    }
}

fn compare(left: &Value, right: &Value, test: fn(std::cmp::Ordering) -> bool) -> Value {
    let ordering = match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => to_number(left).partial_cmp(&to_number(right)),
    };
    Value::Bool(ordering.is_some_and(test))
}

/// Numeric conversion (`+value`).
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Undefined => f64::NAN,
        Value::Null | Value::Bool(false) => 0.0,
        Value::Bool(true) => 1.0,
        Value::Number(n) => *n,
        Value::Str(s) => string_to_number(s),
        Value::Array(items) => {
            let items = items.borrow();
            match items.as_slice() {
                [] => 0.0,
                [single] => to_number(single),
                _ => f64::NAN,
            }
        }
        _ => f64::NAN,
    }
}

#[expect(clippy::cast_precision_loss, reason = "hex literals above 2^53 round like the host language")]
fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64);
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

/// Identity of two heap values.
pub fn same_reference(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
        (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
        (Value::Error(a), Value::Error(b)) => Rc::ptr_eq(a, b),
        (Value::RegExp(a), Value::RegExp(b)) => Rc::ptr_eq(a, b),
        (Value::Promise(a), Value::Promise(b)) => Rc::ptr_eq(a, b),
        (Value::Recorder(a), Value::Recorder(b)) => Rc::ptr_eq(a, b),
        (Value::Recorded(a), Value::Recorded(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// `===`
#[expect(clippy::float_cmp, reason = "strict equality compares floats exactly")]
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        _ => same_reference(left, right),
    }
}

/// `==`
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Number(_), Value::Str(_) | Value::Bool(_))
        | (Value::Str(_) | Value::Bool(_), Value::Number(_) | Value::Bool(_))
        | (Value::Bool(_), Value::Str(_)) => {
            strict_equals(&Value::Number(to_number(left)), &Value::Number(to_number(right)))
        }
        _ if is_primitive(left) != is_primitive(right) => {
            to_display_string(left) == to_display_string(right)
        }
        _ => strict_equals(left, right),
    }
}

/// `Object.is`: like `===` except that `NaN` equals itself and `0` differs
/// from `-0`.
pub fn same_value(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) if a.is_nan() || b.is_nan() => {
            a.is_nan() && b.is_nan()
        }
        (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
        _ => strict_equals(left, right),
    }
}

fn instance_of(value: &Value, class: &Value) -> EvalResult<bool> {
    let name = match class {
        Value::Native(native) if native.is_constructor() => native.name,
        Value::Native(_) => return Ok(false),
        Value::Function(_) => return Ok(false),
        _ => return Err(type_error("Right-hand side of 'instanceof' is not callable")),
    };
    Ok(match value {
        Value::Error(err) => matches!(name, "Error" | "Object") || &*err.name == name,
        Value::Recorder(_) => matches!(name, "PowerAssertRecorder" | "Object"),
        Value::Promise(_) => matches!(name, "Promise" | "Object"),
        Value::Array(_) => matches!(name, "Array" | "Object"),
        Value::Object(_) | Value::RegExp(_) => name == "Object",
        _ => false,
    })
}

fn has_property(key: &Value, target: &Value) -> EvalResult<bool> {
    let key = to_display_string(key);
    match target {
        Value::Object(object) => Ok(object.borrow().contains(&key)),
        Value::Array(items) => Ok(key == "length"
            || key
                .parse::<usize>()
                .is_ok_and(|index| index < items.borrow().len())),
        Value::Error(_) => Ok(matches!(key.as_str(), "name" | "message")),
        _ => Err(type_error(format!(
            "Cannot use 'in' operator to search for '{key}' in {}",
            to_display_string(target)
        ))),
    }
}

#[cfg(test)]
mod tests;
