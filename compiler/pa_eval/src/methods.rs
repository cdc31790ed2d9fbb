//! Property access and built-in methods.
//!
//! Reading a method off a built-in value (`items.map`) yields a native bound
//! to its receiver; calling it lands in [`dispatch_builtin_method`], which
//! switches on the receiver's kind and the method name.

use std::rc::Rc;

use pa_runtime::SourceSnippet;

use crate::errors::{type_error, EvalError, EvalResult, Unwind};
use crate::interpreter::Interpreter;
use crate::operators::{same_value, strict_equals, to_number};
use crate::stringify::{dump, to_display_string};
use crate::value::{NativeFunction, NativeKind, Settled, Value};

const ARRAY_METHODS: &[&str] = &[
    "push", "pop", "includes", "indexOf", "join", "slice", "map", "filter", "forEach",
];

const STRING_METHODS: &[&str] = &[
    "includes",
    "indexOf",
    "startsWith",
    "endsWith",
    "slice",
    "toUpperCase",
    "toLowerCase",
    "trim",
    "split",
];

const PROMISE_METHODS: &[&str] = &["then", "catch"];
const REGEXP_METHODS: &[&str] = &["test"];
const RECORDER_METHODS: &[&str] = &["capture", "expr"];

fn bound_method(receiver: &Value, table: &[&'static str], key: &str) -> Option<Value> {
    let name = *table.iter().find(|name| **name == key)?;
    Some(Value::Native(Rc::new(NativeFunction::new(
        name,
        NativeKind::Method {
            receiver: receiver.clone(),
        },
    ))))
}

fn index_of_key(key: &str) -> Option<usize> {
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

/// `object[key]`
#[expect(clippy::cast_precision_loss, reason = "lengths fit in f64")]
pub fn get_property(object: &Value, key: &str) -> EvalResult {
    let found = match object {
        Value::Undefined | Value::Null => {
            return Err(type_error(format!(
                "Cannot read properties of {} (reading '{key}')",
                dump(object)
            )));
        }
        Value::Str(s) => match key {
            "length" => Some(Value::Number(s.chars().count() as f64)),
            _ => index_of_key(key)
                .and_then(|index| s.chars().nth(index))
                .map(|c| Value::from(c.to_string()))
                .or_else(|| bound_method(object, STRING_METHODS, key)),
        },
        Value::Array(items) => match key {
            "length" => Some(Value::Number(items.borrow().len() as f64)),
            _ => match index_of_key(key) {
                Some(index) => items.borrow().get(index).cloned(),
                None => bound_method(object, ARRAY_METHODS, key),
            },
        },
        Value::Object(props) => props.borrow().get(key).cloned(),
        Value::Error(err) => match key {
            "name" => Some(Value::string(Rc::clone(&err.name))),
            "message" => Some(Value::from(err.message())),
            _ => None,
        },
        Value::RegExp(re) => match key {
            "source" => Some(Value::from(re.source.as_str())),
            "flags" => Some(Value::from(re.flags.as_str())),
            _ => bound_method(object, REGEXP_METHODS, key),
        },
        Value::Promise(_) => bound_method(object, PROMISE_METHODS, key),
        Value::Recorder(_) => bound_method(object, RECORDER_METHODS, key),
        Value::Function(closure) => match key {
            "name" => Some(Value::from(closure.func.name.as_deref().unwrap_or(""))),
            "length" => Some(Value::Number(closure.func.params.len() as f64)),
            _ => None,
        },
        Value::Native(native) => match key {
            "name" => Some(Value::from(native.name)),
            _ => native.statics.get(key).cloned(),
        },
        Value::Bool(_) | Value::Number(_) | Value::Recorded(_) => None,
    };
    Ok(found.unwrap_or(Value::Undefined))
}

/// `object[key] = value`. Writes to primitives are ignored, as in sloppy
/// mode.
pub fn set_property(object: &Value, key: &str, value: Value) -> EvalResult<()> {
    match object {
        Value::Undefined | Value::Null => Err(type_error(format!(
            "Cannot set properties of {} (setting '{key}')",
            dump(object)
        ))),
        Value::Object(props) => {
            props.borrow_mut().set(key, value);
            Ok(())
        }
        Value::Array(items) => {
            let mut items = items.borrow_mut();
            if key == "length" {
                let len = to_length(&value);
                items.resize(len, Value::Undefined);
            } else if let Some(index) = index_of_key(key) {
                if index >= items.len() {
                    items.resize(index + 1, Value::Undefined);
                }
                items[index] = value;
            }
            Ok(())
        }
        Value::Error(err) => {
            if key == "message" {
                *err.message.borrow_mut() = to_display_string(&value);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to a non-negative integer first"
)]
pub(crate) fn to_length(value: &Value) -> usize {
    let n = to_number(value);
    if n.is_nan() || n <= 0.0 {
        0
    } else {
        n.trunc() as usize
    }
}

/// Resolve a relative `slice` bound against `len`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "bounds are clamped into 0..=len before casting"
)]
fn relative_index(arg: Option<&Value>, len: usize, default: usize) -> usize {
    let Some(arg) = arg.filter(|v| !matches!(v, Value::Undefined)) else {
        return default;
    };
    let n = to_number(arg);
    let n = if n.is_nan() { 0.0 } else { n.trunc() };
    let len_f = len as f64;
    if n < 0.0 {
        (len_f + n).max(0.0) as usize
    } else {
        n.min(len_f) as usize
    }
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

fn string_arg(args: &[Value], index: usize) -> String {
    to_display_string(&arg(args, index))
}

/// Call built-in method `name` on `receiver`.
pub fn dispatch_builtin_method(
    interp: &mut Interpreter,
    receiver: &Value,
    name: &str,
    args: Vec<Value>,
) -> EvalResult {
    match receiver {
        Value::Array(_) => array_method(interp, receiver, name, args),
        Value::Str(s) => string_method(s, name, &args),
        Value::Promise(settled) => promise_method(interp, receiver, settled, name, &args),
        Value::RegExp(re) => match name {
            "test" => Ok(Value::Bool(re.regex.is_match(&string_arg(&args, 0)))),
            _ => Err(no_such_method(receiver, name)),
        },
        Value::Recorder(_) => recorder_method(receiver, name, args),
        _ => Err(no_such_method(receiver, name)),
    }
}

fn no_such_method(receiver: &Value, name: &str) -> Unwind {
    type_error(format!("{}.{name} is not a function", dump(receiver)))
}

#[expect(clippy::cast_precision_loss, reason = "array lengths fit in f64")]
fn array_method(
    interp: &mut Interpreter,
    receiver: &Value,
    name: &str,
    args: Vec<Value>,
) -> EvalResult {
    let Value::Array(items) = receiver else {
        return Err(no_such_method(receiver, name));
    };
    match name {
        "push" => {
            let mut items = items.borrow_mut();
            items.extend(args);
            Ok(Value::Number(items.len() as f64))
        }
        "pop" => Ok(items.borrow_mut().pop().unwrap_or(Value::Undefined)),
        "includes" => {
            let needle = arg(&args, 0);
            let found = items
                .borrow()
                .iter()
                .any(|item| same_value(item, &needle) || strict_equals(item, &needle));
            Ok(Value::Bool(found))
        }
        "indexOf" => {
            let needle = arg(&args, 0);
            let position = items
                .borrow()
                .iter()
                .position(|item| strict_equals(item, &needle));
            Ok(Value::Number(position.map_or(-1.0, |p| p as f64)))
        }
        "join" => {
            let separator = match args.first() {
                None | Some(Value::Undefined) => ",".to_string(),
                Some(sep) => to_display_string(sep),
            };
            let parts: Vec<String> = items
                .borrow()
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        to_display_string(item)
                    }
                })
                .collect();
            Ok(Value::from(parts.join(&separator)))
        }
        "slice" => {
            let items = items.borrow();
            let start = relative_index(args.first(), items.len(), 0);
            let end = relative_index(args.get(1), items.len(), items.len());
            let slice = items.get(start..end.max(start)).unwrap_or_default();
            Ok(Value::array(slice.to_vec()))
        }
        "map" | "filter" | "forEach" => {
            let callback = arg(&args, 0);
            if !callback.is_callable() {
                return Err(type_error(format!("{} is not a function", dump(&callback))));
            }
            // Callbacks may mutate the array.
            let snapshot = items.borrow().clone();
            let mut out = Vec::new();
            for (index, item) in snapshot.into_iter().enumerate() {
                let result = interp.call_function(
                    &callback,
                    vec![item.clone(), Value::Number(index as f64), receiver.clone()],
                )?;
                match name {
                    "map" => out.push(result),
                    "filter" if result.is_truthy() => out.push(item),
                    _ => {}
                }
            }
            if name == "forEach" {
                Ok(Value::Undefined)
            } else {
                Ok(Value::array(out))
            }
        }
        _ => Err(no_such_method(receiver, name)),
    }
}

#[expect(clippy::cast_precision_loss, reason = "string lengths fit in f64")]
fn string_method(s: &str, name: &str, args: &[Value]) -> EvalResult {
    let value = match name {
        "includes" => Value::Bool(s.contains(string_arg(args, 0).as_str())),
        "indexOf" => {
            let needle = string_arg(args, 0);
            match s.find(needle.as_str()) {
                Some(byte) => Value::Number(s[..byte].chars().count() as f64),
                None => Value::Number(-1.0),
            }
        }
        "startsWith" => Value::Bool(s.starts_with(string_arg(args, 0).as_str())),
        "endsWith" => Value::Bool(s.ends_with(string_arg(args, 0).as_str())),
        "slice" => {
            let chars: Vec<char> = s.chars().collect();
            let start = relative_index(args.first(), chars.len(), 0);
            let end = relative_index(args.get(1), chars.len(), chars.len());
            let slice = chars.get(start..end.max(start)).unwrap_or_default();
            Value::from(slice.iter().collect::<String>())
        }
        "toUpperCase" => Value::from(s.to_uppercase()),
        "toLowerCase" => Value::from(s.to_lowercase()),
        "trim" => Value::from(s.trim()),
        "split" => match args.first() {
            None | Some(Value::Undefined) => Value::array(vec![Value::from(s)]),
            Some(separator) => {
                let separator = to_display_string(separator);
                let parts: Vec<Value> = if separator.is_empty() {
                    s.chars().map(|c| Value::from(c.to_string())).collect()
                } else {
                    s.split(separator.as_str()).map(Value::from).collect()
                };
                Value::array(parts)
            }
        },
        _ => return Err(type_error(format!("\"{s}\".{name} is not a function"))),
    };
    Ok(value)
}

/// `then`/`catch` on an already-settled promise run the handler at once.
fn promise_method(
    interp: &mut Interpreter,
    receiver: &Value,
    settled: &Settled,
    name: &str,
    args: &[Value],
) -> EvalResult {
    let (on_fulfilled, on_rejected) = match name {
        "then" => (arg(args, 0), arg(args, 1)),
        "catch" => (Value::Undefined, arg(args, 0)),
        _ => return Err(no_such_method(receiver, name)),
    };
    let (handler, input) = match settled {
        Settled::Fulfilled(value) => (on_fulfilled, value.clone()),
        Settled::Rejected(reason) => (on_rejected, reason.clone()),
    };
    if !handler.is_callable() {
        return Ok(receiver.clone());
    }
    match interp.call_function(&handler, vec![input]) {
        Ok(promise @ Value::Promise(_)) => Ok(promise),
        Ok(value) => Ok(Value::fulfilled(value)),
        Err(Unwind::Throw(reason)) => Ok(Value::rejected(reason)),
        Err(fatal @ Unwind::Fatal(_)) => Err(fatal),
    }
}

fn recorder_method(receiver: &Value, name: &str, args: Vec<Value>) -> EvalResult {
    let Value::Recorder(recorder) = receiver else {
        return Err(no_such_method(receiver, name));
    };
    let mut args = args.into_iter();
    let value = args.next().unwrap_or(Value::Undefined);
    match name {
        "capture" => {
            let path = args.next().as_ref().map(to_display_string).unwrap_or_default();
            Ok(recorder.borrow_mut().capture(value, path))
        }
        "expr" => {
            let snippet = match args.next() {
                Some(Value::Object(object)) => snippet_from_object(&object.borrow()),
                _ => {
                    return Err(EvalError::Invariant(
                        "recorder expr called without a source snippet".to_string(),
                    )
                    .into());
                }
            };
            let recorded = recorder.borrow_mut().expr(value, snippet);
            Ok(Value::Recorded(Rc::new(recorded)))
        }
        _ => Err(no_such_method(receiver, name)),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "line numbers are small positive integers"
)]
fn snippet_from_object(object: &crate::value::Object) -> SourceSnippet {
    let text = |key| object.get(key).map(to_display_string).unwrap_or_default();
    let flag = |key| object.get(key).is_some_and(Value::is_truthy);
    SourceSnippet {
        content: text("content"),
        filepath: text("filepath"),
        line: object.get("line").map_or(0, |line| to_number(line).max(0.0) as u32),
        is_async: flag("async"),
        is_generator: flag("generator"),
    }
}

#[cfg(test)]
mod tests;
