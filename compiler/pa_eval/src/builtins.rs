//! Global bindings and the native functions behind them.

#![allow(
    clippy::needless_pass_by_value,
    reason = "natives share the `NativeFn` signature"
)]

use std::cell::RefCell;
use std::rc::Rc;

use pa_runtime::Recorder;

use crate::environment::{Mutability, Scope};
use crate::errors::{type_error, EvalResult};
use crate::interpreter::{Interpreter, RegisteredTest};
use crate::methods::to_length;
use crate::operators::to_number;
use crate::stringify::{dump, to_display_string, to_log_string};
use crate::value::{Object, Value};

/// Define every global in `scope`.
pub(crate) fn install_globals(scope: &mut Scope) {
    let mut define = |name: &str, value: Value| scope.define(name, value, Mutability::Immutable);

    define("undefined", Value::Undefined);
    define("NaN", Value::Number(f64::NAN));
    define("Infinity", Value::Number(f64::INFINITY));

    define("test", Value::native("test", register_test));
    define(
        "console",
        Value::object(Object::new().with("log", Value::native("log", console_log))),
    );
    define(
        "Promise",
        Value::class(
            "Promise",
            promise_constructor,
            Object::new()
                .with("resolve", Value::native("resolve", promise_resolve))
                .with("reject", Value::native("reject", promise_reject)),
        ),
    );
    define(
        "Object",
        Value::class(
            "Object",
            object_conversion,
            Object::new().with("keys", Value::native("keys", object_keys)),
        ),
    );
    define(
        "Array",
        Value::class(
            "Array",
            array_constructor,
            Object::new().with("isArray", Value::native("isArray", array_is_array)),
        ),
    );
    define(
        "Math",
        Value::object(
            Object::new()
                .with("abs", Value::native("abs", math_abs))
                .with("floor", Value::native("floor", math_floor))
                .with("max", Value::native("max", math_max))
                .with("min", Value::native("min", math_min)),
        ),
    );
    define("String", Value::native("String", string_conversion));
    define("Number", Value::native("Number", number_conversion));
    define("Error", Value::constructor("Error", error_constructor));
    define("TypeError", Value::constructor("TypeError", type_error_constructor));
}

fn first(args: &[Value]) -> Value {
    args.first().cloned().unwrap_or(Value::Undefined)
}

/// `test(name, fn)` or `test({ name, fn })`.
fn register_test(interp: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    let (name, func) = match args.as_slice() {
        [Value::Str(name), func, ..] => (name.to_string(), func.clone()),
        [Value::Object(options), ..] => {
            let options = options.borrow();
            let name = options.get("name").map(to_display_string).unwrap_or_default();
            let func = options.get("fn").cloned().unwrap_or(Value::Undefined);
            (name, func)
        }
        _ => return Err(type_error("test() expects a name and a function")),
    };
    if !func.is_callable() {
        return Err(type_error(format!("test \"{name}\" has no function")));
    }
    tracing::debug!(%name, "registered test");
    interp.tests.push(RegisteredTest { name, func });
    Ok(Value::Undefined)
}

fn console_log(interp: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    let line: Vec<String> = args.iter().map(to_log_string).collect();
    interp.print.println(&line.join(" "));
    Ok(Value::Undefined)
}

/// Promises here settle on creation, so there is no executor to run.
fn promise_constructor(_: &mut Interpreter, _: Vec<Value>) -> EvalResult {
    Err(type_error(
        "new Promise() is not supported; use Promise.resolve or Promise.reject",
    ))
}

fn promise_resolve(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(match first(&args) {
        promise @ Value::Promise(_) => promise,
        value => Value::fulfilled(value),
    })
}

fn promise_reject(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(Value::rejected(first(&args)))
}

fn object_conversion(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(match first(&args) {
        Value::Undefined | Value::Null => Value::object(Object::new()),
        value => value,
    })
}

/// `Array(n)` is `n` holes; any other argument list becomes the elements.
fn array_constructor(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(match args.as_slice() {
        [length @ Value::Number(_)] => Value::array(vec![Value::Undefined; to_length(length)]),
        _ => Value::array(args),
    })
}

fn object_keys(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    let keys = match first(&args) {
        Value::Object(object) => object
            .borrow()
            .iter()
            .map(|(key, _)| Value::from(key))
            .collect(),
        Value::Array(items) => (0..items.borrow().len())
            .map(|index| Value::from(index.to_string()))
            .collect(),
        Value::Str(s) => (0..s.chars().count())
            .map(|index| Value::from(index.to_string()))
            .collect(),
        value @ (Value::Undefined | Value::Null) => {
            return Err(type_error(format!(
                "Cannot convert {} to object",
                dump(&value)
            )));
        }
        _ => Vec::new(),
    };
    Ok(Value::array(keys))
}

fn array_is_array(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(Value::Bool(matches!(first(&args), Value::Array(_))))
}

fn math_abs(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(Value::Number(to_number(&first(&args)).abs()))
}

fn math_floor(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(Value::Number(to_number(&first(&args)).floor()))
}

fn math_max(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(Value::Number(fold_numbers(&args, f64::NEG_INFINITY, f64::max)))
}

fn math_min(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(Value::Number(fold_numbers(&args, f64::INFINITY, f64::min)))
}

/// `f64::max`/`f64::min` ignore NaN; `Math.max` propagates it.
fn fold_numbers(args: &[Value], init: f64, pick: fn(f64, f64) -> f64) -> f64 {
    args.iter().map(to_number).fold(init, |acc, n| {
        if acc.is_nan() || n.is_nan() {
            f64::NAN
        } else {
            pick(acc, n)
        }
    })
}

fn string_conversion(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(match args.first() {
        Some(value) => Value::from(to_display_string(value)),
        None => Value::from(""),
    })
}

fn number_conversion(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(Value::Number(args.first().map_or(0.0, to_number)))
}

fn error_message(args: &[Value]) -> String {
    match args.first() {
        None | Some(Value::Undefined) => String::new(),
        Some(value) => to_display_string(value),
    }
}

fn error_constructor(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(Value::error("Error", error_message(&args)))
}

fn type_error_constructor(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(Value::error("TypeError", error_message(&args)))
}

pub(crate) fn assertion_error_constructor(_: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(Value::error("AssertionError", error_message(&args)))
}

pub(crate) fn recorder_constructor(_: &mut Interpreter, _: Vec<Value>) -> EvalResult {
    Ok(Value::Recorder(Rc::new(RefCell::new(Recorder::new()))))
}
