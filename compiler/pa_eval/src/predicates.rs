//! The assertion predicates exported by `power-assert`.
//!
//! Each one throws an `AssertionError` on failure. A trailing message
//! argument, when given, replaces the default failure text.

use std::rc::Rc;

use pa_stack::ensure_sufficient_stack;

use crate::errors::{type_error, EvalResult, Unwind};
use crate::interpreter::Interpreter;
use crate::operators::{same_reference, same_value};
use crate::stringify::{dump, to_display_string};
use crate::value::{Predicate, RegExpValue, Settled, Value};

pub const ASSERTION_ERROR: &str = "AssertionError";

/// Every predicate, by exported name.
pub const PREDICATES: &[(&str, Predicate)] = &[
    ("assert", assert),
    ("assertEquals", assert_equals),
    ("assertNotEquals", assert_not_equals),
    ("assertStrictEquals", assert_strict_equals),
    ("assertNotStrictEquals", assert_not_strict_equals),
    ("assertStringIncludes", assert_string_includes),
    ("assertArrayIncludes", assert_array_includes),
    ("assertMatch", assert_match),
    ("assertNotMatch", assert_not_match),
    ("assertThrows", assert_throws),
    ("assertThrowsAsync", assert_throws_async),
];

pub fn is_assertion_error(value: &Value) -> bool {
    matches!(value, Value::Error(err) if &*err.name == ASSERTION_ERROR)
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

/// The failure to raise: the caller's message at `message_at`, else the
/// default.
fn failure(args: &[Value], message_at: usize, default: impl FnOnce() -> String) -> Value {
    let message = match args.get(message_at) {
        Some(Value::Undefined) | None => default(),
        Some(message) => to_display_string(message),
    };
    Value::error(ASSERTION_ERROR, message)
}

fn fail(args: &[Value], message_at: usize, default: impl FnOnce() -> String) -> EvalResult {
    Err(Unwind::Throw(failure(args, message_at, default)))
}

fn assert(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    if arg(args, 0).is_truthy() {
        Ok(Value::Undefined)
    } else {
        fail(args, 1, || "Assertion failed.".to_string())
    }
}

fn assert_equals(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    let (actual, expected) = (arg(args, 0), arg(args, 1));
    if deep_equals(&actual, &expected) {
        return Ok(Value::Undefined);
    }
    fail(args, 2, || {
        format!(
            "Values are not equal:\n    actual: {}\n    expected: {}",
            dump(&actual),
            dump(&expected)
        )
    })
}

fn assert_not_equals(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    let (actual, expected) = (arg(args, 0), arg(args, 1));
    if !deep_equals(&actual, &expected) {
        return Ok(Value::Undefined);
    }
    fail(args, 2, || {
        format!(
            "Expected actual: {} not to be: {}",
            dump(&actual),
            dump(&expected)
        )
    })
}

fn assert_strict_equals(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    let (actual, expected) = (arg(args, 0), arg(args, 1));
    if same_value(&actual, &expected) {
        return Ok(Value::Undefined);
    }
    fail(args, 2, || {
        if deep_equals(&actual, &expected) {
            format!(
                "Values have the same structure but are not reference-equal:\n    {}",
                dump(&actual)
            )
        } else {
            format!(
                "Values are not strictly equal:\n    actual: {}\n    expected: {}",
                dump(&actual),
                dump(&expected)
            )
        }
    })
}

fn assert_not_strict_equals(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    let (actual, expected) = (arg(args, 0), arg(args, 1));
    if !same_value(&actual, &expected) {
        return Ok(Value::Undefined);
    }
    fail(args, 2, || {
        format!(
            "Expected \"actual\" to be strictly unequal to: {}",
            dump(&expected)
        )
    })
}

fn assert_string_includes(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    let (Value::Str(actual), Value::Str(expected)) = (arg(args, 0), arg(args, 1)) else {
        return Err(type_error("assertStringIncludes expects two strings"));
    };
    if actual.contains(&*expected) {
        return Ok(Value::Undefined);
    }
    fail(args, 2, || {
        format!("actual: \"{actual}\" expected to contain: \"{expected}\"")
    })
}

fn assert_array_includes(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    let (Value::Array(actual), Value::Array(expected)) = (arg(args, 0), arg(args, 1)) else {
        return Err(type_error("assertArrayIncludes expects two arrays"));
    };
    let missing: Vec<Value> = {
        let actual = actual.borrow();
        expected
            .borrow()
            .iter()
            .filter(|wanted| !actual.iter().any(|item| deep_equals(item, wanted)))
            .cloned()
            .collect()
    };
    if missing.is_empty() {
        return Ok(Value::Undefined);
    }
    fail(args, 2, || {
        format!(
            "actual: {} expected to include: {}\nmissing: {}",
            dump(&Value::Array(Rc::clone(&actual))),
            dump(&Value::Array(Rc::clone(&expected))),
            dump(&Value::array(missing))
        )
    })
}

fn match_operands(name: &str, args: &[Value]) -> EvalResult<(Rc<str>, Rc<RegExpValue>)> {
    match (arg(args, 0), arg(args, 1)) {
        (Value::Str(actual), Value::RegExp(expected)) => Ok((actual, expected)),
        _ => Err(type_error(format!(
            "{name} expects a string and a regular expression"
        ))),
    }
}

fn assert_match(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    let (actual, expected) = match_operands("assertMatch", args)?;
    if expected.regex.is_match(&actual) {
        return Ok(Value::Undefined);
    }
    fail(args, 2, || {
        format!(
            "actual: \"{actual}\" expected to match: /{}/{}",
            expected.source, expected.flags
        )
    })
}

fn assert_not_match(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    let (actual, expected) = match_operands("assertNotMatch", args)?;
    if !expected.regex.is_match(&actual) {
        return Ok(Value::Undefined);
    }
    fail(args, 2, || {
        format!(
            "actual: \"{actual}\" expected to not match: /{}/{}",
            expected.source, expected.flags
        )
    })
}

/// Check a caught error against the optional class and message fragment
/// of `assertThrows`/`assertThrowsAsync`.
fn check_thrown(thrown: &Value, args: &[Value]) -> Result<(), Value> {
    let class = arg(args, 1);
    if let Value::Native(native) = &class {
        let matches = match thrown {
            Value::Error(err) => native.name == "Error" || &*err.name == native.name,
            _ => false,
        };
        if !matches {
            let actual = match thrown {
                Value::Error(err) => err.name.to_string(),
                other => dump(other),
            };
            return Err(failure(args, 3, || {
                format!(
                    "Expected error to be instance of \"{}\", but was \"{actual}\".",
                    native.name
                )
            }));
        }
    }
    if let Value::Str(includes) = arg(args, 2) {
        let message = match thrown {
            Value::Error(err) => err.message(),
            other => to_display_string(other),
        };
        if !message.contains(&*includes) {
            return Err(failure(args, 3, || {
                format!(
                    "Expected error message to include \"{includes}\", but got \"{message}\"."
                )
            }));
        }
    }
    Ok(())
}

/// `assertThrows(fn, ErrorClass?, msgIncludes?, msg?)` returns the error.
fn assert_throws(interp: &mut Interpreter, args: &[Value]) -> EvalResult {
    let func = arg(args, 0);
    match interp.call_function(&func, Vec::new()) {
        Ok(_) => fail(args, 3, || "Expected function to throw.".to_string()),
        Err(Unwind::Throw(thrown)) => match check_thrown(&thrown, args) {
            Ok(()) => Ok(thrown),
            Err(failure) => Err(Unwind::Throw(failure)),
        },
        Err(fatal @ Unwind::Fatal(_)) => Err(fatal),
    }
}

/// Asynchronous counterpart of [`assert_throws`]: returns a promise that
/// rejects with the `AssertionError`, or fulfills with the rejection reason.
fn assert_throws_async(interp: &mut Interpreter, args: &[Value]) -> EvalResult {
    let func = arg(args, 0);
    let outcome = match interp.call_function(&func, Vec::new()) {
        Ok(Value::Promise(settled)) => match &*settled {
            Settled::Fulfilled(_) => Err(failure(args, 3, || {
                "Expected function to reject.".to_string()
            })),
            Settled::Rejected(reason) => check_thrown(reason, args).map(|()| reason.clone()),
        },
        Ok(_) => Err(failure(args, 3, || {
            "Function did not return a promise.".to_string()
        })),
        Err(Unwind::Throw(_)) => Err(failure(args, 3, || {
            "Function throws when expected to reject.".to_string()
        })),
        Err(fatal @ Unwind::Fatal(_)) => return Err(fatal),
    };
    Ok(match outcome {
        Ok(reason) => Value::fulfilled(reason),
        Err(failure) => Value::rejected(failure),
    })
}

/// Structural equality used by `assertEquals`.
pub fn deep_equals(left: &Value, right: &Value) -> bool {
    let mut seen = Vec::new();
    deep_equals_inner(left, right, &mut seen)
}

fn deep_equals_inner(left: &Value, right: &Value, seen: &mut Vec<(usize, usize)>) -> bool {
    if same_value(left, right) || same_reference(left, right) {
        return true;
    }
    ensure_sufficient_stack(|| match (left, right) {
        (Value::Array(a), Value::Array(b)) => {
            let pair = (Rc::as_ptr(a) as usize, Rc::as_ptr(b) as usize);
            if seen.contains(&pair) {
                return true;
            }
            seen.push(pair);
            let (a, b) = (a.borrow(), b.borrow());
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(x, y)| deep_equals_inner(x, y, seen))
        }
        (Value::Object(a), Value::Object(b)) => {
            let pair = (Rc::as_ptr(a) as usize, Rc::as_ptr(b) as usize);
            if seen.contains(&pair) {
                return true;
            }
            seen.push(pair);
            let (a, b) = (a.borrow(), b.borrow());
            a.len() == b.len()
                && a.iter().all(|(key, x)| {
                    b.get(key)
                        .is_some_and(|y| deep_equals_inner(x, y, seen))
                })
        }
        (Value::Error(a), Value::Error(b)) => a.name == b.name && a.message() == b.message(),
        (Value::RegExp(a), Value::RegExp(b)) => a.source == b.source && a.flags == b.flags,
        (Value::Promise(a), Value::Promise(b)) => match (&**a, &**b) {
            (Settled::Fulfilled(x), Settled::Fulfilled(y))
            | (Settled::Rejected(x), Settled::Rejected(y)) => deep_equals_inner(x, y, seen),
            _ => false,
        },
        _ => false,
    })
}
