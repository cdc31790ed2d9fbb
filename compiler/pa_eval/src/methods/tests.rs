#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::{dispatch_builtin_method, get_property, set_property};
use crate::errors::Unwind;
use crate::interpreter::Interpreter;
use crate::stringify::dump;
use crate::value::{Object, Value};

fn call(receiver: &Value, name: &str, args: Vec<Value>) -> String {
    let mut interp = Interpreter::new();
    dump(&dispatch_builtin_method(&mut interp, receiver, name, args).unwrap())
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn string_properties_count_chars() {
    let s = Value::from("日本語");
    assert_eq!(dump(&get_property(&s, "length").unwrap()), "3");
    assert_eq!(dump(&get_property(&s, "1").unwrap()), "\"本\"");
    assert_eq!(dump(&get_property(&s, "9").unwrap()), "undefined");
    assert_eq!(call(&s, "indexOf", vec![Value::from("語")]), "2");
    assert_eq!(call(&s, "slice", vec![num(1.0)]), "\"本語\"");
}

#[test]
fn array_reads_and_writes() {
    let items = Value::array(vec![num(1.0)]);
    set_property(&items, "2", num(3.0)).unwrap();
    assert_eq!(dump(&items), "[1,undefined,3]");
    set_property(&items, "length", num(1.0)).unwrap();
    assert_eq!(dump(&items), "[1]");
    assert_eq!(dump(&get_property(&items, "0").unwrap()), "1");
    assert_eq!(dump(&get_property(&items, "push").unwrap()), "#function#");
    assert_eq!(dump(&get_property(&items, "nope").unwrap()), "undefined");
}

#[test]
fn array_methods() {
    let items = Value::array(vec![num(1.0), num(f64::NAN), Value::from("a")]);
    assert_eq!(call(&items, "includes", vec![num(f64::NAN)]), "true");
    assert_eq!(call(&items, "indexOf", vec![num(f64::NAN)]), "-1");
    assert_eq!(call(&items, "join", vec![]), "\"1,NaN,a\"");
    assert_eq!(call(&items, "slice", vec![num(-2.0)]), "[NaN,\"a\"]");
    assert_eq!(call(&items, "pop", vec![]), "\"a\"");
    assert_eq!(call(&items, "push", vec![num(4.0)]), "3");
}

#[test]
fn string_methods() {
    let s = Value::from("  Power Assert ");
    assert_eq!(call(&s, "trim", vec![]), "\"Power Assert\"");
    assert_eq!(call(&s, "includes", vec![Value::from("Assert")]), "true");
    assert_eq!(
        call(&Value::from("a-b-c"), "split", vec![Value::from("-")]),
        "[\"a\",\"b\",\"c\"]"
    );
    assert_eq!(call(&Value::from("ab"), "split", vec![Value::from("")]), "[\"a\",\"b\"]");
    assert_eq!(call(&Value::from("ab"), "startsWith", vec![Value::from("a")]), "true");
}

#[test]
fn objects_and_errors() {
    let object = Value::object(Object::new().with("a", num(1.0)));
    set_property(&object, "b", num(2.0)).unwrap();
    assert_eq!(dump(&object), "Object{a:1,b:2}");

    let err = Value::error("Error", "first");
    set_property(&err, "message", Value::from("second")).unwrap();
    assert_eq!(dump(&get_property(&err, "message").unwrap()), "\"second\"");
    assert_eq!(dump(&get_property(&err, "name").unwrap()), "\"Error\"");
}

#[test]
fn nullish_receivers_throw() {
    let err = get_property(&Value::Undefined, "x").unwrap_err();
    assert!(matches!(err, Unwind::Throw(Value::Error(e)) if &*e.name == "TypeError"));
    assert!(set_property(&Value::Null, "x", num(1.0)).is_err());
}

#[test]
fn settled_promise_handlers_run_immediately() {
    let mut interp = Interpreter::new();
    let promise = Value::fulfilled(num(1.0));
    let ignored = dispatch_builtin_method(&mut interp, &promise, "catch", vec![Value::Null]).unwrap();
    assert_eq!(dump(&ignored), "Promise{fulfilled:1}");
}

#[test]
fn recorder_expr_reads_the_snippet_object() {
    let mut interp = Interpreter::new();
    let recorder = crate::builtins::recorder_constructor(&mut interp, Vec::new()).unwrap();
    dispatch_builtin_method(
        &mut interp,
        &recorder,
        "capture",
        vec![num(1.0), Value::from("arguments/0")],
    )
    .unwrap();
    let snippet = Value::object(
        Object::new()
            .with("content", Value::from("assert(x);"))
            .with("filepath", Value::from("/t/a.test.js"))
            .with("line", num(4.0))
            .with("async", Value::Bool(true)),
    );
    let recorded =
        dispatch_builtin_method(&mut interp, &recorder, "expr", vec![num(1.0), snippet]).unwrap();
    let Value::Recorded(recorded) = recorded else {
        panic!("expected a recorded argument");
    };
    assert_eq!(recorded.captures.len(), 1);
    assert_eq!(recorded.snippet.line, 4);
    assert!(recorded.snippet.is_async);
    assert!(!recorded.snippet.is_generator);

    let missing = dispatch_builtin_method(&mut interp, &recorder, "expr", vec![num(1.0)]);
    assert!(matches!(missing, Err(Unwind::Fatal(_))));
}
