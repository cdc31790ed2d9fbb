use pretty_assertions::assert_eq;

use super::{dump, quote_json, to_display_string, to_log_string};
use crate::value::{Object, Value};

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn primitives() {
    assert_eq!(dump(&Value::Undefined), "undefined");
    assert_eq!(dump(&Value::Null), "null");
    assert_eq!(dump(&Value::Bool(true)), "true");
    assert_eq!(dump(&num(1.5)), "1.5");
    assert_eq!(dump(&num(-0.0)), "0");
    assert_eq!(dump(&num(f64::NAN)), "NaN");
    assert_eq!(dump(&Value::from("a\"b")), "\"a\\\"b\"");
}

#[test]
fn containers_show_one_level() {
    let array = Value::array(vec![num(1.0), Value::from("a"), Value::array(vec![num(2.0)])]);
    assert_eq!(dump(&array), "[1,\"a\",#Array#]");

    let object = Value::object(
        Object::new()
            .with("a", num(1.0))
            .with("b", Value::object(Object::new()))
            .with("c", Value::error("Error", "x")),
    );
    assert_eq!(dump(&object), "Object{a:1,b:#Object#,c:#Error#}");
}

#[test]
fn errors_and_promises() {
    assert_eq!(dump(&Value::error("Error", "boom")), "Error{message:\"boom\"}");
    assert_eq!(
        dump(&Value::error("TypeError", "bad")),
        "TypeError{message:\"bad\"}"
    );
    assert_eq!(dump(&Value::fulfilled(num(1.0))), "Promise{fulfilled:1}");
    assert_eq!(
        dump(&Value::rejected(Value::error("Error", "no"))),
        "Promise{rejected:#Error#}"
    );
}

#[test]
fn display_strings() {
    assert_eq!(to_display_string(&num(3.0)), "3");
    assert_eq!(
        to_display_string(&Value::array(vec![num(1.0), Value::Null, Value::from("x")])),
        "1,,x"
    );
    assert_eq!(to_display_string(&Value::object(Object::new())), "[object Object]");
    assert_eq!(to_display_string(&Value::error("Error", "boom")), "Error: boom");
    assert_eq!(to_display_string(&Value::error("Error", "")), "Error");
}

#[test]
fn log_strings_leave_strings_bare() {
    assert_eq!(to_log_string(&Value::from("hi")), "hi");
    assert_eq!(to_log_string(&Value::array(vec![Value::from("hi")])), "[\"hi\"]");
}

#[test]
fn json_escapes() {
    assert_eq!(quote_json("a\nb\t\\"), "\"a\\nb\\t\\\\\"");
    assert_eq!(quote_json("\u{1}"), "\"\\u0001\"");
}
