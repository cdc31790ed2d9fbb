#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pa_ir::{BinaryOp, UnaryOp};
use pretty_assertions::assert_eq;

use super::{evaluate_binary, evaluate_unary, loose_equals, same_value, strict_equals, to_number};
use crate::errors::Unwind;
use crate::stringify::dump;
use crate::value::{NativeFn, Object, Value};

fn binary(left: Value, op: BinaryOp, right: Value) -> String {
    dump(&evaluate_binary(&left, &right, op).unwrap())
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn arithmetic() {
    assert_eq!(binary(num(1.0), BinaryOp::Add, num(2.0)), "3");
    assert_eq!(binary(num(7.0), BinaryOp::Rem, num(4.0)), "3");
    assert_eq!(binary(num(2.0), BinaryOp::Exp, num(10.0)), "1024");
    assert_eq!(binary(num(1.0), BinaryOp::Div, num(0.0)), "Infinity");
    assert_eq!(binary(Value::from("3"), BinaryOp::Mul, num(2.0)), "6");
}

#[test]
fn addition_concatenates_strings_and_objects() {
    assert_eq!(binary(Value::from("a"), BinaryOp::Add, num(1.0)), "\"a1\"");
    assert_eq!(binary(num(1.0), BinaryOp::Add, Value::from("a")), "\"1a\"");
    assert_eq!(
        binary(Value::array(vec![num(1.0), num(2.0)]), BinaryOp::Add, num(3.0)),
        "\"1,23\""
    );
    assert_eq!(binary(Value::Bool(true), BinaryOp::Add, num(1.0)), "2");
}

#[test]
fn comparisons() {
    assert_eq!(binary(Value::from("a"), BinaryOp::Lt, Value::from("b")), "true");
    assert_eq!(binary(Value::from("10"), BinaryOp::Lt, num(9.0)), "false");
    assert_eq!(binary(num(f64::NAN), BinaryOp::GtEq, num(0.0)), "false");
    assert_eq!(binary(num(2.0), BinaryOp::LtEq, num(2.0)), "true");
}

#[test]
fn equality() {
    assert!(strict_equals(&num(1.0), &num(1.0)));
    assert!(!strict_equals(&num(1.0), &Value::from("1")));
    assert!(loose_equals(&num(1.0), &Value::from("1")));
    assert!(loose_equals(&Value::Null, &Value::Undefined));
    assert!(!loose_equals(&Value::Null, &num(0.0)));
    assert!(loose_equals(&Value::Bool(true), &num(1.0)));

    let array = Value::array(Vec::new());
    assert!(strict_equals(&array, &array.clone()));
    assert!(!strict_equals(&array, &Value::array(Vec::new())));
}

#[test]
fn same_value_distinguishes_nan_and_signed_zero() {
    assert!(same_value(&num(f64::NAN), &num(f64::NAN)));
    assert!(!same_value(&num(0.0), &num(-0.0)));
    assert!(!strict_equals(&num(f64::NAN), &num(f64::NAN)));
}

#[test]
fn number_conversion() {
    assert_eq!(to_number(&Value::from(" 42 ")).to_bits(), 42f64.to_bits());
    assert_eq!(to_number(&Value::from("")).to_bits(), 0f64.to_bits());
    assert_eq!(to_number(&Value::from("0x10")).to_bits(), 16f64.to_bits());
    assert!(to_number(&Value::from("inf")).is_nan());
    assert!(to_number(&Value::Undefined).is_nan());
    assert_eq!(to_number(&Value::array(vec![num(5.0)])).to_bits(), 5f64.to_bits());
}

#[test]
fn unary_operators() {
    assert_eq!(dump(&evaluate_unary(UnaryOp::TypeOf, &Value::Null)), "\"object\"");
    assert_eq!(dump(&evaluate_unary(UnaryOp::Not, &Value::from(""))), "true");
    assert_eq!(dump(&evaluate_unary(UnaryOp::Neg, &Value::from("2"))), "-2");
    assert_eq!(dump(&evaluate_unary(UnaryOp::Void, &num(1.0))), "undefined");
}

fn error_ctor() -> Value {
    let func: NativeFn = |_, _| Ok(Value::Undefined);
    Value::constructor("Error", func)
}

#[test]
fn instanceof_checks_error_names() {
    let type_error = Value::error("TypeError", "x");
    assert_eq!(binary(type_error, BinaryOp::InstanceOf, error_ctor()), "true");
    assert_eq!(binary(num(1.0), BinaryOp::InstanceOf, error_ctor()), "false");
    let err = evaluate_binary(&num(1.0), &num(2.0), BinaryOp::InstanceOf).unwrap_err();
    assert!(matches!(err, Unwind::Throw(Value::Error(e)) if &*e.name == "TypeError"));
}

#[test]
fn in_operator() {
    let object = Value::object(Object::new().with("a", num(1.0)));
    assert_eq!(binary(Value::from("a"), BinaryOp::In, object.clone()), "true");
    assert_eq!(binary(Value::from("b"), BinaryOp::In, object), "false");
    assert_eq!(
        binary(num(0.0), BinaryOp::In, Value::array(vec![num(1.0)])),
        "true"
    );
    assert!(evaluate_binary(&Value::from("a"), &num(1.0), BinaryOp::In).is_err());
}
