use pa_ir::Literal;
use pa_runtime::CapturedValue;
use pretty_assertions::assert_eq;

use super::{Object, RegExpValue, Value};

#[test]
fn type_of_matches_host_language() {
    assert_eq!(Value::Undefined.type_of(), "undefined");
    assert_eq!(Value::Null.type_of(), "object");
    assert_eq!(Value::from(1.0).type_of(), "number");
    assert_eq!(Value::from("s").type_of(), "string");
    assert_eq!(Value::array(Vec::new()).type_of(), "object");
    assert_eq!(Value::error("Error", "x").type_of(), "object");
}

#[test]
fn truthiness() {
    let falsy = [
        Value::Undefined,
        Value::Null,
        Value::Bool(false),
        Value::Number(0.0),
        Value::Number(f64::NAN),
        Value::from(""),
    ];
    for value in &falsy {
        assert!(!value.is_truthy(), "{value:?} should be falsy");
    }
    assert!(Value::array(Vec::new()).is_truthy());
    assert!(Value::object(Object::new()).is_truthy());
    assert!(Value::from("0").is_truthy());
}

#[test]
fn object_keeps_insertion_order_on_overwrite() {
    let mut object = Object::new().with("b", Value::Number(1.0)).with("a", Value::Number(2.0));
    object.set("b", Value::Number(3.0));
    let keys: Vec<&str> = object.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["b", "a"]);
    assert_eq!(object.len(), 2);
    assert!(object.contains("a"));
    assert!(!object.contains("c"));
}

#[test]
fn literals_become_values() {
    assert_eq!(Value::from_literal(&Literal::Number(2.0)).dump(), "2");
    assert_eq!(Value::from_literal(&Literal::Str("a".into())).dump(), "\"a\"");
    assert_eq!(Value::from_literal(&Literal::Null).dump(), "null");
    let re = Value::from_literal(&Literal::RegExp {
        pattern: "ab+".into(),
        flags: "g".into(),
    });
    assert_eq!(re.dump(), "/ab+/g");
}

#[test]
fn regexp_flags_map_to_inline_flags() {
    let re = RegExpValue::new("abc", "i").unwrap_or_else(|err| panic!("{err}"));
    assert!(re.regex.is_match("xABCx"));
    assert!(RegExpValue::new("(", "").is_err());
}
