//! Runtime values.
//!
//! Primitives are stored inline. Everything with identity sits behind an
//! `Rc`, so `===` on two arrays compares pointers and a captured object
//! shows later mutations, as it would in the host language.

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use pa_ir::{Function, Literal};
use pa_runtime::{CapturedValue, RecordedArgument, Recorder};
use regex::Regex;

use crate::environment::{LocalScope, Scope};
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::stringify::dump;

#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<Object>>),
    Function(Rc<Closure>),
    Native(Rc<NativeFunction>),
    Error(Rc<ErrorValue>),
    RegExp(Rc<RegExpValue>),
    /// Promises settle as soon as they are created.
    Promise(Rc<Settled>),
    Recorder(Rc<RefCell<Recorder<Value>>>),
    Recorded(Rc<RecordedArgument<Value>>),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    pub fn error(name: &str, message: impl Into<String>) -> Self {
        Value::Error(Rc::new(ErrorValue {
            name: Rc::from(name),
            message: RefCell::new(message.into()),
        }))
    }

    pub fn native(name: &'static str, func: NativeFn) -> Self {
        Value::Native(Rc::new(NativeFunction::new(
            name,
            NativeKind::Function {
                func,
                constructor: false,
            },
        )))
    }

    /// A native that may also be called with `new`.
    pub fn constructor(name: &'static str, func: NativeFn) -> Self {
        Self::class(name, func, Object::new())
    }

    /// A constructor with static members, such as `Promise.resolve`.
    pub fn class(name: &'static str, func: NativeFn, statics: Object) -> Self {
        Value::Native(Rc::new(NativeFunction {
            name,
            kind: NativeKind::Function {
                func,
                constructor: true,
            },
            statics,
        }))
    }

    pub fn fulfilled(value: Value) -> Self {
        Value::Promise(Rc::new(Settled::Fulfilled(value)))
    }

    pub fn rejected(reason: Value) -> Self {
        Value::Promise(Rc::new(Settled::Rejected(reason)))
    }

    /// Result of the `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) | Value::Native(_) => "function",
            Value::Null
            | Value::Array(_)
            | Value::Object(_)
            | Value::Error(_)
            | Value::RegExp(_)
            | Value::Promise(_)
            | Value::Recorder(_)
            | Value::Recorded(_) => "object",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Native(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&dump(self))
    }
}

impl CapturedValue for Value {
    fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Number(n) => Value::Number(*n),
            Literal::Str(s) => Value::string(s.as_str()),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
            Literal::RegExp { pattern, flags } => RegExpValue::new(pattern, flags)
                .map_or(Value::Undefined, |re| Value::RegExp(Rc::new(re))),
        }
    }

    fn dump(&self) -> String {
        dump(self)
    }
}

/// Plain object with insertion-ordered keys.
#[derive(Clone, Debug, Default)]
pub struct Object {
    entries: Vec<(Rc<str>, Value)>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| v)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| &**k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((Rc::from(key), value)),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.set(key, value);
        self
    }
}

/// A script function closed over its defining scope.
pub struct Closure {
    pub func: Rc<Function>,
    pub scope: LocalScope<Scope>,
    /// File the function was defined in, for dynamic imports.
    pub file: Rc<Path>,
}

pub type NativeFn = fn(&mut Interpreter, Vec<Value>) -> EvalResult;

/// Assertion predicate. Throws (or rejects) with an `AssertionError` on
/// failure.
pub type Predicate = fn(&mut Interpreter, &[Value]) -> EvalResult;

pub struct NativeFunction {
    pub name: &'static str,
    pub kind: NativeKind,
    /// Properties read through the function itself.
    pub statics: Object,
}

impl NativeFunction {
    pub fn new(name: &'static str, kind: NativeKind) -> Self {
        NativeFunction {
            name,
            kind,
            statics: Object::new(),
        }
    }

    /// Whether `new` may be applied.
    pub fn is_constructor(&self) -> bool {
        matches!(
            self.kind,
            NativeKind::Function {
                constructor: true,
                ..
            }
        )
    }
}

pub enum NativeKind {
    Function { func: NativeFn, constructor: bool },
    /// A built-in method bound to its receiver (`[1, 2].map`).
    Method { receiver: Value },
    /// Exported by `power-assert`; called through the empowering wrapper.
    Assertion(Predicate),
}

pub struct ErrorValue {
    pub name: Rc<str>,
    /// Mutable so a failing assertion can append its diagram.
    pub message: RefCell<String>,
}

impl ErrorValue {
    pub fn message(&self) -> String {
        self.message.borrow().clone()
    }
}

pub struct RegExpValue {
    pub source: String,
    pub flags: String,
    pub regex: Regex,
}

impl RegExpValue {
    pub fn new(source: &str, flags: &str) -> Result<Self, regex::Error> {
        let mut inline = String::new();
        for flag in flags.chars() {
            if matches!(flag, 'i' | 'm' | 's') {
                inline.push(flag);
            }
        }
        let pattern = if inline.is_empty() {
            source.to_string()
        } else {
            format!("(?{inline}){source}")
        };
        Ok(RegExpValue {
            source: source.to_string(),
            flags: flags.to_string(),
            regex: Regex::new(&pattern)?,
        })
    }
}

pub enum Settled {
    Fulfilled(Value),
    Rejected(Value),
}

#[cfg(test)]
mod tests;
