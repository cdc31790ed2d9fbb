//! Expression evaluation.

use std::rc::Rc;

use pa_ir::{Expr, ExprKind, Literal, LogicalOp, Property, UnaryOp, UpdateOp};
use pa_stack::ensure_sufficient_stack;

use super::Interpreter;
use crate::environment::AssignError;
use crate::errors::{
    assignment_to_constant, reference_error, syntax_error, type_error, EvalError, EvalResult,
    Unwind,
};
use crate::methods::{get_property, set_property};
use crate::operators::{evaluate_binary, evaluate_unary, to_number};
use crate::stringify::to_display_string;
use crate::value::{Object, RegExpValue, Settled, Value};

/// Where an assignment or update writes to.
enum Target {
    Name(String),
    Property(Value, String),
}

impl Interpreter {
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Literal(literal) => eval_literal(literal),
            ExprKind::Ident(name) => self.lookup(name),
            ExprKind::Array(elements) => Ok(Value::array(self.eval_list(elements)?)),
            ExprKind::Object(properties) => self.eval_object(properties),
            ExprKind::Function(func) => Ok(self.make_closure(func)),
            ExprKind::Call { callee, arguments } => self.eval_call(callee, arguments),
            ExprKind::New { callee, arguments } => self.eval_new(callee, arguments),
            ExprKind::Member {
                object,
                property,
                computed,
            } => {
                let object = self.eval_expr(object)?;
                let key = self.property_key(property, *computed)?;
                get_property(&object, &key)
            }
            ExprKind::Unary { op, argument } => {
                if let (UnaryOp::TypeOf, ExprKind::Ident(name)) = (op, &argument.kind) {
                    if self.env.lookup(name).is_none() {
                        return Ok(Value::string("undefined"));
                    }
                }
                let operand = self.eval_expr(argument)?;
                Ok(evaluate_unary(*op, &operand))
            }
            ExprKind::Update {
                op,
                prefix,
                argument,
            } => {
                let target = self.resolve_target(argument)?;
                let old = to_number(&self.read_target(&target)?);
                let new = match op {
                    UpdateOp::Increment => old + 1.0,
                    UpdateOp::Decrement => old - 1.0,
                };
                self.write_target(target, Value::Number(new))?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                evaluate_binary(&left, &right, *op)
            }
            ExprKind::Logical { op, left, right } => {
                let left = self.eval_expr(left)?;
                let short_circuit = match op {
                    LogicalOp::And => !left.is_truthy(),
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::Nullish => !left.is_nullish(),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.eval_expr(right)
                }
            }
            ExprKind::Assign { op, left, right } => {
                let target = self.resolve_target(left)?;
                let value = match op.binary() {
                    None => self.eval_expr(right)?,
                    Some(binary) => {
                        let current = self.read_target(&target)?;
                        let right = self.eval_expr(right)?;
                        evaluate_binary(&current, &right, binary)?
                    }
                };
                self.write_target(target, value.clone())?;
                Ok(value)
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval_expr(test)?.is_truthy() {
                    self.eval_expr(consequent)
                } else {
                    self.eval_expr(alternate)
                }
            }
            ExprKind::Sequence(exprs) => {
                let mut last = Value::Undefined;
                for expr in exprs {
                    last = self.eval_expr(expr)?;
                }
                Ok(last)
            }
            ExprKind::Await(argument) => match self.eval_expr(argument)? {
                Value::Promise(settled) => match &*settled {
                    Settled::Fulfilled(value) => Ok(value.clone()),
                    Settled::Rejected(reason) => Err(Unwind::Throw(reason.clone())),
                },
                value => Ok(value),
            },
            ExprKind::Yield { .. } => Err(EvalError::Unsupported { construct: "yield" }.into()),
            ExprKind::Spread(_) => Err(EvalError::Unsupported {
                construct: "spread outside an array or argument list",
            }
            .into()),
            ExprKind::Import(source) => {
                let specifier = self.eval_expr(source)?;
                self.dynamic_import(&specifier)
            }
        }
    }

    fn lookup(&self, name: &str) -> EvalResult {
        self.env.lookup(name).ok_or_else(|| reference_error(name))
    }

    /// Evaluate array elements or call arguments, expanding spreads.
    pub(crate) fn eval_list(&mut self, exprs: &[Expr]) -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(exprs.len());
        for expr in exprs {
            if let ExprKind::Spread(inner) = &expr.kind {
                let spread = self.eval_expr(inner)?;
                values.extend(self.iterate(&spread)?);
            } else {
                values.push(self.eval_expr(expr)?);
            }
        }
        Ok(values)
    }

    fn eval_object(&mut self, properties: &[Property]) -> EvalResult {
        let mut object = Object::new();
        for property in properties {
            let key = self.property_key(&property.key, property.computed)?;
            let value = self.eval_expr(&property.value)?;
            object.set(&key, value);
        }
        Ok(Value::object(object))
    }

    /// Name of a member property or object key.
    pub(crate) fn property_key(&mut self, key: &Expr, computed: bool) -> EvalResult<String> {
        if computed {
            return Ok(to_display_string(&self.eval_expr(key)?));
        }
        match &key.kind {
            ExprKind::Ident(name) => Ok(name.clone()),
            ExprKind::Literal(literal) => Ok(to_display_string(&eval_literal(literal)?)),
            _ => Err(EvalError::Invariant("property key is not a name or literal".to_string()).into()),
        }
    }

    fn resolve_target(&mut self, target: &Expr) -> EvalResult<Target> {
        match &target.kind {
            ExprKind::Ident(name) => Ok(Target::Name(name.clone())),
            ExprKind::Member {
                object,
                property,
                computed,
            } => {
                let object = self.eval_expr(object)?;
                let key = self.property_key(property, *computed)?;
                Ok(Target::Property(object, key))
            }
            _ => Err(syntax_error("Invalid left-hand side in assignment")),
        }
    }

    fn read_target(&self, target: &Target) -> EvalResult {
        match target {
            Target::Name(name) => self.lookup(name),
            Target::Property(object, key) => get_property(object, key),
        }
    }

    fn write_target(&mut self, target: Target, value: Value) -> EvalResult<()> {
        match target {
            Target::Name(name) => match self.env.assign(&name, value) {
                Ok(()) => Ok(()),
                Err(AssignError::Immutable) => Err(assignment_to_constant(&name)),
                Err(AssignError::Undefined) => Err(reference_error(&name)),
            },
            Target::Property(object, key) => set_property(&object, &key, value),
        }
    }

    fn eval_new(&mut self, callee: &Expr, arguments: &[Expr]) -> EvalResult {
        let constructor = self.eval_expr(callee)?;
        let args = self.eval_list(arguments)?;
        match &constructor {
            Value::Native(native) if native.is_constructor() => self.call_function(&constructor, args),
            _ => Err(type_error(format!(
                "{} is not a constructor",
                crate::stringify::dump(&constructor)
            ))),
        }
    }

    /// `import(specifier)`: a settled promise of the module namespace.
    /// Loading failures reject the promise; invariant violations stay fatal.
    fn dynamic_import(&mut self, specifier: &Value) -> EvalResult {
        let Some(specifier) = specifier.as_str() else {
            return Ok(Value::rejected(Value::error(
                "TypeError",
                "import() expects a string specifier",
            )));
        };
        match self.import_module(specifier) {
            Ok(namespace) => Ok(Value::fulfilled(namespace)),
            Err(Unwind::Throw(reason)) => Ok(Value::rejected(reason)),
            Err(Unwind::Fatal(
                err @ (EvalError::ModuleNotFound { .. }
                | EvalError::ModuleIo { .. }
                | EvalError::ModuleParse { .. }
                | EvalError::MissingExport { .. }),
            )) => Ok(Value::rejected(Value::error("Error", err.to_string()))),
            Err(fatal @ Unwind::Fatal(_)) => Err(fatal),
        }
    }
}

fn eval_literal(literal: &Literal) -> EvalResult {
    Ok(match literal {
        Literal::Number(n) => Value::Number(*n),
        Literal::Str(s) => Value::string(s.as_str()),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Null => Value::Null,
        Literal::RegExp { pattern, flags } => {
            let regexp = RegExpValue::new(pattern, flags)
                .map_err(|err| syntax_error(format!("Invalid regular expression: {err}")))?;
            Value::RegExp(Rc::new(regexp))
        }
    })
}
