//! Function calls.

use std::rc::Rc;

use pa_ir::{Expr, ExprKind, FunctionBody};

use super::{Completion, Interpreter, MAX_CALL_DEPTH};
use crate::empower::call_empowered;
use crate::environment::{Environment, LocalScope, Mutability, Scope};
use crate::errors::{not_a_function, EvalError, EvalResult, Unwind};
use crate::methods::{dispatch_builtin_method, get_property};
use crate::value::{Closure, NativeKind, Value};

impl Interpreter {
    pub(crate) fn eval_call(&mut self, callee: &Expr, arguments: &[Expr]) -> EvalResult {
        let func = match &callee.kind {
            ExprKind::Member {
                object,
                property,
                computed,
            } => {
                let object = self.eval_expr(object)?;
                let key = self.property_key(property, *computed)?;
                get_property(&object, &key)?
            }
            _ => self.eval_expr(callee)?,
        };
        let args = self.eval_list(arguments)?;
        self.call_function(&func, args)
    }

    /// Call any callable value.
    pub fn call_function(&mut self, func: &Value, args: Vec<Value>) -> EvalResult {
        match func {
            Value::Function(closure) => self.call_closure(closure, args),
            Value::Native(native) => match &native.kind {
                NativeKind::Function { func, .. } => func(self, args),
                NativeKind::Method { receiver } => {
                    dispatch_builtin_method(self, receiver, native.name, args)
                }
                NativeKind::Assertion(predicate) => {
                    call_empowered(self, native.name, *predicate, &args)
                }
            },
            other => Err(not_a_function(other)),
        }
    }

    fn call_closure(&mut self, closure: &Rc<Closure>, args: Vec<Value>) -> EvalResult {
        let func = &closure.func;
        if func.is_generator {
            return Err(EvalError::Unsupported {
                construct: "generator functions",
            }
            .into());
        }
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(Unwind::Throw(Value::error(
                "RangeError",
                "Maximum call stack size exceeded",
            )));
        }

        let mut scope = Scope::with_parent(closure.scope.clone());
        if !func.is_arrow {
            if let Some(name) = &func.name {
                scope.define(name, Value::Function(Rc::clone(closure)), Mutability::Mutable);
            }
        }
        let mut args = args.into_iter();
        for param in &func.params {
            let value = if param.rest {
                Value::array(args.by_ref().collect())
            } else {
                args.next().unwrap_or(Value::Undefined)
            };
            scope.define(&param.name, value, Mutability::Mutable);
        }

        self.call_depth += 1;
        let env = Environment::new(LocalScope::new(scope));
        let result = self.with_frame(env, Rc::clone(&closure.file), |interp| match &func.body {
            FunctionBody::Block(stmts) => match interp.exec_stmts(stmts)? {
                Completion::Return(value) => Ok(value),
                Completion::Normal | Completion::Break | Completion::Continue => {
                    Ok(Value::Undefined)
                }
            },
            FunctionBody::Expr(expr) => interp.eval_expr(expr),
        });
        self.call_depth -= 1;

        if !func.is_async {
            return result;
        }
        match result {
            Ok(promise @ Value::Promise(_)) => Ok(promise),
            Ok(value) => Ok(Value::fulfilled(value)),
            Err(Unwind::Throw(reason)) => Ok(Value::rejected(reason)),
            Err(fatal @ Unwind::Fatal(_)) => Err(fatal),
        }
    }
}
