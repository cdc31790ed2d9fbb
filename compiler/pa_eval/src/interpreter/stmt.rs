//! Statement execution.

use std::rc::Rc;

use pa_ir::{CatchClause, ForInit, Function, Stmt, StmtKind, VarDecl, VarKind};

use super::Interpreter;
use crate::environment::Mutability;
use crate::errors::{type_error, EvalError, EvalResult, Unwind};
use crate::value::{Closure, Value};

/// How a statement finished.
#[derive(Debug)]
pub(crate) enum Completion {
    Normal,
    Return(Value),
    Break,
    Continue,
}

impl Interpreter {
    /// Execute `stmts` in a new block scope.
    pub(crate) fn exec_block(&mut self, stmts: &[Stmt]) -> EvalResult<Completion> {
        self.with_env_scope(|interp| interp.exec_stmts(stmts))
    }

    /// Execute `stmts` in the current scope. Imports and function
    /// declarations are hoisted to the top of the list.
    pub(crate) fn exec_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<Completion> {
        for stmt in stmts {
            match &stmt.kind {
                StmtKind::Import(decl) => self.exec_import(decl)?,
                StmtKind::Function(func) => self.declare_function(func),
                StmtKind::Export(inner) => {
                    if let StmtKind::Function(func) = &inner.kind {
                        self.declare_function(func);
                    }
                }
                _ => {}
            }
        }
        for stmt in stmts {
            let completion = self.exec_stmt(stmt)?;
            if !matches!(completion, Completion::Normal) {
                return Ok(completion);
            }
        }
        Ok(Completion::Normal)
    }

    fn declare_function(&mut self, func: &Rc<Function>) {
        if let Some(name) = &func.name {
            let closure = self.make_closure(func);
            self.env.define(name, closure, Mutability::Mutable);
        }
    }

    pub(crate) fn make_closure(&self, func: &Rc<Function>) -> Value {
        Value::Function(Rc::new(Closure {
            func: Rc::clone(func),
            scope: self.env.current_scope(),
            file: Rc::clone(&self.file),
        }))
    }

    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Completion> {
        match &stmt.kind {
            // Hoisted by `exec_stmts`.
            StmtKind::Import(_) | StmtKind::Function(_) | StmtKind::Empty => Ok(Completion::Normal),
            StmtKind::Export(inner) => self.exec_stmt(inner),
            StmtKind::Var(decl) => {
                self.exec_var(decl)?;
                Ok(Completion::Normal)
            }
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(Completion::Normal)
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                if self.eval_expr(test)?.is_truthy() {
                    self.exec_nested(consequent)
                } else if let Some(alternate) = alternate {
                    self.exec_nested(alternate)
                } else {
                    Ok(Completion::Normal)
                }
            }
            StmtKind::Block(stmts) => self.exec_block(stmts),
            StmtKind::While { test, body } => {
                while self.eval_expr(test)?.is_truthy() {
                    match self.exec_nested(body)? {
                        Completion::Break => break,
                        Completion::Normal | Completion::Continue => {}
                        ret @ Completion::Return(_) => return Ok(ret),
                    }
                }
                Ok(Completion::Normal)
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => self.with_env_scope(|interp| {
                match init {
                    Some(ForInit::Var(decl)) => interp.exec_var(decl)?,
                    Some(ForInit::Expr(expr)) => {
                        interp.eval_expr(expr)?;
                    }
                    None => {}
                }
                loop {
                    if let Some(test) = test {
                        if !interp.eval_expr(test)?.is_truthy() {
                            break;
                        }
                    }
                    match interp.exec_nested(body)? {
                        Completion::Break => break,
                        Completion::Normal | Completion::Continue => {}
                        ret @ Completion::Return(_) => return Ok(ret),
                    }
                    if let Some(update) = update {
                        interp.eval_expr(update)?;
                    }
                }
                Ok(Completion::Normal)
            }),
            StmtKind::ForOf {
                kind,
                name,
                iterable,
                body,
            } => {
                let iterable = self.eval_expr(iterable)?;
                for item in self.iterate(&iterable)? {
                    let completion = self.with_env_scope(|interp| {
                        interp.env.define(name, item, binding_mutability(*kind));
                        interp.exec_nested(body)
                    })?;
                    match completion {
                        Completion::Break => break,
                        Completion::Normal | Completion::Continue => {}
                        ret @ Completion::Return(_) => return Ok(ret),
                    }
                }
                Ok(Completion::Normal)
            }
            StmtKind::Break => Ok(Completion::Break),
            StmtKind::Continue => Ok(Completion::Continue),
            StmtKind::Throw(expr) => Err(Unwind::Throw(self.eval_expr(expr)?)),
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => self.exec_try(block, handler.as_ref(), finalizer.as_deref()),
        }
    }

    /// A statement in a body position. Declarations there get their own
    /// scope.
    fn exec_nested(&mut self, stmt: &Stmt) -> EvalResult<Completion> {
        match &stmt.kind {
            StmtKind::Block(_) => self.exec_stmt(stmt),
            _ => self.exec_block(std::slice::from_ref(stmt)),
        }
    }

    fn exec_var(&mut self, decl: &VarDecl) -> EvalResult<()> {
        for declarator in &decl.declarations {
            let value = match &declarator.init {
                Some(init) => self.eval_expr(init)?,
                None => Value::Undefined,
            };
            self.env
                .define(&declarator.name, value, binding_mutability(decl.kind));
        }
        Ok(())
    }

    fn exec_try(
        &mut self,
        block: &[Stmt],
        handler: Option<&CatchClause>,
        finalizer: Option<&[Stmt]>,
    ) -> EvalResult<Completion> {
        let mut result = self.exec_block(block);
        if let (Err(Unwind::Throw(thrown)), Some(handler)) = (&result, handler) {
            let thrown = thrown.clone();
            result = self.with_env_scope(|interp| {
                if let Some(param) = &handler.param {
                    interp.env.define(param, thrown, Mutability::Mutable);
                }
                interp.exec_stmts(&handler.body)
            });
        }
        if let Some(finalizer) = finalizer {
            let completion = self.exec_block(finalizer)?;
            if !matches!(completion, Completion::Normal) {
                return Ok(completion);
            }
        }
        result
    }

    /// Elements visited by `for ... of` and spread.
    pub(crate) fn iterate(&self, value: &Value) -> EvalResult<Vec<Value>> {
        match value {
            Value::Array(items) => Ok(items.borrow().clone()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::from(c.to_string())).collect()),
            Value::Recorder(_) | Value::Recorded(_) => Err(EvalError::Invariant(
                "recorder values cannot be iterated".to_string(),
            )
            .into()),
            other => Err(type_error(format!(
                "{} is not iterable",
                crate::stringify::dump(other)
            ))),
        }
    }
}

fn binding_mutability(kind: VarKind) -> Mutability {
    match kind {
        VarKind::Const => Mutability::Immutable,
        VarKind::Let | VarKind::Var => Mutability::Mutable,
    }
}
