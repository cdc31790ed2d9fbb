//! Tree-walking interpreter for instrumented test files.
//!
//! Evaluation works directly on the `pa_ir` tree. Statements live in
//! `stmt.rs`, expressions in `expr.rs`, and function calls (closures,
//! natives and the empowered predicates) in `call.rs`.
//!
//! Each function call swaps in a fresh [`Environment`] rooted at the
//! closure's captured scope, together with the file the closure was defined
//! in, and restores both on the way out. Module bodies run in a scope whose
//! parent holds the globals.

mod call;
mod expr;
mod stmt;

use std::mem;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pa_ir::Program;
use rustc_hash::FxHashMap;

use crate::builtins::install_globals;
use crate::environment::{Environment, LocalScope, Scope};
use crate::errors::{EvalError, EvalResult, Unwind};
use crate::print_handler::PrintHandler;
use crate::stringify::to_display_string;
use crate::value::{Settled, Value};

pub(crate) use stmt::Completion;

/// Deepest script call nesting before a `RangeError` is thrown.
const MAX_CALL_DEPTH: usize = 4096;

/// A `test(name, fn)` registration, run after the file body finishes.
#[derive(Clone, Debug)]
pub struct RegisteredTest {
    pub name: String,
    pub func: Value,
}

pub struct Interpreter {
    pub(crate) env: Environment,
    pub(crate) globals: LocalScope<Scope>,
    /// File whose code is running; relative imports resolve against it.
    pub(crate) file: Rc<Path>,
    /// Evaluated modules, keyed by normalized path or built-in specifier.
    pub(crate) modules: FxHashMap<String, Value>,
    pub(crate) tests: Vec<RegisteredTest>,
    pub(crate) print: PrintHandler,
    /// Wrap appended diagrams in ANSI red.
    pub(crate) color: bool,
    pub(crate) call_depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        let mut globals = Scope::new();
        install_globals(&mut globals);
        let globals = LocalScope::new(globals);
        Interpreter {
            env: Environment::new(LocalScope::new(Scope::with_parent(globals.clone()))),
            globals,
            file: Rc::from(Path::new("<main>")),
            modules: FxHashMap::default(),
            tests: Vec::new(),
            print: PrintHandler::default(),
            color: false,
            call_depth: 0,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_output(mut self, print: PrintHandler) -> Self {
        self.print = print;
        self
    }

    pub fn output(&self) -> String {
        self.print.output()
    }

    /// Tests registered so far, in registration order.
    pub fn tests(&self) -> &[RegisteredTest] {
        &self.tests
    }

    /// Evaluate the body of the entry file at `file`.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.display()))]
    pub fn run_main(&mut self, program: &Program, file: &Path) -> Result<(), EvalError> {
        let path = normalize(file);
        let namespace = Value::object(crate::value::Object::new());
        self.modules
            .insert(path.to_string_lossy().into_owned(), namespace.clone());
        let result = self.eval_module(program, &path, &namespace);
        tracing::debug!(tests = self.tests.len(), "module body finished");
        result.map_err(uncaught)
    }

    /// Run one registered test to completion.
    #[tracing::instrument(level = "debug", skip_all, fields(test = %test.name))]
    pub fn run_test(&mut self, test: &RegisteredTest) -> Result<(), EvalError> {
        match self.call_function(&test.func, Vec::new()) {
            Ok(Value::Promise(settled)) => match &*settled {
                Settled::Fulfilled(_) => Ok(()),
                Settled::Rejected(reason) => Err(EvalError::Uncaught(to_display_string(reason))),
            },
            Ok(_) => Ok(()),
            Err(unwind) => Err(uncaught(unwind)),
        }
    }

    /// Run `f` inside a new innermost block scope.
    pub(crate) fn with_env_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        self.env.push_scope();
        let result = f(self);
        self.env.pop_scope();
        result
    }

    /// Run `f` with `env` and `file` swapped in, restoring the caller's
    /// afterwards.
    pub(crate) fn with_frame<T>(
        &mut self,
        env: Environment,
        file: Rc<Path>,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        let saved_env = mem::replace(&mut self.env, env);
        let saved_file = mem::replace(&mut self.file, file);
        let result = f(self);
        self.env = saved_env;
        self.file = saved_file;
        result
    }

    /// Environment for a module body: a fresh scope below the globals.
    pub(crate) fn module_env(&self) -> Environment {
        Environment::new(LocalScope::new(Scope::with_parent(self.globals.clone())))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn uncaught(unwind: Unwind) -> EvalError {
    match unwind {
        Unwind::Throw(value) => EvalError::Uncaught(to_display_string(&value)),
        Unwind::Fatal(err) => err,
    }
}

/// Lexically resolve `.` and `..` components.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests;
