//! Module loading.
//!
//! `power-assert` and `power-assert/recorder` are built in. Any other
//! specifier names a file, resolved against the importing file; each file
//! is parsed and evaluated once and its namespace object cached.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use pa_ir::{ImportDecl, ImportSpecifier, Program, StmtKind};

use crate::builtins::{assertion_error_constructor, recorder_constructor};
use crate::environment::Mutability;
use crate::errors::{EvalError, EvalResult};
use crate::interpreter::{normalize, Interpreter};
use crate::predicates::{ASSERTION_ERROR, PREDICATES};
use crate::value::{NativeFunction, NativeKind, Object, Value};

pub const POWER_ASSERT_MODULE: &str = "power-assert";
pub const RECORDER_MODULE: &str = "power-assert/recorder";

fn power_assert_namespace() -> Value {
    let mut exports = Object::new();
    for &(name, predicate) in PREDICATES {
        let native = NativeFunction::new(name, NativeKind::Assertion(predicate));
        exports.set(name, Value::Native(Rc::new(native)));
    }
    exports.set(
        ASSERTION_ERROR,
        Value::constructor(ASSERTION_ERROR, assertion_error_constructor),
    );
    Value::object(exports)
}

fn recorder_namespace() -> Value {
    Value::object(Object::new().with(
        "PowerAssertRecorder",
        Value::constructor("PowerAssertRecorder", recorder_constructor),
    ))
}

impl Interpreter {
    /// Namespace object of the module named by `specifier`.
    pub(crate) fn import_module(&mut self, specifier: &str) -> EvalResult {
        if let Some(namespace) = self.modules.get(specifier) {
            return Ok(namespace.clone());
        }
        let builtin = match specifier {
            POWER_ASSERT_MODULE => Some(power_assert_namespace()),
            RECORDER_MODULE => Some(recorder_namespace()),
            _ => None,
        };
        if let Some(namespace) = builtin {
            self.modules.insert(specifier.to_string(), namespace.clone());
            return Ok(namespace);
        }

        let path = self.resolve_module(specifier)?;
        let key = path.to_string_lossy().into_owned();
        if let Some(namespace) = self.modules.get(&key) {
            return Ok(namespace.clone());
        }
        let source = std::fs::read_to_string(&path).map_err(|err| EvalError::ModuleIo {
            path: path.clone(),
            message: err.to_string(),
        })?;
        let program = pa_parse::parse_program(&source).map_err(|source| EvalError::ModuleParse {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading module");

        // Cached before evaluation so that import cycles terminate.
        let namespace = Value::object(Object::new());
        self.modules.insert(key, namespace.clone());
        self.eval_module(&program, &path, &namespace)?;
        Ok(namespace)
    }

    fn resolve_module(&self, specifier: &str) -> Result<PathBuf, EvalError> {
        let path = Path::new(specifier);
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else if specifier.starts_with("./") || specifier.starts_with("../") {
            self.file
                .parent()
                .map_or_else(|| path.to_path_buf(), |dir| dir.join(path))
        } else {
            return Err(EvalError::ModuleNotFound {
                specifier: specifier.to_string(),
            });
        };
        let resolved = normalize(&resolved);
        if resolved.is_file() {
            Ok(resolved)
        } else {
            Err(EvalError::ModuleNotFound {
                specifier: specifier.to_string(),
            })
        }
    }

    /// Bind the names of a static import in the current scope.
    pub(crate) fn exec_import(&mut self, decl: &ImportDecl) -> EvalResult<()> {
        let namespace = self.import_module(&decl.source)?;
        let Value::Object(exports) = &namespace else {
            return Err(EvalError::Invariant("module namespace is not an object".to_string()).into());
        };
        for specifier in &decl.specifiers {
            let (local, value) = match specifier {
                ImportSpecifier::Namespace(local) => (local, namespace.clone()),
                ImportSpecifier::Default(local) => (local, export(exports, &decl.source, "default")?),
                ImportSpecifier::Named { imported, local } => {
                    (local, export(exports, &decl.source, imported)?)
                }
            };
            self.env.define(local, value, Mutability::Immutable);
        }
        Ok(())
    }

    /// Run a module body and publish its exports on `namespace`.
    pub(crate) fn eval_module(
        &mut self,
        program: &Program,
        path: &Path,
        namespace: &Value,
    ) -> EvalResult<()> {
        let env = self.module_env();
        self.with_frame(env, Rc::from(path), |interp| {
            interp.exec_stmts(&program.body)?;
            let Value::Object(exports) = namespace else {
                return Ok(());
            };
            for name in exported_names(program) {
                if let Some(value) = interp.env.lookup(name) {
                    exports.borrow_mut().set(name, value);
                }
            }
            Ok(())
        })
    }
}

fn export(
    exports: &std::cell::RefCell<Object>,
    module: &str,
    name: &str,
) -> Result<Value, EvalError> {
    exports
        .borrow()
        .get(name)
        .cloned()
        .ok_or_else(|| EvalError::MissingExport {
            module: module.to_string(),
            name: name.to_string(),
        })
}

fn exported_names(program: &Program) -> Vec<&str> {
    let mut names = Vec::new();
    for stmt in &program.body {
        let StmtKind::Export(inner) = &stmt.kind else {
            continue;
        };
        match &inner.kind {
            StmtKind::Function(func) => names.extend(func.name.as_deref()),
            StmtKind::Var(decl) => {
                names.extend(decl.declarations.iter().map(|d| d.name.as_str()));
            }
            _ => {}
        }
    }
    names
}
