//! Evaluation errors.
//!
//! Two kinds of failure leave an expression early. A script-level exception
//! is a [`Value`] and unwinds as [`Unwind::Throw`], where `try`/`catch` and
//! the throw-expecting predicates can see it. An [`EvalError`] unwinds as
//! [`Unwind::Fatal`] and is never caught by script code.

use std::path::PathBuf;

use pa_diagram::MatchError;
use pa_parse::ParseError;
use pa_runtime::AssembleError;

use crate::value::Value;

/// Fatal interpreter error.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// An exception escaped to the top of a module or test.
    #[error("{0}")]
    Uncaught(String),
    #[error("{construct} is not supported")]
    Unsupported { construct: &'static str },
    #[error("cannot find module `{specifier}`")]
    ModuleNotFound { specifier: String },
    #[error("cannot read `{}`: {message}", path.display())]
    ModuleIo { path: PathBuf, message: String },
    #[error("cannot parse `{}`: {source}", path.display())]
    ModuleParse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("module `{module}` has no export named `{name}`")]
    MissingExport { module: String, name: String },
    /// Instrumented code and the runtime disagree.
    #[error("power-assert invariant violated: {0}")]
    Invariant(String),
}

impl From<MatchError> for EvalError {
    fn from(err: MatchError) -> Self {
        EvalError::Invariant(err.to_string())
    }
}

impl From<AssembleError> for EvalError {
    fn from(err: AssembleError) -> Self {
        EvalError::Invariant(err.to_string())
    }
}

/// Why evaluation stopped early.
#[derive(Clone, Debug)]
pub enum Unwind {
    Throw(Value),
    Fatal(EvalError),
}

impl From<EvalError> for Unwind {
    fn from(err: EvalError) -> Self {
        Unwind::Fatal(err)
    }
}

pub type EvalResult<T = Value> = Result<T, Unwind>;

// Thrown error constructors

pub fn type_error(message: impl Into<String>) -> Unwind {
    Unwind::Throw(Value::error("TypeError", message))
}

pub fn reference_error(name: &str) -> Unwind {
    Unwind::Throw(Value::error(
        "ReferenceError",
        format!("{name} is not defined"),
    ))
}

pub fn syntax_error(message: impl Into<String>) -> Unwind {
    Unwind::Throw(Value::error("SyntaxError", message))
}

pub fn not_a_function(what: &Value) -> Unwind {
    type_error(format!("{} is not a function", crate::stringify::dump(what)))
}

pub fn assignment_to_constant(name: &str) -> Unwind {
    type_error(format!("Assignment to constant variable `{name}`."))
}
