//! Evaluator for power-assert test files.
//!
//! A small tree-walking interpreter for the host grammar, enough to run
//! instrumented test files end to end: it provides the `power-assert`
//! module (the empowered predicates), the `power-assert/recorder` module
//! the instrumenter imports, and a `test(name, fn)` registry.
//!
//! ```text
//! let program = pa_parse::parse_program(&instrumented)?;
//! let mut interp = Interpreter::new().with_output(PrintHandler::buffer());
//! interp.run_main(&program, path)?;
//! for test in interp.tests().to_vec() {
//!     interp.run_test(&test)?;
//! }
//! ```

mod builtins;
mod empower;
mod environment;
pub mod errors;
mod interpreter;
mod methods;
mod modules;
mod operators;
mod predicates;
mod print_handler;
mod stringify;
mod value;

pub use empower::powered_message;
pub use environment::{Environment, LocalScope, Mutability, Scope};
pub use errors::{EvalError, EvalResult, Unwind};
pub use interpreter::{Interpreter, RegisteredTest};
pub use methods::{dispatch_builtin_method, get_property, set_property};
pub use modules::{POWER_ASSERT_MODULE, RECORDER_MODULE};
pub use operators::{evaluate_binary, evaluate_unary, loose_equals, same_value, strict_equals};
pub use predicates::{deep_equals, is_assertion_error, ASSERTION_ERROR, PREDICATES};
pub use print_handler::PrintHandler;
pub use stringify::{dump, to_display_string};
pub use value::{Object, Value};
