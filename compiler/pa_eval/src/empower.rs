//! The empowering wrapper around assertion predicates.
//!
//! Instrumented call sites hand every predicate argument over as a
//! [`Value::Recorded`]. The wrapper assembles them into one
//! [`AssertionContext`], calls the predicate with the final values, and on
//! an `AssertionError` appends the rendered diagram to the error's message.
//! The error object itself is rethrown, so its identity and type survive.

use std::rc::Rc;

use pa_diagram::render_diagram;
use pa_runtime::{assemble, AssertionContext, RecordedArgument};

use crate::errors::{EvalError, EvalResult, Unwind};
use crate::interpreter::Interpreter;
use crate::predicates::is_assertion_error;
use crate::value::{Predicate, Settled, Value};

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[39m";

pub(crate) fn call_empowered(
    interp: &mut Interpreter,
    name: &str,
    predicate: Predicate,
    args: &[Value],
) -> EvalResult {
    let recorded: Vec<&Rc<RecordedArgument<Value>>> = args
        .iter()
        .filter_map(|arg| match arg {
            Value::Recorded(recorded) => Some(recorded),
            _ => None,
        })
        .collect();
    if recorded.is_empty() {
        return predicate(interp, args);
    }
    if recorded.len() != args.len() {
        return Err(EvalError::Invariant(format!(
            "`{name}` received {} recorded and {} plain arguments",
            recorded.len(),
            args.len() - recorded.len()
        ))
        .into());
    }

    let ctx = assemble(recorded.into_iter().map(|arg| (**arg).clone())).map_err(EvalError::from)?;
    let values: Vec<Value> = ctx.values().cloned().collect();
    match predicate(interp, &values) {
        Ok(Value::Promise(settled)) => {
            if let Settled::Rejected(reason) = &*settled {
                if is_assertion_error(reason) {
                    append_diagram(interp, &ctx, reason)?;
                }
            }
            Ok(Value::Promise(settled))
        }
        Err(Unwind::Throw(thrown)) => {
            if is_assertion_error(&thrown) {
                append_diagram(interp, &ctx, &thrown)?;
            }
            Err(Unwind::Throw(thrown))
        }
        other => other,
    }
}

/// The text appended to a failed assertion's message.
pub fn powered_message(ctx: &AssertionContext<Value>, color: bool) -> Result<String, EvalError> {
    let diagram = render_diagram(ctx)?;
    let message = format!("\n{}\n\n{diagram}\n", ctx.source.filepath);
    Ok(if color {
        format!("{RED}{message}{RESET}")
    } else {
        message
    })
}

fn append_diagram(
    interp: &Interpreter,
    ctx: &AssertionContext<Value>,
    error: &Value,
) -> EvalResult<()> {
    let Value::Error(error) = error else {
        return Ok(());
    };
    let powered = powered_message(ctx, interp.color)?;
    tracing::debug!(
        file = %ctx.source.filepath,
        line = ctx.source.line,
        "assertion failed"
    );
    error.message.borrow_mut().push_str(&powered);
    Ok(())
}
