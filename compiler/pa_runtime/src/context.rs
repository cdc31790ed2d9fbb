//! Assertion-context assembly.

use crate::recorder::{CaptureEvent, RecordedArgument, SourceSnippet};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssembleError {
    #[error("cannot assemble an assertion context from zero arguments")]
    NoArguments,
}

/// Final value and capture log of one argument.
#[derive(Clone, Debug, PartialEq)]
pub struct ArgumentRecord<V> {
    pub value: V,
    pub events: Vec<CaptureEvent<V>>,
}

/// Everything the diagram needs about one failing assertion.
#[derive(Clone, Debug, PartialEq)]
pub struct AssertionContext<V> {
    pub source: SourceSnippet,
    pub args: Vec<ArgumentRecord<V>>,
}

impl<V> AssertionContext<V> {
    /// Final argument values, in call order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.args.iter().map(|arg| &arg.value)
    }
}

/// Merge recorded arguments, in call order, into one context. The first
/// argument's snippet is the shared one.
pub fn assemble<V>(
    recorded: impl IntoIterator<Item = RecordedArgument<V>>,
) -> Result<AssertionContext<V>, AssembleError> {
    let mut source = None;
    let mut args = Vec::new();
    for argument in recorded {
        if source.is_none() {
            source = Some(argument.snippet);
        }
        args.push(ArgumentRecord {
            value: argument.value,
            events: argument.captures,
        });
    }
    let source = source.ok_or(AssembleError::NoArguments)?;
    tracing::debug!(
        file = %source.filepath,
        line = source.line,
        args = args.len(),
        "assembled assertion context"
    );
    Ok(AssertionContext { source, args })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
