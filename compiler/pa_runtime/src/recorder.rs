use std::mem;

use crate::CapturedValue;

/// One evaluated sub-expression: its value and the structural path of the
/// node that produced it, relative to the assertion call.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureEvent<V> {
    pub value: V,
    pub path: String,
}

/// Static description of an instrumented statement, shared by all of its
/// arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceSnippet {
    /// Single-line printed statement.
    pub content: String,
    pub filepath: String,
    /// 1-based line of the statement in the original file.
    pub line: u32,
    /// Printed inside an `async` function (or at module top level).
    pub is_async: bool,
    /// Printed inside a generator function.
    pub is_generator: bool,
}

/// What [`Recorder::expr`] hands to the assertion function in place of a
/// plain argument value.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedArgument<V> {
    pub value: V,
    pub captures: Vec<CaptureEvent<V>>,
    pub snippet: SourceSnippet,
}

/// Capture log for exactly one top-level assertion argument.
#[derive(Clone, Debug)]
pub struct Recorder<V> {
    captured: Vec<CaptureEvent<V>>,
}

impl<V> Default for Recorder<V> {
    fn default() -> Self {
        Recorder {
            captured: Vec::new(),
        }
    }
}

impl<V: CapturedValue> Recorder<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `value` under `path` and hand it back unchanged.
    pub fn capture(&mut self, value: V, path: impl Into<String>) -> V {
        let path = path.into();
        tracing::trace!(%path, "capture");
        self.captured.push(CaptureEvent {
            value: value.clone(),
            path,
        });
        value
    }

    /// Take the capture log, leaving the recorder empty for the next
    /// evaluation of the same statement.
    pub fn expr(&mut self, value: V, snippet: SourceSnippet) -> RecordedArgument<V> {
        let captures = mem::take(&mut self.captured);
        tracing::trace!(count = captures.len(), "expr");
        RecordedArgument {
            value,
            captures,
            snippet,
        }
    }

    pub fn len(&self) -> usize {
        self.captured.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pa_ir::Literal;
    use pretty_assertions::assert_eq;

    use super::{CaptureEvent, Recorder, SourceSnippet};
    use crate::CapturedValue;

    #[derive(Clone, Debug, PartialEq)]
    struct Num(f64);

    impl CapturedValue for Num {
        fn from_literal(literal: &Literal) -> Self {
            match literal {
                Literal::Number(n) => Num(*n),
                _ => Num(f64::NAN),
            }
        }

        fn dump(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn capture_returns_its_argument() {
        let mut rec = Recorder::new();
        assert_eq!(rec.capture(Num(3.0), "arguments/0/left"), Num(3.0));
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn expr_drains_in_evaluation_order() {
        let mut rec = Recorder::new();
        rec.capture(Num(1.0), "arguments/0/left");
        rec.capture(Num(2.0), "arguments/0/right");
        rec.capture(Num(3.0), "arguments/0");
        let snippet = SourceSnippet {
            content: "assert(a + b);".into(),
            filepath: "t.js".into(),
            line: 4,
            ..SourceSnippet::default()
        };
        let recorded = rec.expr(Num(3.0), snippet.clone());

        assert!(rec.is_empty());
        assert_eq!(recorded.value, Num(3.0));
        assert_eq!(recorded.snippet, snippet);
        let paths: Vec<&str> = recorded.captures.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["arguments/0/left", "arguments/0/right", "arguments/0"]);
    }

    #[test]
    fn second_evaluation_starts_empty() {
        let mut rec = Recorder::new();
        rec.capture(Num(1.0), "arguments/0");
        let _ = rec.expr(Num(1.0), SourceSnippet::default());
        rec.capture(Num(2.0), "arguments/0");
        let second = rec.expr(Num(2.0), SourceSnippet::default());
        assert_eq!(
            second.captures,
            vec![CaptureEvent {
                value: Num(2.0),
                path: "arguments/0".into()
            }]
        );
    }
}
