//! Run-time side of power-assert.
//!
//! Instrumented code owns one [`Recorder`] per assertion argument. Each
//! evaluated sub-expression is logged with [`Recorder::capture`], and the
//! finished argument is packaged by [`Recorder::expr`] into a
//! [`RecordedArgument`]. Before the real predicate runs, [`assemble`] merges
//! the recorded arguments of one assertion into an [`AssertionContext`].
//!
//! The crate is generic over the captured value type through
//! [`CapturedValue`], so it does not depend on any particular evaluator.

mod context;
mod recorder;

pub use context::{assemble, ArgumentRecord, AssembleError, AssertionContext};
pub use recorder::{CaptureEvent, RecordedArgument, Recorder, SourceSnippet};

use pa_ir::Literal;

/// A value that can appear in a diagram.
pub trait CapturedValue: Clone + std::fmt::Debug {
    /// The value of a literal node, used in place of any captured value for
    /// constants.
    fn from_literal(literal: &Literal) -> Self;

    /// One-level stringified form shown in the diagram.
    fn dump(&self) -> String;
}
