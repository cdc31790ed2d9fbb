//! Power-assert diagrams.
//!
//! Turns an [`AssertionContext`] into the text block appended to a failed
//! assertion's message:
//!
//! ```text
//! assert(x[y] === 2)
//!        |||  |
//!        |||  false
//!        ||"a"
//!        |1
//!        Object{a:1}
//! ```
//!
//! [`PathMatcher`] maps each capture to a column of the statement line, and
//! [`DiagramRenderer`] stacks the values into rows.

pub mod matcher;
pub mod renderer;
pub mod width;

pub use matcher::{CapturedDisplayEvent, MatchError, PathMatcher};
pub use renderer::DiagramRenderer;
pub use width::{char_width, text_width};

use pa_runtime::{AssertionContext, CapturedValue};

/// Match and render in one step.
pub fn render_diagram<V: CapturedValue>(ctx: &AssertionContext<V>) -> Result<String, MatchError> {
    let events = PathMatcher::new(ctx).resolve()?;
    Ok(DiagramRenderer::new(&ctx.source.content).render(events))
}
