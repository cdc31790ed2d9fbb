//! Assertion instrumentation.
//!
//! Rewrites a test file so every recognized assertion call receives, in
//! place of each plain argument, a record of the argument's value, the
//! values of its sub-expressions and the printed statement:
//!
//! ```text
//! assert(x === 2);
//! ```
//!
//! becomes
//!
//! ```text
//! import { PowerAssertRecorder as _PowerAssertRecorder } from "power-assert/recorder";
//! const _rec1 = new _PowerAssertRecorder();
//! assert(_rec1.expr(_rec1.capture(_rec1.capture(x, "arguments/0/left") === 2, "arguments/0"), { content: "assert(x === 2);", filepath: "/t/a.test.js", line: 1, async: true }));
//! ```

mod config;
mod error;
pub mod imports;
mod instrumenter;
mod rules;
mod synth;

pub use config::{InstrumentConfig, DEFAULT_ASSERTION_NAMES};
pub use error::InstrumentError;
pub use instrumenter::Instrumenter;
pub use synth::RECORDER_MODULE;

use pa_ir::Program;

/// Instrument an already parsed file. Returns the number of recorders.
pub fn instrument_program(
    program: &mut Program,
    source: &str,
    filepath: &str,
    config: &InstrumentConfig,
) -> Result<u32, InstrumentError> {
    // Snippets show the specifiers as written, so they are printed first.
    let recorders = Instrumenter::new(source, filepath, config).run(program)?;
    if config.rewrite_imports {
        imports::rewrite_imports(program, source, filepath)?;
    }
    Ok(recorders)
}

/// Parse, instrument and print `source`.
#[tracing::instrument(level = "debug", skip(source, config))]
pub fn instrument_source(
    source: &str,
    filepath: &str,
    config: &InstrumentConfig,
) -> Result<String, InstrumentError> {
    let mut program = pa_parse::parse_program(source)?;
    instrument_program(&mut program, source, filepath, config)?;
    Ok(pa_fmt::print_program(&program))
}
