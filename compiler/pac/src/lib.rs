//! The `pa` driver.
//!
//! Ties the pipeline together for the command line: read a test file,
//! instrument its assertions, parse the rewritten source, evaluate it and
//! run the tests it registers. The binary in `main.rs` only parses
//! arguments and maps results to exit codes; everything it calls lives here
//! so that integration tests can drive it without a process.

pub mod color;
pub mod commands;
mod error;
mod report;
pub mod test;

pub use color::ColorMode;
pub use error::CommandError;
pub use test::{TestOutcome, TestRunner, TestRunnerConfig};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=pa_instrument=debug` or `RUST_LOG=pa_eval=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(EnvFilter::from_default_env())
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
