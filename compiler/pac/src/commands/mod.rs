//! Command handlers for the `pa` CLI.
//!
//! Each submodule implements one command. Handlers return their results
//! instead of exiting, so `main.rs` owns printing of errors and exit codes.

mod instrument;
mod run;

pub use instrument::{instrument_file, write_instrumented};
pub use run::run_file;
pub use test::{format_file_results, format_test_summary, run_tests};
