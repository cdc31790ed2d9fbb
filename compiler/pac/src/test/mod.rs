//! Test runner infrastructure.
//!
//! - Discovery: finding `*.test.js` style files under a path
//! - Loading: instrument and parse one file
//! - Execution: evaluate the file, then run each registered test
//! - Results: pass/fail counts per file and overall
//! - Parallel execution: one file per rayon task

mod discovery;
mod runner;

pub use discovery::{discover_tests, discover_tests_in, is_test_file, TestFile};
pub use result::{FileSummary, TestOutcome, TestResult, TestSummary};
pub use runner::{load_test_file, run_test_file, LoadedFile, TestRunner, TestRunnerConfig};
