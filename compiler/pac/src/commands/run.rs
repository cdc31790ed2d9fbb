//! The `run` command: evaluate one file and run the tests it registers.

use std::path::Path;
use std::time::Instant;

use pa_eval::Interpreter;

use crate::color::ColorMode;
use crate::error::CommandError;
use crate::test::{load_test_file, FileSummary, TestResult};

/// Evaluate the file at `path` with `console.log` going straight to stdout,
/// then run every registered test.
///
/// Unlike the test runner, a file that fails to load or whose body throws
/// is an error rather than a recorded result.
pub fn run_file(path: &Path, color: ColorMode) -> Result<FileSummary, CommandError> {
    let loaded = load_test_file(path)?;
    let mut interpreter = Interpreter::new().with_color(color.enabled());
    interpreter
        .run_main(&loaded.program, &loaded.path)
        .map_err(|error| CommandError::Eval {
            path: path.to_path_buf(),
            error,
        })?;

    let mut summary = FileSummary::new(path.to_path_buf());
    let tests = interpreter.tests().to_vec();
    for test in &tests {
        let start = Instant::now();
        let result = match interpreter.run_test(test) {
            Ok(()) => TestResult::passed(test.name.clone(), start.elapsed()),
            Err(err) => TestResult::failed(test.name.clone(), err.to_string(), start.elapsed()),
        };
        summary.add_result(result);
    }
    Ok(summary)
}
