//! Test runner: instruments each file, evaluates it and runs the tests it
//! registers.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use pa_eval::{Interpreter, PrintHandler};
use pa_instrument::{instrument_source, InstrumentConfig};
use pa_ir::Program;
use rayon::prelude::*;

use super::discovery::{discover_tests_in, TestFile};
use super::result::{FileSummary, TestResult, TestSummary};
use crate::color::ColorMode;
use crate::error::CommandError;

/// Configuration for the test runner.
#[derive(Clone, Debug)]
pub struct TestRunnerConfig {
    /// Only run tests whose name contains this substring.
    pub filter: Option<String>,
    pub verbose: bool,
    /// Run files in parallel.
    pub parallel: bool,
    pub color: ColorMode,
}

impl Default for TestRunnerConfig {
    fn default() -> Self {
        TestRunnerConfig {
            filter: None,
            verbose: false,
            parallel: true,
            color: ColorMode::Auto,
        }
    }
}

impl TestRunnerConfig {
    pub fn matches(&self, name: &str) -> bool {
        match &self.filter {
            Some(filter) => name.contains(filter.as_str()),
            None => true,
        }
    }
}

/// A test file after instrumentation and parsing.
pub struct LoadedFile {
    /// Absolute path, used for relative imports and snippet paths.
    pub path: PathBuf,
    pub program: Program,
}

/// Read, instrument and parse the file at `path`.
#[tracing::instrument(level = "debug", skip_all, fields(file = %path.display()))]
pub fn load_test_file(path: &Path) -> Result<LoadedFile, CommandError> {
    let text = fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let filepath = absolute.display().to_string();

    let instrumented = match instrument_source(&text, &filepath, &InstrumentConfig::default()) {
        Ok(instrumented) => instrumented,
        Err(error) => {
            return Err(CommandError::Instrument {
                path: path.to_path_buf(),
                text,
                error,
            })
        }
    };

    let program = match pa_parse::parse_program(&instrumented) {
        Ok(program) => program,
        Err(error) => {
            return Err(CommandError::Parse {
                path: path.to_path_buf(),
                text: instrumented,
                error,
            })
        }
    };

    Ok(LoadedFile {
        path: absolute,
        program,
    })
}

/// Run all tests in a single file. Errors are recorded in the summary.
#[tracing::instrument(level = "debug", skip_all, fields(file = %path.display()))]
pub fn run_test_file(path: &Path, config: &TestRunnerConfig) -> FileSummary {
    let mut summary = FileSummary::new(path.to_path_buf());
    let color = config.color.enabled();

    let loaded = match load_test_file(path) {
        Ok(loaded) => loaded,
        Err(err) => {
            summary.add_error(err.render(color));
            return summary;
        }
    };

    let mut interpreter = Interpreter::new()
        .with_color(color)
        .with_output(PrintHandler::buffer());
    if let Err(err) = interpreter.run_main(&loaded.program, &loaded.path) {
        summary.add_error(err.to_string());
        summary.output = interpreter.output();
        return summary;
    }

    let tests = interpreter.tests().to_vec();
    for test in tests.iter().filter(|test| config.matches(&test.name)) {
        let start = Instant::now();
        let result = match interpreter.run_test(test) {
            Ok(()) => TestResult::passed(test.name.clone(), start.elapsed()),
            Err(err) => TestResult::failed(test.name.clone(), err.to_string(), start.elapsed()),
        };
        tracing::debug!(test = %test.name, passed = result.outcome.is_passed(), "test finished");
        summary.add_result(result);
    }

    summary.output = interpreter.output();
    summary
}

/// Test runner.
///
/// Every file gets its own interpreter, so files share nothing and can run
/// on separate threads.
pub struct TestRunner {
    config: TestRunnerConfig,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    pub fn new() -> Self {
        TestRunner {
            config: TestRunnerConfig::default(),
        }
    }

    pub fn with_config(config: TestRunnerConfig) -> Self {
        TestRunner { config }
    }

    /// Run all tests in a path (file or directory).
    pub fn run(&self, path: &Path) -> TestSummary {
        let files = discover_tests_in(path);
        tracing::debug!(files = files.len(), "discovered test files");

        if self.config.parallel && files.len() > 1 {
            self.run_parallel(&files)
        } else {
            self.run_sequential(&files)
        }
    }

    fn run_sequential(&self, files: &[TestFile]) -> TestSummary {
        let start = Instant::now();
        let mut summary = TestSummary::new();
        for file in files {
            summary.add_file(run_test_file(&file.path, &self.config));
        }
        summary.duration = start.elapsed();
        summary
    }

    /// Run files on a scoped rayon pool, which is torn down before
    /// returning. Results keep discovery order.
    fn run_parallel(&self, files: &[TestFile]) -> TestSummary {
        let start = Instant::now();
        let config = &self.config;

        let file_summaries = rayon::ThreadPoolBuilder::new()
            .stack_size(16 * 1024 * 1024)
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| {
                    files
                        .par_iter()
                        .map(|file| run_test_file(&file.path, config))
                        .collect::<Vec<_>>()
                })
            })
            .unwrap_or_else(|e| {
                tracing::warn!("failed to create thread pool ({e}), running sequentially");
                files
                    .iter()
                    .map(|file| run_test_file(&file.path, config))
                    .collect()
            });

        let mut summary = TestSummary::new();
        for file_summary in file_summaries {
            summary.add_file(file_summary);
        }
        summary.duration = start.elapsed();
        summary
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
