use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use super::*;
use crate::test::TestOutcome;

const PASSING: &str = r#"import { assert, assertEquals } from "power-assert";

test("adds", () => {
    assertEquals(1 + 1, 2);
});
test("truthy", () => {
    assert(true);
});
"#;

const FAILING: &str = r#"import { assert } from "power-assert";

const x = 1;
console.log("loaded");
test("compares", () => {
    assert(x === 2);
});
"#;

fn quiet() -> TestRunnerConfig {
    TestRunnerConfig {
        color: ColorMode::Never,
        ..TestRunnerConfig::default()
    }
}

fn write(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn config_defaults() {
    let config = TestRunnerConfig::default();
    assert!(config.parallel);
    assert!(!config.verbose);
    assert_eq!(config.color, ColorMode::Auto);
    assert!(config.matches("anything"));
}

#[test]
fn filter_is_a_substring_match() {
    let config = TestRunnerConfig {
        filter: Some("add".to_string()),
        ..quiet()
    };
    assert!(config.matches("adds numbers"));
    assert!(!config.matches("subtracts"));
}

#[test]
fn passing_file() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "pass.test.js", PASSING);

    let summary = run_test_file(&path, &quiet());
    assert!(summary.errors.is_empty(), "{:?}", summary.errors);
    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed, 0);
    let names: Vec<&str> = summary.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["adds", "truthy"]);
}

#[test]
fn failing_assertion_carries_the_diagram() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "fail.test.js", FAILING);

    let summary = run_test_file(&path, &quiet());
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.output, "loaded\n");
    let TestOutcome::Failed(message) = &summary.results[0].outcome else {
        panic!("expected a failure");
    };
    assert!(message.starts_with("AssertionError: Assertion failed."), "{message}");
    assert!(message.contains("fail.test.js"), "{message}");
    assert!(message.contains("assert(x === 2);"), "{message}");
    assert!(message.contains("false"), "{message}");
}

#[test]
fn filter_skips_other_tests() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "pass.test.js", PASSING);
    let config = TestRunnerConfig {
        filter: Some("truth".to_string()),
        ..quiet()
    };

    let summary = run_test_file(&path, &config);
    assert_eq!(summary.total(), 1);
    assert_eq!(summary.results[0].name, "truthy");
}

#[test]
fn syntax_error_is_a_file_error() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "broken.test.js", "let = ;\n");

    let summary = run_test_file(&path, &quiet());
    assert_eq!(summary.total(), 0);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("broken.test.js"), "{}", summary.errors[0]);
}

#[test]
fn uncaught_throw_in_body_is_a_file_error() {
    let dir = tempdir().unwrap();
    let path = write(
        dir.path(),
        "throws.test.js",
        "throw new Error(\"setup failed\");\n",
    );

    let summary = run_test_file(&path, &quiet());
    assert_eq!(summary.errors, vec!["Error: setup failed".to_string()]);
}

#[test]
fn missing_file_is_a_file_error() {
    let dir = tempdir().unwrap();
    let summary = run_test_file(&dir.path().join("gone.test.js"), &quiet());
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].starts_with("error: failed to read"));
}

#[test]
fn load_resolves_relative_imports() {
    let dir = tempdir().unwrap();
    write(dir.path(), "helper.js", "export const answer = 42;\n");
    let path = write(
        dir.path(),
        "uses_helper.test.js",
        r#"import { assertEquals } from "power-assert";
import { answer } from "./helper.js";
test("answer", () => {
    assertEquals(answer, 42);
});
"#,
    );

    let loaded = load_test_file(&path).unwrap();
    assert!(loaded.path.is_absolute());

    let summary = run_test_file(&path, &quiet());
    assert!(summary.errors.is_empty(), "{:?}", summary.errors);
    assert_eq!(summary.passed, 1);
}

#[test]
fn runner_parallel_and_sequential_agree() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.test.js", PASSING);
    write(dir.path(), "b.test.js", FAILING);
    write(dir.path(), "c_test.mjs", PASSING);
    write(dir.path(), "helper.js", "export const unused = 1;\n");

    let parallel = TestRunner::with_config(quiet()).run(dir.path());
    let sequential = TestRunner::with_config(TestRunnerConfig {
        parallel: false,
        ..quiet()
    })
    .run(dir.path());

    for summary in [&parallel, &sequential] {
        assert_eq!(summary.files.len(), 3);
        assert_eq!(summary.passed, 4);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.exit_code(), 1);
    }
    let order = |s: &TestSummary| -> Vec<PathBuf> { s.files.iter().map(|f| f.path.clone()).collect() };
    assert_eq!(order(&parallel), order(&sequential));
}
