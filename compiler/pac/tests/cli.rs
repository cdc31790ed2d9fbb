//! Drive the `pa` binary end to end.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn pa(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pa"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

const MATH: &str = r#"import { assert, assertEquals } from "power-assert";

const total = 3;
test("sum", () => {
    assertEquals(1 + 2, total);
});
test("wrong", () => {
    assert(total === 4);
});
"#;

#[test]
fn test_command_reports_failures_with_diagrams() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("math.test.js"), MATH).unwrap();

    let output = pa(&["test", "--color=never"], dir.path());
    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(1), "{out}");
    assert!(out.contains("  FAIL: wrong\n"), "{out}");
    assert!(out.contains("    AssertionError: Assertion failed."), "{out}");
    assert!(out.contains("    assert(total === 4);\n"), "{out}");
    assert!(out.contains("  1 passed, 1 failed (2 total)\n"), "{out}");
    assert!(out.ends_with("\nFAILED\n"), "{out}");
}

#[test]
fn test_command_filter_selects_passing_test() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("math.test.js"), MATH).unwrap();

    let output = pa(&["test", ".", "--filter=sum", "--color=never", "--no-parallel"], dir.path());
    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(0), "{out}");
    assert!(out.ends_with("\nOK\n"), "{out}");
}

#[test]
fn run_command_prints_console_output() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("hello.js"),
        "console.log(\"hello\", 1 + 1);\ntest(\"ok\", () => {});\n",
    )
    .unwrap();

    let output = pa(&["run", "hello.js", "--color=never"], dir.path());
    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(0), "{out}");
    assert!(out.starts_with("hello 2\n"), "{out}");
    assert!(out.contains("  PASS: ok"), "{out}");
}

#[test]
fn instrument_command_writes_output_file() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("a.test.js"),
        "import { assert } from \"power-assert\";\nassert(x);\n",
    )
    .unwrap();

    let output = pa(&["instrument", "a.test.js", "--out=a.out.js"], dir.path());
    assert_eq!(output.status.code(), Some(0));
    let written = fs::read_to_string(dir.path().join("a.out.js")).unwrap();
    assert!(written.contains("new _PowerAssertRecorder()"), "{written}");
    assert!(written.contains("\"arguments/0\""), "{written}");
}

#[test]
fn instrument_error_is_reported_on_stderr() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.test.js"), "let = ;\n").unwrap();

    let output = pa(&["instrument", "bad.test.js"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("bad.test.js"), "{err}");
}

#[test]
fn unknown_command_fails() {
    let dir = tempdir().unwrap();
    let output = pa(&["frobnicate"], dir.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_test_path_fails() {
    let dir = tempdir().unwrap();
    let output = pa(&["test", "nowhere"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("path not found"), "{err}");
}
