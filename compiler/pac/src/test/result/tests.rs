use std::path::PathBuf;
use std::time::Duration;

use super::*;

fn file(name: &str, outcomes: &[bool]) -> FileSummary {
    let mut summary = FileSummary::new(PathBuf::from(name));
    for (i, passed) in outcomes.iter().enumerate() {
        let result = if *passed {
            TestResult::passed(format!("t{i}"), Duration::from_millis(1))
        } else {
            TestResult::failed(format!("t{i}"), "boom".to_string(), Duration::from_millis(1))
        };
        summary.add_result(result);
    }
    summary
}

#[test]
fn outcome_predicates() {
    assert!(TestOutcome::Passed.is_passed());
    assert!(TestOutcome::Failed(String::new()).is_failed());
    assert!(!TestOutcome::Passed.is_failed());
}

#[test]
fn file_summary_counts_results() {
    let summary = file("a.test.js", &[true, false, true]);
    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.duration, Duration::from_millis(3));
    assert!(summary.has_failures());
}

#[test]
fn file_error_is_a_failure() {
    let mut summary = file("a.test.js", &[]);
    assert!(!summary.has_failures());
    summary.add_error("cannot parse".to_string());
    assert!(summary.has_failures());
}

#[test]
fn summary_aggregates_files() {
    let mut summary = TestSummary::new();
    summary.add_file(file("a.test.js", &[true, true]));
    summary.add_file(file("b.test.js", &[true]));
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.exit_code(), 0);

    let mut broken = file("c.test.js", &[]);
    broken.add_error("cannot read".to_string());
    summary.add_file(broken);
    assert_eq!(summary.error_files, 1);
    assert_eq!(summary.exit_code(), 1);
}

#[test]
fn failed_test_sets_exit_code() {
    let mut summary = TestSummary::new();
    summary.add_file(file("a.test.js", &[true, false]));
    assert_eq!(summary.exit_code(), 1);
}

#[test]
fn empty_run_exits_zero() {
    assert_eq!(TestSummary::new().exit_code(), 0);
}
