//! Test file discovery.
//!
//! A test file is named `*.test.js`, `*_test.js`, `*.test.mjs` or
//! `*_test.mjs`.

use std::fs;
use std::path::{Path, PathBuf};

const TEST_SUFFIXES: &[&str] = &[".test.js", "_test.js", ".test.mjs", "_test.mjs"];

/// A discovered test file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestFile {
    pub path: PathBuf,
}

impl TestFile {
    pub fn new(path: PathBuf) -> Self {
        TestFile { path }
    }
}

pub fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| TEST_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
}

/// Discover all test files in a directory tree, sorted by path.
pub fn discover_tests(root: &Path) -> Vec<TestFile> {
    let mut files = Vec::new();
    discover_recursive(root, &mut files);
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

fn discover_recursive(dir: &Path, files: &mut Vec<TestFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            if matches!(name, "node_modules" | "target") {
                continue;
            }
            discover_recursive(&path, files);
        } else if is_test_file(&path) {
            files.push(TestFile::new(path));
        }
    }
}

/// Discover tests in a specific file or directory.
///
/// A file path is taken as given, whatever its name, so a single file can
/// always be run explicitly.
pub fn discover_tests_in(path: &Path) -> Vec<TestFile> {
    if path.is_file() {
        vec![TestFile::new(path.to_path_buf())]
    } else if path.is_dir() {
        discover_tests(path)
    } else {
        vec![]
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
