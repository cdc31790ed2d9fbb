use super::*;
use std::fs::File;
use tempfile::tempdir;

fn names(files: &[TestFile], root: &Path) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            f.path
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn test_discover_empty_dir() {
    let dir = tempdir().unwrap();
    assert!(discover_tests(dir.path()).is_empty());
}

#[test]
fn test_discover_matches_all_suffixes() {
    let dir = tempdir().unwrap();
    for name in [
        "a.test.js",
        "b_test.js",
        "c.test.mjs",
        "d_test.mjs",
        "helper.js",
        "test.js",
        "notes.txt",
    ] {
        File::create(dir.path().join(name)).unwrap();
    }

    let files = discover_tests(dir.path());
    assert_eq!(
        names(&files, dir.path()),
        vec!["a.test.js", "b_test.js", "c.test.mjs", "d_test.mjs"]
    );
}

#[test]
fn test_discover_recursive_and_sorted() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    File::create(sub.join("nested.test.js")).unwrap();
    File::create(dir.path().join("z.test.js")).unwrap();
    File::create(dir.path().join("a.test.js")).unwrap();

    let files = discover_tests(dir.path());
    assert_eq!(
        names(&files, dir.path()),
        vec!["a.test.js", "sub/nested.test.js", "z.test.js"]
    );
}

#[test]
fn test_discover_skips_hidden_and_vendor_dirs() {
    let dir = tempdir().unwrap();
    for skipped in [".git", "node_modules", "target"] {
        let sub = dir.path().join(skipped);
        fs::create_dir(&sub).unwrap();
        File::create(sub.join("x.test.js")).unwrap();
    }
    File::create(dir.path().join(".hidden.test.js")).unwrap();
    File::create(dir.path().join("kept.test.js")).unwrap();

    let files = discover_tests(dir.path());
    assert_eq!(names(&files, dir.path()), vec!["kept.test.js"]);
}

#[test]
fn test_discover_in_single_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scratch.js");
    File::create(&path).unwrap();

    let files = discover_tests_in(&path);
    assert_eq!(files, vec![TestFile::new(path)]);
}

#[test]
fn test_discover_in_missing_path() {
    let dir = tempdir().unwrap();
    assert!(discover_tests_in(&dir.path().join("missing")).is_empty());
}
