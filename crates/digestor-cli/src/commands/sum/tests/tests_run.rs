//! Tests for the sum command

#![allow(clippy::unwrap_used)]

use std::fs;

use tempfile::TempDir;

use crate::commands::sum::sum_into;
use crate::commands::types::DigestArgs;
use crate::commands::Outcome;
use crate::output::JobRecord;

fn tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("hello.txt"), "hello").unwrap();
    fs::write(dir.path().join("sub/abc.txt"), "abc").unwrap();
    dir
}

fn args(algorithms: &[&str]) -> DigestArgs {
    DigestArgs {
        algorithms: algorithms.iter().map(|a| (*a).to_string()).collect(),
        workers: Some(2),
    }
}

fn sorted_lines(out: Vec<u8>) -> Vec<String> {
    let mut lines: Vec<String> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    lines
}

#[tokio::test]
async fn test_sum_prints_hex_and_path() {
    let dir = tree();
    let (outcome, out) = sum_into(dir.path(), &args(&["md5"]), false, Vec::new())
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Clean);
    assert_eq!(
        sorted_lines(out),
        [
            "5d41402abc4b2a76b9719d911017c592  hello.txt",
            "900150983cd24fb0d6963f7d28e17f72  sub/abc.txt",
        ]
    );
}

#[tokio::test]
async fn test_sum_multiple_algorithms() {
    let dir = tree();
    let (_, out) = sum_into(dir.path(), &args(&["md5", "sha1"]), false, Vec::new())
        .await
        .unwrap();

    let lines = sorted_lines(out);
    assert_eq!(lines.len(), 4);
    assert!(lines.contains(&"MD5 (hello.txt) = 5d41402abc4b2a76b9719d911017c592".to_string()));
    assert!(lines.contains(
        &"SHA1 (sub/abc.txt) = a9993e364706816aba3e25717850c26c9cd0d89d".to_string()
    ));
}

#[tokio::test]
async fn test_sum_json_lines() {
    let dir = tree();
    let (_, out) = sum_into(dir.path(), &args(&["sha256"]), true, Vec::new())
        .await
        .unwrap();

    let mut records: Vec<JobRecord> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    records.sort_by(|a, b| a.path.cmp(&b.path));

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].path, "hello.txt");
    assert_eq!(records[0].size, Some(5));
    assert!(records[0].modified.is_some());
    assert_eq!(
        records[0].digests["sha256"],
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
    assert!(records[1].error.is_none());
}

#[tokio::test]
async fn test_sum_single_file() {
    let dir = tree();
    let (_, out) = sum_into(&dir.path().join("hello.txt"), &args(&["md5"]), false, Vec::new())
        .await
        .unwrap();

    assert_eq!(sorted_lines(out), ["5d41402abc4b2a76b9719d911017c592  hello.txt"]);
}

#[tokio::test]
async fn test_sum_missing_directory() {
    let dir = TempDir::new().unwrap();
    let result = sum_into(&dir.path().join("nope"), &args(&["md5"]), false, Vec::new()).await;

    let err = result.err().unwrap();
    assert!(format!("{err:#}").contains("failed to digest"));
}

#[tokio::test]
async fn test_sum_unknown_algorithm() {
    let dir = tree();
    let result = sum_into(dir.path(), &args(&["whirlpool"]), false, Vec::new()).await;
    assert!(result.is_err());
}
