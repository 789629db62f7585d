//! Tests for the diff command

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::commands::diff::{compare, render, tree_digests};
use crate::commands::types::DigestArgs;

fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, contents) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, contents).unwrap();
    }
}

#[tokio::test]
async fn test_tree_digests() {
    let dir = TempDir::new().unwrap();
    write_tree(dir.path(), &[("x/abc.txt", "abc")]);

    let args = DigestArgs {
        algorithms: vec!["md5".to_string()],
        workers: None,
    };
    let (files, failed) = tree_digests(dir.path(), &args).await.unwrap();

    assert_eq!(failed, 0);
    assert_eq!(files.len(), 1);
    assert_eq!(files["x/abc.txt"], "900150983cd24fb0d6963f7d28e17f72");
}

#[tokio::test]
async fn test_compare_trees() {
    let old = TempDir::new().unwrap();
    let new = TempDir::new().unwrap();
    write_tree(old.path(), &[("a", "1"), ("b", "2"), ("c", "3"), ("gone", "9")]);
    write_tree(new.path(), &[("a", "1"), ("moved/b", "2"), ("c", "4"), ("d", "5")]);

    let (report, failed) = compare(old.path(), new.path(), &DigestArgs::default())
        .await
        .unwrap();
    assert_eq!(failed, 0);
    assert!(report.has_changes());
    assert_eq!(report.unchanged, 1);

    let mut out = Vec::new();
    render(&report, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "R b -> moved/b\nA d\nD gone\nM c\n"
    );
}

#[tokio::test]
async fn test_compare_identical_trees() {
    let old = TempDir::new().unwrap();
    let new = TempDir::new().unwrap();
    write_tree(old.path(), &[("a", "1"), ("sub/b", "2")]);
    write_tree(new.path(), &[("a", "1"), ("sub/b", "2")]);

    let (report, _) = compare(old.path(), new.path(), &DigestArgs::default())
        .await
        .unwrap();
    assert!(!report.has_changes());
    assert_eq!(report.unchanged, 2);
}
