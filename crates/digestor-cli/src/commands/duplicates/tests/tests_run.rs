//! Tests for the duplicates command

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::fs;

use tempfile::TempDir;

use crate::commands::duplicates::{find, render};
use crate::commands::types::DigestArgs;

fn md5_args() -> DigestArgs {
    DigestArgs {
        algorithms: vec!["md5".to_string()],
        workers: Some(3),
    }
}

#[tokio::test]
async fn test_find_groups_identical_files() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("b")).unwrap();
    fs::write(dir.path().join("a.txt"), "abc").unwrap();
    fs::write(dir.path().join("b/c.txt"), "abc").unwrap();
    fs::write(dir.path().join("d.txt"), "hello").unwrap();

    let (duplicates, failed) = find(dir.path(), &md5_args()).await.unwrap();

    assert_eq!(failed, 0);
    assert_eq!(duplicates.len(), 1);
    assert_eq!(
        duplicates["900150983cd24fb0d6963f7d28e17f72"],
        ["a.txt", "b/c.txt"]
    );

    let mut out = Vec::new();
    render(&duplicates, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "[900150983cd24fb0d6963f7d28e17f72]: a.txt, b/c.txt\n"
    );
}

#[tokio::test]
async fn test_find_without_duplicates() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "one").unwrap();
    fs::write(dir.path().join("b.txt"), "two").unwrap();

    let (duplicates, _) = find(dir.path(), &md5_args()).await.unwrap();
    assert!(duplicates.is_empty());
}

#[test]
fn test_render_no_duplicates() {
    let mut out = Vec::new();
    render(&BTreeMap::new(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "no duplicates found\n");
}
