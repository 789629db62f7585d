//! Tests for command-line argument parsing

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::path::PathBuf;

use clap::Parser;
use digestor_core::{MD5, SHA256};

use crate::{Commands, DigestArgs};

#[derive(Parser)]
struct TestCli {
    #[command(subcommand)]
    command: Commands,
}

fn parse(args: &[&str]) -> Commands {
    TestCli::try_parse_from(std::iter::once("digestor").chain(args.iter().copied()))
        .unwrap()
        .command
}

#[test]
fn test_sum_defaults_to_sha256() {
    match parse(&["sum", "data"]) {
        Commands::Sum { dir, digest, json } => {
            assert_eq!(dir, PathBuf::from("data"));
            assert_eq!(digest.algorithms, [SHA256]);
            assert_eq!(digest.workers, None);
            assert!(!json);
        }
        _ => panic!("expected sum"),
    }
}

#[test]
fn test_repeated_algorithms() {
    match parse(&["sum", "-a", "md5", "--algorithm", "sha1", "-w", "3", "--json", "data"]) {
        Commands::Sum { digest, json, .. } => {
            assert_eq!(digest.algorithms, ["md5", "sha1"]);
            assert_eq!(digest.workers, Some(3));
            assert!(json);
        }
        _ => panic!("expected sum"),
    }
}

#[test]
fn test_check_arguments() {
    match parse(&["check", "SUMS", "--root", "tree", "-a", "md5"]) {
        Commands::Check {
            list,
            root,
            algorithm,
            workers,
        } => {
            assert_eq!(list, PathBuf::from("SUMS"));
            assert_eq!(root, PathBuf::from("tree"));
            assert_eq!(algorithm.as_deref(), Some("md5"));
            assert_eq!(workers, None);
        }
        _ => panic!("expected check"),
    }
}

#[test]
fn test_diff_requires_two_trees() {
    let result = TestCli::try_parse_from(["digestor", "diff", "old"]);
    assert!(result.is_err());
}

#[test]
fn test_pool_config_from_args() {
    let args = DigestArgs {
        algorithms: vec![MD5.to_string(), SHA256.to_string()],
        workers: Some(0),
    };
    let config = args.pool_config().unwrap();
    assert_eq!(config.algorithms.ids(), [MD5, SHA256]);
    assert_eq!(config.workers, 1);
    assert_eq!(args.primary(), MD5);
}

#[test]
fn test_pool_config_rejects_unknown_algorithm() {
    let args = DigestArgs {
        algorithms: vec!["crc32".to_string()],
        workers: None,
    };
    let err = args.pool_config().unwrap_err();
    assert!(format!("{err:#}").contains("unknown digest algorithm: crc32"));
}
