//! Command types shared between main and library

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use digestor_core::{AlgorithmSet, PoolConfig, SHA256};

#[derive(Subcommand)]
pub enum Commands {
    /// Print digests of every file under a directory
    Sum {
        /// Directory (or single file) to digest
        dir: PathBuf,

        #[command(flatten)]
        digest: DigestArgs,

        /// Print one JSON object per file
        #[arg(long)]
        json: bool,
    },

    /// Verify files against a list of `<hex>  <path>` lines
    Check {
        /// Digest list to verify
        list: PathBuf,

        /// Directory the listed paths are relative to
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Algorithm of the listed digests (inferred from digest length if omitted)
        #[arg(short, long)]
        algorithm: Option<String>,

        /// Number of worker threads
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Report files with identical contents
    Duplicates {
        /// Directory to search
        dir: PathBuf,

        #[command(flatten)]
        digest: DigestArgs,
    },

    /// Compare two directory trees by content
    Diff {
        /// Old tree
        old: PathBuf,

        /// New tree
        new: PathBuf,

        #[command(flatten)]
        digest: DigestArgs,

        /// Print the comparison as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Options shared by commands that walk a tree
#[derive(Args, Debug, Clone)]
pub struct DigestArgs {
    /// Digest algorithm: md5, sha1, sha256 or sha512 (repeatable)
    #[arg(short, long = "algorithm", value_name = "NAME", default_value = SHA256)]
    pub algorithms: Vec<String>,

    /// Number of worker threads (defaults to available parallelism)
    #[arg(short, long)]
    pub workers: Option<usize>,
}

impl Default for DigestArgs {
    fn default() -> Self {
        Self {
            algorithms: vec![SHA256.to_string()],
            workers: None,
        }
    }
}

impl DigestArgs {
    /// Build the pool configuration these arguments describe
    ///
    /// # Errors
    /// Returns an error if an algorithm name is unknown.
    pub fn pool_config(&self) -> Result<PoolConfig> {
        let algorithms = AlgorithmSet::from_names(&self.algorithms)
            .context("invalid --algorithm")?;
        let config = PoolConfig::new(algorithms);
        Ok(match self.workers {
            Some(workers) => config.with_workers(workers),
            None => config,
        })
    }

    /// Algorithm used where a command needs a single digest per file
    #[must_use]
    pub fn primary(&self) -> &str {
        self.algorithms.first().map_or(SHA256, String::as_str)
    }
}
