//! Job: one file's digesting task and its result
//!
//! A job is built when a path is submitted, run exactly once by a pool
//! worker, and handed read-only to whoever drains the results.

use std::collections::BTreeMap;
use std::io;

use thiserror::Error;
use tracing::debug;

use crate::digest::{digest_file, AlgorithmSet, Digested};
use crate::vfs::{FileInfo, Vfs};

/// Failure to digest one file
#[derive(Debug, Error)]
pub enum JobError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: io::Error },

    #[error("failed to stat {path}: {source}")]
    Stat { path: String, source: io::Error },

    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("not a regular file: {path}")]
    NotAFile { path: String },
}

/// Digest a job's result is checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedDigest {
    pub algorithm: String,
    pub digest: Vec<u8>,
}

impl ExpectedDigest {
    #[must_use]
    pub fn new(algorithm: impl Into<String>, digest: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm: algorithm.into(),
            digest: digest.into(),
        }
    }

    /// Decode a hex string
    ///
    /// # Errors
    /// Returns an error if `hex` is not valid hexadecimal.
    pub fn from_hex(
        algorithm: impl Into<String>,
        hex: impl AsRef<[u8]>,
    ) -> Result<Self, hex::FromHexError> {
        Ok(Self::new(algorithm, hex::decode(hex)?))
    }
}

/// Per-submission options
#[derive(Debug, Clone, Default)]
pub struct JobOptions {
    pub expected: Option<ExpectedDigest>,
    /// Algorithms for this job only; `None` or empty uses the pool's set
    pub algorithms: Option<AlgorithmSet>,
}

impl JobOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected digest for `algorithm`
    #[must_use]
    pub fn expect(self, algorithm: impl Into<String>, digest: impl Into<Vec<u8>>) -> Self {
        self.with_expected(ExpectedDigest::new(algorithm, digest))
    }

    #[must_use]
    pub fn with_expected(mut self, expected: ExpectedDigest) -> Self {
        self.expected = Some(expected);
        self
    }

    #[must_use]
    pub fn with_algorithms(mut self, algorithms: AlgorithmSet) -> Self {
        self.algorithms = Some(algorithms);
        self
    }
}

/// A file digesting task and, once run, its outcome
///
/// After a successful run every requested algorithm has a digest; after a
/// failed run [`error`](Self::error) is set and there are no digests.
#[derive(Debug)]
pub struct Job {
    path: String,
    algorithms: AlgorithmSet,
    expected: Option<ExpectedDigest>,
    digests: BTreeMap<String, Vec<u8>>,
    info: Option<FileInfo>,
    error: Option<JobError>,
}

impl Job {
    pub(crate) fn new(path: String, pool_algorithms: &AlgorithmSet, options: JobOptions) -> Self {
        let algorithms = match options.algorithms {
            Some(set) if !set.is_empty() => set,
            _ => pool_algorithms.clone(),
        };
        Self {
            path,
            algorithms,
            expected: options.expected,
            digests: BTreeMap::new(),
            info: None,
            error: None,
        }
    }

    /// Run the digest engine and record the outcome
    pub(crate) fn run(mut self, fs: &dyn Vfs) -> Self {
        match digest_file(fs, &self.path, &self.algorithms) {
            Ok(Digested { info, digests }) => {
                self.info = Some(info);
                self.digests = digests;
            }
            Err(e) => {
                debug!("Digest failed: {}", e);
                self.error = Some(e);
            }
        }
        self
    }

    /// Path relative to the filesystem root
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Algorithms this job was run with
    #[must_use]
    pub fn algorithms(&self) -> &AlgorithmSet {
        &self.algorithms
    }

    /// Metadata of the digested file, set on success
    #[must_use]
    pub fn info(&self) -> Option<&FileInfo> {
        self.info.as_ref()
    }

    /// All digests, keyed by algorithm identifier
    #[must_use]
    pub fn digests(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.digests
    }

    #[must_use]
    pub fn digest(&self, algorithm: &str) -> Option<&[u8]> {
        self.digests.get(algorithm).map(Vec::as_slice)
    }

    /// Lowercase hex encoding of one digest
    #[must_use]
    pub fn hex(&self, algorithm: &str) -> Option<String> {
        self.digest(algorithm).map(hex::encode)
    }

    #[must_use]
    pub fn expected(&self) -> Option<&ExpectedDigest> {
        self.expected.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&JobError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Whether the computed digest equals the expected one byte for byte
    ///
    /// False when no expected digest was given, when the job failed, or when
    /// the expected algorithm was not computed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.expected.as_ref().is_some_and(|expected| {
            self.digest(&expected.algorithm)
                .is_some_and(|actual| actual == expected.digest.as_slice())
        })
    }

    /// Split into the job and its error
    ///
    /// # Errors
    /// Returns the job's error if it failed.
    pub fn into_result(mut self) -> Result<Self, JobError> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }
}
