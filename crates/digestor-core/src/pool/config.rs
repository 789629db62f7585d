//! Pool configuration

use std::io;
use std::num::NonZeroUsize;
use std::thread;

use thiserror::Error;

use crate::cancel::CancellationToken;
use crate::digest::{Algorithm, AlgorithmSet};

/// Invalid pool configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no digest algorithms configured")]
    NoAlgorithms,

    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Number of workers used when none is configured: the available hardware
/// parallelism, or 1 if that cannot be determined
#[must_use]
pub fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Configuration for a [`Pool`](super::Pool)
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Worker thread count; values below 1 are treated as 1
    pub workers: usize,
    /// Algorithms run for every job that does not override them
    pub algorithms: AlgorithmSet,
    /// Shared cancellation signal
    pub cancel: CancellationToken,
}

impl PoolConfig {
    /// Create a configuration with the default worker count and a fresh,
    /// unfired cancellation token
    #[must_use]
    pub fn new(algorithms: AlgorithmSet) -> Self {
        Self {
            workers: default_workers(),
            algorithms,
            cancel: CancellationToken::new(),
        }
    }

    /// Set the worker count
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Add an algorithm to the set
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithms.insert(algorithm);
        self
    }

    /// Use an externally owned cancellation token
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Check the configuration
    ///
    /// # Errors
    /// Returns [`ConfigError::NoAlgorithms`] if the algorithm set is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.algorithms.is_empty() {
            return Err(ConfigError::NoAlgorithms);
        }
        Ok(())
    }
}
