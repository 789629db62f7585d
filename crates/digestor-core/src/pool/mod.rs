//! Worker pool: bounded, cancellable, concurrent digesting
//!
//! ```text
//! Submitter ──(rendezvous)──► Worker 0..N ──(rendezvous)──► Results
//!                              │
//!                              └─ Job::run (digest engine)
//! ```
//!
//! Both queues have zero capacity, so [`Submitter::submit`] blocks until a
//! worker takes the job. Each worker owns a clone of the output sender; the
//! result queue closes when the last worker exits and drops its clone.
//!
//! Cancellation is checked when a job is submitted and when a worker
//! dequeues it. A job dequeued after cancellation is dropped without
//! opening its file and produces no result. A job already being digested is
//! never interrupted.

mod config;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cancel::CancellationToken;
use crate::digest::AlgorithmSet;
use crate::job::{Job, JobOptions};
use crate::vfs::Vfs;

pub use config::{default_workers, ConfigError, PoolConfig};

/// Rejected submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The cancellation signal had fired; no job was created
    #[error("submission cancelled")]
    Cancelled,

    /// Every worker has exited because the results were dropped
    #[error("pool is no longer accepting jobs")]
    Closed,
}

/// A running pool of digest workers
///
/// Split it with [`into_parts`](Self::into_parts) and drive the two halves
/// from different threads: submission blocks until a worker is free, and a
/// worker blocks until its result is taken.
pub struct Pool {
    submitter: Submitter,
    results: Results,
    workers: usize,
}

impl Pool {
    /// Validate `config` and spawn the workers
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the configuration is invalid or a
    /// worker thread cannot be spawned. Nothing is spawned for an invalid
    /// configuration.
    pub fn new(fs: Arc<dyn Vfs>, config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let workers = config.workers.max(1);

        let (input_tx, input_rx) = bounded::<Job>(0);
        let (output_tx, output_rx) = bounded::<Job>(0);

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let fs = Arc::clone(&fs);
            let input = input_rx.clone();
            let output = output_tx.clone();
            let cancel = config.cancel.clone();
            let handle = thread::Builder::new()
                .name(format!("digest-worker-{id}"))
                .spawn(move || worker_loop(id, fs.as_ref(), &input, &output, &cancel))?;
            handles.push(handle);
        }
        debug!("Started {} digest workers", workers);

        Ok(Self {
            submitter: Submitter {
                tx: input_tx,
                algorithms: config.algorithms,
                cancel: config.cancel,
            },
            results: Results {
                rx: output_rx,
                handles,
            },
            workers,
        })
    }

    /// Number of worker threads
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Separate the submission and result halves
    #[must_use]
    pub fn into_parts(self) -> (Submitter, Results) {
        (self.submitter, self.results)
    }
}

fn worker_loop(
    id: usize,
    fs: &dyn Vfs,
    input: &Receiver<Job>,
    output: &Sender<Job>,
    cancel: &CancellationToken,
) {
    for job in input {
        if cancel.is_cancelled() {
            debug!("Worker {} discarding {} after cancellation", id, job.path());
            continue;
        }
        if output.send(job.run(fs)).is_err() {
            debug!("Worker {} stopping: results dropped", id);
            return;
        }
    }
}

/// The submission half of a [`Pool`]
///
/// Dropping it, or calling [`shutdown`](Self::shutdown), closes the input
/// queue; workers finish what they hold and exit.
pub struct Submitter {
    tx: Sender<Job>,
    algorithms: AlgorithmSet,
    cancel: CancellationToken,
}

impl Submitter {
    /// Hand a new job for `path` to a worker, blocking until one takes it
    ///
    /// # Errors
    /// Returns [`SubmitError::Cancelled`] if the cancellation signal has
    /// fired, or [`SubmitError::Closed`] if all workers have exited.
    pub fn submit(&self, path: impl Into<String>, options: JobOptions) -> Result<(), SubmitError> {
        if self.cancel.is_cancelled() {
            return Err(SubmitError::Cancelled);
        }
        let job = Job::new(path.into(), &self.algorithms, options);
        self.tx.send(job).map_err(|_| SubmitError::Closed)
    }

    /// [`submit`](Self::submit) with default options
    ///
    /// # Errors
    /// See [`submit`](Self::submit).
    pub fn add(&self, path: impl Into<String>) -> Result<(), SubmitError> {
        self.submit(path, JobOptions::default())
    }

    /// The pool's cancellation token
    #[must_use]
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Close the input queue
    pub fn shutdown(self) {
        drop(self);
    }
}

/// The result half of a [`Pool`]
///
/// Iterating yields completed jobs in completion order and ends once every
/// worker has exited.
pub struct Results {
    rx: Receiver<Job>,
    handles: Vec<JoinHandle<()>>,
}

impl Results {
    /// Block for the next completed job; `None` once the queue is closed
    #[must_use]
    pub fn recv(&self) -> Option<Job> {
        self.rx.recv().ok()
    }

    /// Drain remaining results and join the worker threads
    pub fn finish(self) {
        let Self { rx, handles } = self;
        let drained = rx.iter().count();
        if drained > 0 {
            debug!("Discarded {} undrained results", drained);
        }
        for handle in handles {
            if handle.join().is_err() {
                warn!("Digest worker panicked");
            }
        }
    }
}

impl Iterator for Results {
    type Item = Job;

    fn next(&mut self) -> Option<Job> {
        self.rx.recv().ok()
    }
}
