//! Walk: digest every file under a root
//!
//! [`walk`] creates a pool for the call, enumerates the tree on a scoped
//! thread while the calling thread drains results into the callback, and
//! folds both failure channels into one [`WalkError`].
//!
//! The callback sees jobs in completion order, not traversal order. If it
//! returns an error, it is not called again: the walk cancels its own
//! pool (the caller's token is left alone), stops submitting, and drains
//! whatever is still in flight.

mod error;
mod traverse;

use std::fmt;
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use crate::job::Job;
use crate::pool::{Pool, PoolConfig};
use crate::vfs::{DirEntry, Vfs};

pub use error::{CallbackError, TraversalError, WalkError};

/// Entry inclusion predicate
///
/// Called for every entry that is not a directory; `Ok(true)` submits it,
/// `Ok(false)` skips it, and an error stops the walk. Directories are always
/// descended into.
pub type EntryFilter = Arc<dyn Fn(&DirEntry) -> Result<bool, CallbackError> + Send + Sync>;

/// Configuration for [`walk`]
#[derive(Clone)]
pub struct WalkConfig {
    pub pool: PoolConfig,
    /// `None` includes regular files only
    pub filter: Option<EntryFilter>,
}

impl WalkConfig {
    #[must_use]
    pub fn new(pool: PoolConfig) -> Self {
        Self { pool, filter: None }
    }

    /// Replace the default regular-files-only predicate
    #[must_use]
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&DirEntry) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }
}

impl fmt::Debug for WalkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkConfig")
            .field("pool", &self.pool)
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Counts from a finished walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Jobs accepted by the pool
    pub submitted: usize,
    /// Jobs passed to the callback
    pub completed: usize,
    /// Jobs passed to the callback that carried an error
    pub failed: usize,
}

/// Digest every included file under `root`, calling `each` per result
///
/// # Errors
/// Returns a [`WalkError`] holding the traversal-stage error, the first
/// callback error, or both.
pub fn walk<F>(
    fs: Arc<dyn Vfs>,
    root: &str,
    config: WalkConfig,
    mut each: F,
) -> Result<WalkSummary, WalkError>
where
    F: FnMut(Job) -> Result<(), CallbackError>,
{
    let WalkConfig { pool, filter } = config;
    let caller_cancel = pool.cancel.clone();
    let stop = caller_cancel.child_token();

    let pool = Pool::new(Arc::clone(&fs), pool.with_cancel(stop.clone()))
        .map_err(|e| WalkError::from(TraversalError::from(e)))?;
    debug!("Walking {} with {} workers", root, pool.workers());
    let (submitter, results) = pool.into_parts();

    let mut summary = WalkSummary::default();
    let mut callback_error: Option<CallbackError> = None;

    let (traversal, submitted) = thread::scope(|scope| {
        let walker = scope.spawn(move || {
            let mut submitted = 0;
            let result = traverse::run(fs.as_ref(), root, filter.as_deref(), &mut |path| {
                submitter.add(path)?;
                submitted += 1;
                Ok(())
            });
            submitter.shutdown();
            (result, submitted)
        });

        let mut results = results;
        for job in results.by_ref() {
            if callback_error.is_some() {
                continue;
            }
            summary.completed += 1;
            if !job.is_ok() {
                summary.failed += 1;
            }
            if let Err(e) = each(job) {
                warn!("Callback stopped walk of {}: {}", root, e);
                stop.cancel();
                callback_error = Some(e);
            }
        }
        results.finish();

        walker
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    });
    summary.submitted = submitted;

    let traversal = match traversal {
        // Our own stop after a callback error is not a traversal failure
        Err(TraversalError::Cancelled) if !caller_cancel.is_cancelled() => None,
        Err(e) => Some(e),
        Ok(()) => None,
    };

    debug!(
        "Walk of {} finished: {} submitted, {} completed, {} failed",
        root, summary.submitted, summary.completed, summary.failed
    );

    if traversal.is_none() && callback_error.is_none() {
        return Ok(summary);
    }
    Err(WalkError {
        traversal,
        callback: callback_error,
    })
}
