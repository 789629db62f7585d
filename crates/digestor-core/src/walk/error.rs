//! Walk errors

use std::error::Error;
use std::fmt;
use std::io;

use thiserror::Error;

use crate::pool::{ConfigError, SubmitError};

/// Error returned by a walk callback or entry filter
pub type CallbackError = Box<dyn Error + Send + Sync>;

/// Failure while enumerating or submitting
#[derive(Debug, Error)]
pub enum TraversalError {
    #[error("failed to start digest pool: {0}")]
    Setup(#[from] ConfigError),

    #[error("failed to stat {path}: {source}")]
    Metadata { path: String, source: io::Error },

    #[error("failed to read directory {path}: {source}")]
    ReadDir { path: String, source: io::Error },

    #[error("filter stopped walk at {path}: {source}")]
    Filter { path: String, source: CallbackError },

    #[error("walk cancelled")]
    Cancelled,

    #[error("digest pool closed before the walk finished")]
    Closed,
}

impl From<SubmitError> for TraversalError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::Cancelled => Self::Cancelled,
            SubmitError::Closed => Self::Closed,
        }
    }
}

/// Terminal failure of a walk
///
/// Either stage may have failed independently; at least one field is set.
#[derive(Debug)]
pub struct WalkError {
    /// The walk itself failed
    pub traversal: Option<TraversalError>,
    /// The callback reported a fatal condition
    pub callback: Option<CallbackError>,
}

impl From<TraversalError> for WalkError {
    fn from(e: TraversalError) -> Self {
        Self {
            traversal: Some(e),
            callback: None,
        }
    }
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.traversal, &self.callback) {
            (Some(t), Some(c)) => write!(f, "traversal failed: {t}; callback failed: {c}"),
            (Some(t), None) => write!(f, "traversal failed: {t}"),
            (None, Some(c)) => write!(f, "callback failed: {c}"),
            (None, None) => f.write_str("walk failed"),
        }
    }
}

impl Error for WalkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match (&self.traversal, &self.callback) {
            (Some(t), _) => Some(t),
            (None, Some(c)) => Some(c.as_ref()),
            (None, None) => None,
        }
    }
}
