//! Cooperative cancellation
//!
//! A [`CancellationToken`] is a fire-once flag shared by clones. Firing it
//! never interrupts work in progress; workers and submitters poll it at
//! their own boundaries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Node {
    cancelled: AtomicBool,
    parent: Option<Arc<Node>>,
}

impl Node {
    fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Acquire) {
            return true;
        }
        self.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }
}

/// Shared cancellation signal
///
/// Clones observe the same flag. A token created with
/// [`child_token`](Self::child_token) is cancelled when its parent is, but
/// cancelling the child leaves the parent untouched.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    node: Arc<Node>,
}

impl CancellationToken {
    /// Create a token that has not fired
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a token that also fires when `self` fires
    #[must_use]
    pub fn child_token(&self) -> Self {
        Self {
            node: Arc::new(Node {
                cancelled: AtomicBool::new(false),
                parent: Some(Arc::clone(&self.node)),
            }),
        }
    }

    /// Fire the signal. Idempotent.
    pub fn cancel(&self) {
        self.node.cancelled.store(true, Ordering::Release);
    }

    /// Whether this token or any ancestor has fired
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.node.is_cancelled()
    }
}
