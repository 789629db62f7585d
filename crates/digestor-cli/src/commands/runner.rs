//! Running digest work off the async runtime
//!
//! Walks and pools block, so they run on tokio's blocking pool while the
//! command task waits on either their completion or Ctrl-C. Ctrl-C fires
//! the work's cancellation token and then waits for it to wind down.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use digestor_core::{walk, CallbackError, CancellationToken, DirFs, Job, Vfs, WalkConfig};
use tracing::{info, warn};

/// Run `work` on the blocking pool, cancelling `cancel` on Ctrl-C
///
/// # Errors
/// Returns an error if the blocking task panicked.
pub async fn run_blocking<T, F>(cancel: CancellationToken, work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let mut task = tokio::task::spawn_blocking(work);
    tokio::select! {
        joined = &mut task => return Ok(joined?),
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling outstanding work");
            cancel.cancel();
        }
    }
    Ok(task.await?)
}

/// Split a host path into a filesystem root and the path to walk inside it
///
/// A directory is walked from its own root; a file is walked as a single
/// entry of its parent directory.
#[must_use]
pub fn split_root(path: &Path) -> (PathBuf, String) {
    if path.is_file() {
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            return (parent.to_path_buf(), name.to_string_lossy().into_owned());
        }
    }
    (path.to_path_buf(), ".".to_string())
}

/// Walk `root`, threading `state` through every callback, and hand it back
///
/// # Errors
/// Returns an error if the walk failed or was interrupted.
pub async fn walk_tree<S, F>(root: &Path, config: WalkConfig, state: S, mut each: F) -> Result<S>
where
    S: Send + 'static,
    F: FnMut(&mut S, Job) -> Result<(), CallbackError> + Send + 'static,
{
    let cancel = config.pool.cancel.clone();
    let (fs_root, start) = split_root(root);
    info!("Digesting {}", root.display());

    let fs: Arc<dyn Vfs> = Arc::new(DirFs::new(fs_root));
    let (state, result) = run_blocking(cancel, move || {
        let mut state = state;
        let result = walk(fs, &start, config, |job| each(&mut state, job));
        (state, result)
    })
    .await?;

    let summary = result.with_context(|| format!("failed to digest {}", root.display()))?;
    info!(
        "✓ Digested {} files under {} ({} failed)",
        summary.completed,
        root.display(),
        summary.failed
    );
    Ok(state)
}
