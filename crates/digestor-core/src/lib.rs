//! digestor-core: Concurrent multi-algorithm file digesting
//!
//! Files are read exactly once and every chunk is fanned out to each
//! requested digest accumulator. A bounded pool of worker threads does the
//! reading, and a traversal driver feeds the pool from a directory tree.
//!
//! # Components
//!
//! - **Job** - one file path plus the requested algorithms, and later its
//!   digests, metadata and error
//! - **Digest engine** - [`digest_file`], the single-pass read for one job
//! - **Pool** - fixed set of workers behind rendezvous queues
//! - **Walk** - [`walk()`], enumerates a [`Vfs`] and drains the pool into a callback
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use digestor_core::{walk, Algorithm, AlgorithmSet, DirFs, PoolConfig, WalkConfig};
//!
//! let fs = Arc::new(DirFs::new("/srv/data"));
//! let config = WalkConfig::new(PoolConfig::new(AlgorithmSet::from(Algorithm::md5())));
//! let summary = walk(fs, ".", config, |job| {
//!     if let Some(hex) = job.hex("md5") {
//!         println!("{hex}  {}", job.path());
//!     }
//!     Ok(())
//! })?;
//! println!("{} files", summary.completed);
//! # Ok::<(), digestor_core::WalkError>(())
//! ```

pub mod cancel;
pub mod delta;
pub mod digest;
pub mod job;
pub mod pool;
pub mod vfs;
pub mod walk;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use delta::{Delta, FileSet};
pub use digest::{digest_file, Accumulator, Algorithm, AlgorithmSet, MD5, SHA1, SHA256, SHA512};
pub use job::{ExpectedDigest, Job, JobError, JobOptions};
pub use pool::{ConfigError, Pool, PoolConfig, Results, SubmitError, Submitter};
pub use vfs::{DirEntry, DirFs, EntryKind, FileInfo, MemFs, Vfs, VfsFile};
pub use walk::{
    walk, CallbackError, EntryFilter, TraversalError, WalkConfig, WalkError, WalkSummary,
};
