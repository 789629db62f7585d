//! Virtual filesystem: read-only, path-addressed file access
//!
//! Paths are `/`-separated and relative to the filesystem root, with `.`
//! naming the root itself. Implementations are shared by every worker
//! thread, so they must be `Send + Sync` and must not need locking for reads.

mod dir;
mod mem;
pub mod path;

use std::io::{self, Read};
use std::time::SystemTime;

pub use dir::DirFs;
pub use mem::MemFs;

/// Kind of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Other,
}

impl EntryKind {
    fn from_file_type(ft: std::fs::FileType) -> Self {
        if ft.is_symlink() {
            Self::Symlink
        } else if ft.is_dir() {
            Self::Dir
        } else if ft.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// File metadata captured when a file is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub size: u64,
    /// Permission bits (`0o644` style)
    pub mode: u32,
    pub modified: Option<SystemTime>,
    pub kind: EntryKind,
}

impl FileInfo {
    /// Whether this describes a regular file
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Whether this describes a directory
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

impl From<std::fs::Metadata> for FileInfo {
    fn from(meta: std::fs::Metadata) -> Self {
        #[cfg(unix)]
        let mode = {
            use std::os::unix::fs::PermissionsExt;
            meta.permissions().mode() & 0o7777
        };
        #[cfg(not(unix))]
        let mode = if meta.permissions().readonly() {
            0o444
        } else {
            0o644
        };

        Self {
            size: meta.len(),
            mode,
            modified: meta.modified().ok(),
            kind: EntryKind::from_file_type(meta.file_type()),
        }
    }
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Final path element
    pub name: String,
    /// Full path relative to the filesystem root
    pub path: String,
    pub kind: EntryKind,
}

impl DirEntry {
    /// Whether the entry is a regular file
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Whether the entry is a directory
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// An open file handle
pub trait VfsFile: Read + Send {
    /// Metadata of the opened file
    ///
    /// # Errors
    /// Returns an error if the metadata cannot be read.
    fn metadata(&self) -> io::Result<FileInfo>;
}

/// Read-only filesystem abstraction
pub trait Vfs: Send + Sync {
    /// Open a file for reading
    ///
    /// # Errors
    /// Returns an error if the path is invalid or cannot be opened.
    fn open(&self, path: &str) -> io::Result<Box<dyn VfsFile>>;

    /// Metadata for a path, without opening it
    ///
    /// # Errors
    /// Returns an error if the path is invalid or does not exist.
    fn metadata(&self, path: &str) -> io::Result<FileInfo>;

    /// List a directory, sorted by entry name
    ///
    /// # Errors
    /// Returns an error if the path is invalid, missing, or not a directory.
    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>>;
}
