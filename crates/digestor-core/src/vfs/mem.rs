//! In-memory [`Vfs`]

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor, Read};
use std::sync::Arc;
use std::time::SystemTime;

use super::path;
use super::{DirEntry, EntryKind, FileInfo, Vfs, VfsFile};

const FILE_MODE: u32 = 0o644;
const DIR_MODE: u32 = 0o755;

#[derive(Debug, Clone)]
struct MemData {
    bytes: Arc<[u8]>,
    modified: SystemTime,
}

/// In-memory filesystem
///
/// Directories are implied by file paths; [`create_dir`](Self::create_dir)
/// adds one that holds no files.
#[derive(Debug, Clone, Default)]
pub struct MemFs {
    files: BTreeMap<String, MemData>,
    dirs: BTreeSet<String>,
}

impl MemFs {
    /// Create an empty filesystem
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    ///
    /// # Errors
    /// Returns `InvalidInput` for an invalid path or one that collides with
    /// an existing directory.
    pub fn insert(&mut self, name: &str, contents: impl Into<Vec<u8>>) -> io::Result<()> {
        path::check(name)?;
        if name == path::ROOT || self.is_dir(name) || self.has_file_ancestor(name) {
            return Err(path::invalid(name));
        }
        let data = MemData {
            bytes: Arc::from(contents.into()),
            modified: SystemTime::now(),
        };
        self.files.insert(name.to_string(), data);
        Ok(())
    }

    /// Add an empty directory
    ///
    /// # Errors
    /// Returns `InvalidInput` for an invalid path or one naming a file.
    pub fn create_dir(&mut self, name: &str) -> io::Result<()> {
        path::check(name)?;
        if self.files.contains_key(name) || self.has_file_ancestor(name) {
            return Err(path::invalid(name));
        }
        if name != path::ROOT {
            self.dirs.insert(name.to_string());
        }
        Ok(())
    }

    /// Number of files held
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn is_dir(&self, name: &str) -> bool {
        if name == path::ROOT || self.dirs.contains(name) {
            return true;
        }
        let prefix = format!("{name}/");
        self.files.keys().any(|k| k.starts_with(&prefix))
            || self.dirs.iter().any(|d| d.starts_with(&prefix))
    }

    fn has_file_ancestor(&self, name: &str) -> bool {
        name.match_indices('/')
            .any(|(idx, _)| self.files.contains_key(&name[..idx]))
    }

    fn not_found(name: &str) -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, format!("no such file: {name}"))
    }
}

struct MemFile {
    cursor: Cursor<Arc<[u8]>>,
    info: FileInfo,
}

impl Read for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl VfsFile for MemFile {
    fn metadata(&self) -> io::Result<FileInfo> {
        Ok(self.info.clone())
    }
}

impl Vfs for MemFs {
    fn open(&self, name: &str) -> io::Result<Box<dyn VfsFile>> {
        let info = self.metadata(name)?;
        let bytes = self
            .files
            .get(name)
            .map_or_else(|| Arc::<[u8]>::from(Vec::new()), |data| Arc::clone(&data.bytes));
        Ok(Box::new(MemFile {
            cursor: Cursor::new(bytes),
            info,
        }))
    }

    fn metadata(&self, name: &str) -> io::Result<FileInfo> {
        path::check(name)?;
        if let Some(data) = self.files.get(name) {
            return Ok(FileInfo {
                size: data.bytes.len() as u64,
                mode: FILE_MODE,
                modified: Some(data.modified),
                kind: EntryKind::File,
            });
        }
        if self.is_dir(name) {
            return Ok(FileInfo {
                size: 0,
                mode: DIR_MODE,
                modified: None,
                kind: EntryKind::Dir,
            });
        }
        Err(Self::not_found(name))
    }

    fn read_dir(&self, name: &str) -> io::Result<Vec<DirEntry>> {
        path::check(name)?;
        if !self.is_dir(name) {
            if self.files.contains_key(name) {
                return Err(io::Error::other(format!("not a directory: {name}")));
            }
            return Err(Self::not_found(name));
        }

        let prefix = if name == path::ROOT {
            String::new()
        } else {
            format!("{name}/")
        };

        // child name -> kind; BTreeMap keeps the listing sorted
        let mut children: BTreeMap<&str, EntryKind> = BTreeMap::new();
        let file_keys = self.files.keys().map(|k| (k, false));
        let dir_keys = self.dirs.iter().map(|k| (k, true));
        for (key, explicit_dir) in file_keys.chain(dir_keys) {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((child, _)) => {
                    children.insert(child, EntryKind::Dir);
                }
                None if explicit_dir => {
                    children.insert(rest, EntryKind::Dir);
                }
                None => {
                    children.entry(rest).or_insert(EntryKind::File);
                }
            }
        }

        Ok(children
            .into_iter()
            .map(|(child, kind)| DirEntry {
                name: child.to_string(),
                path: path::join(name, child),
                kind,
            })
            .collect())
    }
}
