//! Host directory exposed as a [`Vfs`]

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use super::path;
use super::{DirEntry, EntryKind, FileInfo, Vfs, VfsFile};

/// A host directory viewed as a virtual filesystem
///
/// Virtual paths resolve beneath `root`; `.` and `..` elements are rejected,
/// so a path can never name anything above the root. Symlinks inside the
/// tree are followed when opened.
#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    /// Create a filesystem rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the host root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        path::check(name)?;
        if name == path::ROOT {
            return Ok(self.root.clone());
        }
        Ok(name.split('/').fold(self.root.clone(), |acc, elem| acc.join(elem)))
    }
}

struct DirFile {
    file: File,
}

impl Read for DirFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl VfsFile for DirFile {
    fn metadata(&self) -> io::Result<FileInfo> {
        self.file.metadata().map(FileInfo::from)
    }
}

impl Vfs for DirFs {
    fn open(&self, name: &str) -> io::Result<Box<dyn VfsFile>> {
        let file = File::open(self.resolve(name)?)?;
        Ok(Box::new(DirFile { file }))
    }

    fn metadata(&self, name: &str) -> io::Result<FileInfo> {
        std::fs::metadata(self.resolve(name)?).map(FileInfo::from)
    }

    fn read_dir(&self, name: &str) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(self.resolve(name)?)? {
            let entry = entry?;
            let file_name = entry.file_name().into_string().map_err(|raw| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("non UTF-8 file name in {name}: {raw:?}"),
                )
            })?;
            let kind = EntryKind::from_file_type(entry.file_type()?);
            entries.push(DirEntry {
                path: path::join(name, &file_name),
                name: file_name,
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
