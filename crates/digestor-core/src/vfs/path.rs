//! Path rules shared by every [`Vfs`](super::Vfs) implementation

use std::io;

/// Name of the filesystem root
pub const ROOT: &str = ".";

/// Check that `path` is a valid virtual path
///
/// Valid paths are `.` or a non-empty sequence of `/`-separated elements,
/// none of which is empty, `.` or `..`. Leading or trailing slashes and
/// backslashes are rejected.
#[must_use]
pub fn is_valid(path: &str) -> bool {
    if path == ROOT {
        return true;
    }
    if path.is_empty() || path.contains('\\') {
        return false;
    }
    path.split('/')
        .all(|elem| !elem.is_empty() && elem != "." && elem != "..")
}

/// Append `name` to the directory `dir`
#[must_use]
pub fn join(dir: &str, name: &str) -> String {
    if dir == ROOT {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Final element of `path`
#[must_use]
pub fn base(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

pub(crate) fn invalid(path: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("invalid path: {path:?}"),
    )
}

pub(crate) fn check(path: &str) -> io::Result<()> {
    if is_valid(path) {
        Ok(())
    } else {
        Err(invalid(path))
    }
}
