//! Recursive enumeration in lexical order

use super::{CallbackError, TraversalError};
use crate::pool::SubmitError;
use crate::vfs::{path, DirEntry, Vfs};

type Filter = dyn Fn(&DirEntry) -> Result<bool, CallbackError> + Send + Sync;
type Submit<'a> = dyn FnMut(&str) -> Result<(), SubmitError> + 'a;

pub(super) fn run(
    fs: &dyn Vfs,
    root: &str,
    filter: Option<&Filter>,
    submit: &mut Submit<'_>,
) -> Result<(), TraversalError> {
    let info = fs.metadata(root).map_err(|source| TraversalError::Metadata {
        path: root.to_string(),
        source,
    })?;
    if info.is_dir() {
        return walk_dir(fs, root, filter, submit);
    }
    let entry = DirEntry {
        name: path::base(root).to_string(),
        path: root.to_string(),
        kind: info.kind,
    };
    visit(&entry, filter, submit)
}

fn walk_dir(
    fs: &dyn Vfs,
    dir: &str,
    filter: Option<&Filter>,
    submit: &mut Submit<'_>,
) -> Result<(), TraversalError> {
    let entries = fs.read_dir(dir).map_err(|source| TraversalError::ReadDir {
        path: dir.to_string(),
        source,
    })?;
    for entry in entries {
        if entry.is_dir() {
            walk_dir(fs, &entry.path, filter, submit)?;
        } else {
            visit(&entry, filter, submit)?;
        }
    }
    Ok(())
}

fn visit(
    entry: &DirEntry,
    filter: Option<&Filter>,
    submit: &mut Submit<'_>,
) -> Result<(), TraversalError> {
    let include = match filter {
        Some(filter) => filter(entry).map_err(|source| TraversalError::Filter {
            path: entry.path.clone(),
            source,
        })?,
        None => entry.is_file(),
    };
    if include {
        submit(&entry.path)?;
    }
    Ok(())
}
