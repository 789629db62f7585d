//! Digest engine: one sequential read, many accumulators

use std::collections::BTreeMap;
use std::io::{ErrorKind, Read};

use super::AlgorithmSet;
use crate::job::JobError;
use crate::vfs::{FileInfo, Vfs};

/// Read buffer size
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Output of a successful [`digest_file`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digested {
    pub info: FileInfo,
    /// Algorithm identifier -> digest bytes
    pub digests: BTreeMap<String, Vec<u8>>,
}

/// Digest `path` with every algorithm in `algorithms`
///
/// The file is opened and stat'ed, then read once from start to end; each
/// chunk goes to every accumulator before the next chunk is read. Nothing
/// is returned for any algorithm unless the whole read succeeds.
///
/// # Errors
/// Returns a [`JobError`] if the file cannot be opened, stat'ed or read, or
/// is not a regular file.
pub fn digest_file(
    fs: &dyn Vfs,
    path: &str,
    algorithms: &AlgorithmSet,
) -> Result<Digested, JobError> {
    let mut file = fs.open(path).map_err(|source| JobError::Open {
        path: path.to_string(),
        source,
    })?;
    let info = file.metadata().map_err(|source| JobError::Stat {
        path: path.to_string(),
        source,
    })?;
    if !info.is_file() {
        return Err(JobError::NotAFile {
            path: path.to_string(),
        });
    }

    let mut accumulators: Vec<_> = algorithms
        .iter()
        .map(|alg| (alg.id().to_string(), alg.accumulator()))
        .collect();

    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(JobError::Read {
                    path: path.to_string(),
                    source,
                })
            }
        };
        for (_, acc) in &mut accumulators {
            acc.update(&buf[..n]);
        }
    }

    let digests = accumulators
        .into_iter()
        .map(|(id, acc)| (id, acc.finalize()))
        .collect();

    Ok(Digested { info, digests })
}
