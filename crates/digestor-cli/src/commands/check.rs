//! Check command: verify files against a digest list
//!
//! The list holds one `<hex>  <path>` line per file, as written by `sum`
//! with a single algorithm. A `*` in place of the second space (binary
//! mode marker) is accepted, as are blank lines and `#` comments.

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use digestor_core::{
    Algorithm, AlgorithmSet, ConfigError, DirFs, ExpectedDigest, Job, JobOptions, Pool, PoolConfig,
    Vfs, MD5, SHA1, SHA256, SHA512,
};
use tracing::{debug, info, warn};

use super::runner::run_blocking;
use super::Outcome;

/// One line of a digest list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub hex: String,
    pub path: String,
}

/// Parse a digest list
///
/// # Errors
/// Returns an error naming the first malformed line.
pub fn parse_list(text: &str) -> Result<Vec<ListEntry>> {
    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let entry = parse_line(line).with_context(|| format!("line {}: malformed entry", idx + 1))?;
        entries.push(entry);
    }
    Ok(entries)
}

fn parse_line(line: &str) -> Result<ListEntry> {
    let Some((hex, rest)) = line.split_once(' ') else {
        bail!("expected `<hex>  <path>`");
    };
    if hex.is_empty() || hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        bail!("invalid digest {hex:?}");
    }
    let path = rest
        .strip_prefix(' ')
        .or_else(|| rest.strip_prefix('*'))
        .ok_or_else(|| anyhow!("expected two spaces after the digest"))?;
    let path = path.strip_prefix("./").unwrap_or(path);
    if path.is_empty() {
        bail!("missing path");
    }
    Ok(ListEntry {
        hex: hex.to_ascii_lowercase(),
        path: path.to_string(),
    })
}

/// Default algorithm producing digests of `hex_len` hex characters
#[must_use]
pub fn algorithm_for(hex_len: usize) -> Option<&'static str> {
    match hex_len {
        32 => Some(MD5),
        40 => Some(SHA1),
        64 => Some(SHA256),
        128 => Some(SHA512),
        _ => None,
    }
}

fn plan(entry: ListEntry, algorithm: Option<&str>) -> Result<(String, JobOptions)> {
    let id = match algorithm {
        Some(id) => id,
        None => algorithm_for(entry.hex.len()).ok_or_else(|| {
            anyhow!(
                "{}: cannot infer algorithm from a {}-character digest",
                entry.path,
                entry.hex.len()
            )
        })?,
    };
    let algo =
        Algorithm::from_name(id).ok_or_else(|| ConfigError::UnknownAlgorithm(id.to_string()))?;
    let expected = ExpectedDigest::from_hex(id, &entry.hex)
        .with_context(|| format!("{}: invalid digest", entry.path))?;
    let options = JobOptions::new()
        .with_algorithms(AlgorithmSet::from(algo))
        .with_expected(expected);
    Ok((entry.path, options))
}

/// Verification counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub ok: usize,
    pub mismatched: usize,
    pub unreadable: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.ok + self.mismatched + self.unreadable
    }

    fn record<W: Write>(&mut self, job: &Job, out: &mut W) -> io::Result<()> {
        if let Some(err) = job.error() {
            debug!("{}", err);
            self.unreadable += 1;
            writeln!(out, "{}: FAILED open or read", job.path())
        } else if job.is_valid() {
            self.ok += 1;
            writeln!(out, "{}: OK", job.path())
        } else {
            self.mismatched += 1;
            writeln!(out, "{}: FAILED", job.path())
        }
    }
}

fn verify<W: Write>(
    fs: Arc<dyn Vfs>,
    config: PoolConfig,
    planned: Vec<(String, JobOptions)>,
    mut out: W,
) -> Result<(Tally, W)> {
    let pool = Pool::new(fs, config)?;
    let (submitter, mut results) = pool.into_parts();

    // Results are dropped inside the scope on early return, unblocking workers
    let tally = thread::scope(|scope| -> Result<Tally> {
        scope.spawn(move || {
            for (path, options) in planned {
                if let Err(e) = submitter.submit(path, options) {
                    debug!("Stopped submitting: {}", e);
                    break;
                }
            }
            submitter.shutdown();
        });

        let mut tally = Tally::default();
        for job in results.by_ref() {
            tally.record(&job, &mut out)?;
        }
        results.finish();
        Ok(tally)
    })?;
    out.flush()?;
    Ok((tally, out))
}

/// Verify the entries of `list` beneath `root`, writing one line per file to `out`
///
/// # Errors
/// Returns an error if the list cannot be read or parsed, or output fails.
pub async fn check_into<W>(
    list: &Path,
    root: &Path,
    algorithm: Option<&str>,
    workers: Option<usize>,
    out: W,
) -> Result<(Outcome, Tally, W)>
where
    W: Write + Send + 'static,
{
    let text = tokio::fs::read_to_string(list)
        .await
        .with_context(|| format!("failed to read {}", list.display()))?;
    let planned = parse_list(&text)?
        .into_iter()
        .map(|entry| plan(entry, algorithm))
        .collect::<Result<Vec<_>>>()?;
    if planned.is_empty() {
        warn!("No digests found in {}", list.display());
        return Ok((Outcome::Clean, Tally::default(), out));
    }

    let ids: BTreeSet<&str> = planned
        .iter()
        .flat_map(|(_, options)| options.algorithms.iter().flat_map(AlgorithmSet::ids))
        .collect();
    let mut config = PoolConfig::new(AlgorithmSet::from_names(ids)?);
    if let Some(workers) = workers {
        config = config.with_workers(workers);
    }

    info!("Checking {} files under {}", planned.len(), root.display());
    let expected = planned.len();
    let cancel = config.cancel.clone();
    let fs: Arc<dyn Vfs> = Arc::new(DirFs::new(root));
    let (tally, out) = run_blocking(cancel, move || verify(fs, config, planned, out)).await??;

    if tally.mismatched > 0 {
        warn!("{} computed checksums did NOT match", tally.mismatched);
    }
    if tally.unreadable > 0 {
        warn!("{} listed files could not be read", tally.unreadable);
    }
    if tally.total() < expected {
        warn!("{} listed files were not checked", expected - tally.total());
    }
    let problems = tally.mismatched > 0 || tally.unreadable > 0 || tally.total() < expected;
    Ok((Outcome::from_problems(problems), tally, out))
}

/// Run the check command
///
/// # Errors
/// Returns an error if the list cannot be read or parsed.
pub async fn run(
    list: &Path,
    root: &Path,
    algorithm: Option<&str>,
    workers: Option<usize>,
) -> Result<Outcome> {
    let (outcome, tally, _) = check_into(list, root, algorithm, workers, io::stdout()).await?;
    info!("✓ {} of {} files verified", tally.ok, tally.total());
    Ok(outcome)
}
