//! Diff command: compare two directory trees by content

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use digestor_core::{Delta, FileSet, WalkConfig};
use tracing::{info, warn};

use super::runner::walk_tree;
use super::types::DigestArgs;
use super::Outcome;
use crate::output::DiffReport;

#[derive(Default)]
struct Collected {
    algorithm: String,
    files: FileSet,
    failed: usize,
}

/// Map every readable file under `dir` to its hex digest
///
/// Returns the mapping and the count of files that could not be digested.
///
/// # Errors
/// Returns an error if the walk fails.
pub async fn tree_digests(dir: &Path, args: &DigestArgs) -> Result<(FileSet, usize)> {
    let config = WalkConfig::new(args.pool_config()?);
    let collected = Collected {
        algorithm: args.primary().to_string(),
        ..Collected::default()
    };

    let collected = walk_tree(dir, config, collected, |c, job| {
        if let Some(hex) = job.hex(&c.algorithm) {
            c.files.insert(job.path().to_string(), hex);
        } else {
            if let Some(err) = job.error() {
                warn!("{}", err);
            }
            c.failed += 1;
        }
        Ok(())
    })
    .await?;
    Ok((collected.files, collected.failed))
}

/// Compare the trees at `old` and `new`
///
/// # Errors
/// Returns an error if either walk fails.
pub async fn compare(old: &Path, new: &Path, args: &DigestArgs) -> Result<(DiffReport, usize)> {
    let (old_files, old_failed) = tree_digests(old, args).await?;
    let (new_files, new_failed) = tree_digests(new, args).await?;
    let delta = Delta::new(&old_files, &new_files);
    Ok((DiffReport::from(&delta), old_failed + new_failed))
}

/// Write a report as one `<code> <path>` line per change
///
/// # Errors
/// Returns an error if the output cannot be written.
pub fn render<W: Write>(report: &DiffReport, out: &mut W) -> io::Result<()> {
    for rename in &report.renamed {
        writeln!(out, "R {} -> {}", rename.from, rename.to)?;
    }
    for path in &report.added {
        writeln!(out, "A {path}")?;
    }
    for path in &report.removed {
        writeln!(out, "D {path}")?;
    }
    for path in &report.modified {
        writeln!(out, "M {path}")?;
    }
    Ok(())
}

/// Run the diff command
///
/// # Errors
/// Returns an error if either walk fails or stdout cannot be written.
pub async fn run(old: &Path, new: &Path, args: &DigestArgs, json: bool) -> Result<Outcome> {
    info!("Comparing {} to {}", old.display(), new.display());
    let (report, failed) = compare(old, new, args).await?;

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &report)?;
        writeln!(stdout)?;
    } else {
        render(&report, &mut stdout)?;
    }

    info!(
        "✓ {} renamed, {} added, {} removed, {} modified, {} unchanged",
        report.renamed.len(),
        report.added.len(),
        report.removed.len(),
        report.modified.len(),
        report.unchanged
    );
    Ok(Outcome::from_problems(report.has_changes() || failed > 0))
}

#[cfg(test)]
mod tests;
