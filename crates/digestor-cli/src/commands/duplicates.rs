//! Duplicates command: report files with identical contents

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use digestor_core::WalkConfig;
use tracing::{info, warn};

use super::runner::walk_tree;
use super::types::DigestArgs;
use super::Outcome;

/// Paths grouped by digest
#[derive(Debug, Default)]
struct Groups {
    algorithm: String,
    by_digest: BTreeMap<String, Vec<String>>,
    failed: usize,
}

/// Digest every file under `dir` and return groups of two or more paths
/// sharing a digest, keyed by hex digest, plus the count of unreadable files
///
/// # Errors
/// Returns an error if the walk fails.
pub async fn find(dir: &Path, args: &DigestArgs) -> Result<(BTreeMap<String, Vec<String>>, usize)> {
    let config = WalkConfig::new(args.pool_config()?);
    let groups = Groups {
        algorithm: args.primary().to_string(),
        ..Groups::default()
    };

    let groups = walk_tree(dir, config, groups, |groups, job| {
        match job.hex(&groups.algorithm) {
            Some(hex) => groups
                .by_digest
                .entry(hex)
                .or_default()
                .push(job.path().to_string()),
            None => {
                if let Some(err) = job.error() {
                    warn!("{}", err);
                }
                groups.failed += 1;
            }
        }
        Ok(())
    })
    .await?;

    let mut duplicates = groups.by_digest;
    duplicates.retain(|_, paths| paths.len() > 1);
    for paths in duplicates.values_mut() {
        paths.sort();
    }
    Ok((duplicates, groups.failed))
}

/// Write duplicate groups as `[<hex>]: a, b`
///
/// # Errors
/// Returns an error if the output cannot be written.
pub fn render<W: Write>(duplicates: &BTreeMap<String, Vec<String>>, out: &mut W) -> io::Result<()> {
    if duplicates.is_empty() {
        return writeln!(out, "no duplicates found");
    }
    for (digest, paths) in duplicates {
        writeln!(out, "[{}]: {}", digest, paths.join(", "))?;
    }
    Ok(())
}

/// Run the duplicates command
///
/// # Errors
/// Returns an error if the walk fails or stdout cannot be written.
pub async fn run(dir: &Path, args: &DigestArgs) -> Result<Outcome> {
    let (duplicates, failed) = find(dir, args).await?;
    render(&duplicates, &mut io::stdout().lock())?;
    info!("Found {} groups of duplicates", duplicates.len());
    Ok(Outcome::from_problems(failed > 0))
}

#[cfg(test)]
mod tests;
