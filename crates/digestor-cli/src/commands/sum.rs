//! Sum command: print digests of every file under a directory

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use digestor_core::{CallbackError, Job, WalkConfig};
use tracing::warn;

use super::runner::walk_tree;
use super::types::DigestArgs;
use super::Outcome;
use crate::output::JobRecord;

/// Writes one line (or JSON object) per finished job
pub struct SumWriter<W> {
    out: W,
    algorithms: Vec<String>,
    json: bool,
    failed: usize,
}

impl<W: Write> SumWriter<W> {
    pub fn new(out: W, algorithms: Vec<String>, json: bool) -> Self {
        Self {
            out,
            algorithms,
            json,
            failed: 0,
        }
    }

    /// Number of jobs that carried an error
    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the result of one job
    ///
    /// # Errors
    /// Returns an error if the output cannot be written.
    pub fn write_job(&mut self, job: &Job) -> Result<(), CallbackError> {
        if let Some(err) = job.error() {
            warn!("{}", err);
            self.failed += 1;
        }
        if self.json {
            serde_json::to_writer(&mut self.out, &JobRecord::from(job))?;
            writeln!(self.out)?;
            return Ok(());
        }
        let single = self.algorithms.len() == 1;
        for id in &self.algorithms {
            let Some(hex) = job.hex(id) else {
                continue;
            };
            if single {
                writeln!(self.out, "{}  {}", hex, job.path())?;
            } else {
                writeln!(self.out, "{} ({}) = {}", id.to_uppercase(), job.path(), hex)?;
            }
        }
        Ok(())
    }
}

/// Digest `dir` and write the results to `out`
///
/// # Errors
/// Returns an error if the walk fails or the output cannot be written.
pub async fn sum_into<W>(dir: &Path, args: &DigestArgs, json: bool, out: W) -> Result<(Outcome, W)>
where
    W: Write + Send + 'static,
{
    let config = WalkConfig::new(args.pool_config()?);
    let ids = config.pool.algorithms.ids().into_iter().map(str::to_string).collect();
    let writer = SumWriter::new(out, ids, json);
    let mut writer = walk_tree(dir, config, writer, |w, job| w.write_job(&job)).await?;
    writer.out.flush()?;

    let outcome = Outcome::from_problems(writer.failed() > 0);
    Ok((outcome, writer.into_inner()))
}

/// Run the sum command
///
/// # Errors
/// Returns an error if the walk fails or stdout cannot be written.
pub async fn run(dir: &Path, args: &DigestArgs, json: bool) -> Result<Outcome> {
    let (outcome, _) = sum_into(dir, args, json, io::stdout()).await?;
    if outcome == Outcome::Problems {
        warn!("Some files could not be digested");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests;
