//! CLI commands

pub mod check;
pub mod diff;
pub mod duplicates;
pub mod runner;
pub mod sum;
pub mod types;

use std::process::ExitCode;

use anyhow::Result;

use types::Commands;

/// How a command finished once it ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report
    Clean,
    /// Some files failed, mismatched, or differed
    Problems,
}

impl Outcome {
    /// `Problems` if `problems` is set
    #[must_use]
    pub fn from_problems(problems: bool) -> Self {
        if problems {
            Self::Problems
        } else {
            Self::Clean
        }
    }

    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Clean => ExitCode::SUCCESS,
            Self::Problems => ExitCode::FAILURE,
        }
    }
}

/// Dispatch a parsed command
///
/// # Errors
/// Returns an error if the command could not run to completion.
pub async fn execute(command: Commands) -> Result<Outcome> {
    match command {
        Commands::Sum { dir, digest, json } => sum::run(&dir, &digest, json).await,
        Commands::Check {
            list,
            root,
            algorithm,
            workers,
        } => check::run(&list, &root, algorithm.as_deref(), workers).await,
        Commands::Duplicates { dir, digest } => duplicates::run(&dir, &digest).await,
        Commands::Diff {
            old,
            new,
            digest,
            json,
        } => diff::run(&old, &new, &digest, json).await,
    }
}
