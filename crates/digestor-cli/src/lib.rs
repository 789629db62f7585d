//! digestor-cli library
//!
//! This module exposes the command implementations of digestor-cli for testing purposes.

#[doc(hidden)]
pub mod commands;

pub mod output;

pub use commands::types::{Commands, DigestArgs};
pub use commands::Outcome;

#[cfg(test)]
mod tests;
