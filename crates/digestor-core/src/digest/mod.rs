//! Digest module: accumulators, algorithm registry and the digest engine
//!
//! An [`Algorithm`] pairs a stable identifier with a constructor for a
//! streaming [`Accumulator`]. The engine ([`digest_file`]) reads a file once
//! and feeds every chunk to one accumulator per algorithm.

mod algorithm;
mod engine;

pub use algorithm::{hashed, Accumulator, Algorithm, AlgorithmSet, MD5, SHA1, SHA256, SHA512};
pub use engine::{digest_file, Digested, CHUNK_SIZE};
