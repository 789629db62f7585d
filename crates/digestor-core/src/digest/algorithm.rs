//! Algorithm registry

use std::fmt;
use std::sync::Arc;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::pool::ConfigError;

pub const MD5: &str = "md5";
pub const SHA1: &str = "sha1";
pub const SHA256: &str = "sha256";
pub const SHA512: &str = "sha512";

/// A streaming digest accumulator
pub trait Accumulator: Send {
    /// Feed the next chunk of input
    fn update(&mut self, data: &[u8]);

    /// Consume the accumulator and return the digest bytes
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

struct Hashed<D>(D);

impl<D: Digest + Send> Accumulator for Hashed<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        let Hashed(digest) = *self;
        Digest::finalize(digest).to_vec()
    }
}

/// Box a RustCrypto hasher as an [`Accumulator`]
#[must_use]
pub fn hashed<D: Digest + Send + 'static>() -> Box<dyn Accumulator> {
    Box::new(Hashed(D::new()))
}

type Constructor = Arc<dyn Fn() -> Box<dyn Accumulator> + Send + Sync>;

/// A named digest algorithm
///
/// Cloning is cheap; the constructor is shared.
#[derive(Clone)]
pub struct Algorithm {
    id: Arc<str>,
    constructor: Constructor,
}

impl Algorithm {
    /// Register a constructor under `id`
    pub fn new<F>(id: impl Into<Arc<str>>, constructor: F) -> Self
    where
        F: Fn() -> Box<dyn Accumulator> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            constructor: Arc::new(constructor),
        }
    }

    #[must_use]
    pub fn md5() -> Self {
        Self::new(MD5, hashed::<Md5>)
    }

    #[must_use]
    pub fn sha1() -> Self {
        Self::new(SHA1, hashed::<Sha1>)
    }

    #[must_use]
    pub fn sha256() -> Self {
        Self::new(SHA256, hashed::<Sha256>)
    }

    #[must_use]
    pub fn sha512() -> Self {
        Self::new(SHA512, hashed::<Sha512>)
    }

    /// Look up one of the default algorithms by identifier
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            MD5 => Some(Self::md5()),
            SHA1 => Some(Self::sha1()),
            SHA256 => Some(Self::sha256()),
            SHA512 => Some(Self::sha512()),
            _ => None,
        }
    }

    /// Identifiers of the default algorithms
    #[must_use]
    pub fn defaults() -> [&'static str; 4] {
        [MD5, SHA1, SHA256, SHA512]
    }

    /// Get the identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Construct a fresh accumulator
    #[must_use]
    pub fn accumulator(&self) -> Box<dyn Accumulator> {
        (self.constructor)()
    }
}

impl fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Algorithm").field(&self.id).finish()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Ordered set of algorithms keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct AlgorithmSet {
    algorithms: Vec<Algorithm>,
}

impl AlgorithmSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve default algorithms by identifier
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownAlgorithm`] for an identifier that is
    /// not one of [`Algorithm::defaults`].
    pub fn from_names<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for name in names {
            let name = name.as_ref();
            let algorithm = Algorithm::from_name(name)
                .ok_or_else(|| ConfigError::UnknownAlgorithm(name.to_string()))?;
            set.insert(algorithm);
        }
        Ok(set)
    }

    /// Add an algorithm, replacing one with the same identifier in place
    pub fn insert(&mut self, algorithm: Algorithm) {
        match self.algorithms.iter_mut().find(|a| a.id() == algorithm.id()) {
            Some(slot) => *slot = algorithm,
            None => self.algorithms.push(algorithm),
        }
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with(mut self, algorithm: Algorithm) -> Self {
        self.insert(algorithm);
        self
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Algorithm> {
        self.algorithms.iter().find(|a| a.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Identifiers in insertion order
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.algorithms.iter().map(Algorithm::id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Algorithm> {
        self.algorithms.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

impl From<Algorithm> for AlgorithmSet {
    fn from(algorithm: Algorithm) -> Self {
        Self {
            algorithms: vec![algorithm],
        }
    }
}

impl FromIterator<Algorithm> for AlgorithmSet {
    fn from_iter<T: IntoIterator<Item = Algorithm>>(iter: T) -> Self {
        let mut set = Self::new();
        for algorithm in iter {
            set.insert(algorithm);
        }
        set
    }
}

impl<'a> IntoIterator for &'a AlgorithmSet {
    type Item = &'a Algorithm;
    type IntoIter = std::slice::Iter<'a, Algorithm>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
