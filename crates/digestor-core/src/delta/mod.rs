//! Delta: classify changes between two path-to-digest mappings
//!
//! A path present on both sides is *same* or *modified*. A path present on
//! one side only is paired with a path on the other side carrying the same
//! digest where possible, which makes it a *rename*; the leftovers are
//! *added* or *removed*. Pairing within one digest follows path order.
//!
//! Every list returned here is sorted by path.

use std::collections::BTreeMap;

/// Path to digest (any consistent encoding, usually hex)
pub type FileSet = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
struct Versions {
    old: Option<String>,
    new: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct DigestPaths {
    /// Paths with this digest only in the old set
    removed: Vec<String>,
    /// Paths with this digest only in the new set
    added: Vec<String>,
    old_count: usize,
    new_count: usize,
}

impl DigestPaths {
    fn paired(&self) -> usize {
        self.removed.len().min(self.added.len())
    }
}

/// Changes between an old and a new [`FileSet`]
#[derive(Debug, Clone, Default)]
pub struct Delta {
    names: BTreeMap<String, Versions>,
    digests: BTreeMap<String, DigestPaths>,
}

impl Delta {
    /// Compare `old` against `new`
    #[must_use]
    pub fn new(old: &FileSet, new: &FileSet) -> Self {
        let mut names: BTreeMap<String, Versions> = BTreeMap::new();
        for (path, digest) in old {
            names.entry(path.clone()).or_default().old = Some(digest.clone());
        }
        for (path, digest) in new {
            names.entry(path.clone()).or_default().new = Some(digest.clone());
        }

        let mut digests: BTreeMap<String, DigestPaths> = BTreeMap::new();
        for (path, versions) in &names {
            if let Some(old) = &versions.old {
                digests.entry(old.clone()).or_default().old_count += 1;
            }
            if let Some(new) = &versions.new {
                digests.entry(new.clone()).or_default().new_count += 1;
            }
            match (&versions.old, &versions.new) {
                (None, Some(new)) => {
                    digests.entry(new.clone()).or_default().added.push(path.clone());
                }
                (Some(old), None) => {
                    digests.entry(old.clone()).or_default().removed.push(path.clone());
                }
                _ => {}
            }
        }

        Self { names, digests }
    }

    /// Paths in the new set that are neither in the old set nor renames
    #[must_use]
    pub fn added(&self) -> Vec<String> {
        let mut added: Vec<String> = self
            .digests
            .values()
            .flat_map(|d| d.added[d.paired()..].iter().cloned())
            .collect();
        added.sort();
        added
    }

    /// Paths in the old set that are gone from the new set and not renamed
    #[must_use]
    pub fn removed(&self) -> Vec<String> {
        let mut removed: Vec<String> = self
            .digests
            .values()
            .flat_map(|d| d.removed[d.paired()..].iter().cloned())
            .collect();
        removed.sort();
        removed
    }

    /// Renamed paths as two equal-length lists: old names and their new names
    #[must_use]
    pub fn renamed(&self) -> (Vec<String>, Vec<String>) {
        let mut pairs: Vec<(String, String)> = self
            .digests
            .values()
            .flat_map(|d| {
                let n = d.paired();
                d.removed[..n].iter().cloned().zip(d.added[..n].iter().cloned())
            })
            .collect();
        pairs.sort();
        pairs.into_iter().unzip()
    }

    /// Paths on both sides whose digest changed
    #[must_use]
    pub fn modified(&self) -> Vec<String> {
        self.names
            .iter()
            .filter(|(_, v)| matches!((&v.old, &v.new), (Some(a), Some(b)) if a != b))
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Paths on both sides with an unchanged digest
    #[must_use]
    pub fn same(&self) -> Vec<String> {
        self.names
            .iter()
            .filter(|(_, v)| v.old.is_some() && v.old == v.new)
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Digests present only in the new set, with the new paths carrying them
    #[must_use]
    pub fn new_digests(&self) -> BTreeMap<String, Vec<String>> {
        self.paths_by_digest(|d| d.old_count == 0 && d.new_count > 0, |v| v.new.as_ref())
    }

    /// Digests present only in the old set, with the old paths carrying them
    #[must_use]
    pub fn removed_digests(&self) -> BTreeMap<String, Vec<String>> {
        self.paths_by_digest(|d| d.new_count == 0 && d.old_count > 0, |v| v.old.as_ref())
    }

    /// Whether the two sets are identical
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.names.values().all(|v| v.old.is_some() && v.old == v.new)
    }

    fn paths_by_digest(
        &self,
        keep: impl Fn(&DigestPaths) -> bool,
        side: impl Fn(&Versions) -> Option<&String>,
    ) -> BTreeMap<String, Vec<String>> {
        let mut out: BTreeMap<String, Vec<String>> = self
            .digests
            .iter()
            .filter(|(_, d)| keep(d))
            .map(|(digest, _)| (digest.clone(), Vec::new()))
            .collect();
        for (path, versions) in &self.names {
            if let Some(paths) = side(versions).and_then(|d| out.get_mut(d)) {
                paths.push(path.clone());
            }
        }
        out
    }
}
