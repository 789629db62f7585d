//! Serializable records for `--json` output

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use digestor_core::{Delta, Job};
use serde::{Deserialize, Serialize};

/// One digested file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    /// Algorithm id to lowercase hex
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub digests: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Job> for JobRecord {
    fn from(job: &Job) -> Self {
        Self {
            path: job.path().to_string(),
            size: job.info().map(|info| info.size),
            modified: job
                .info()
                .and_then(|info| info.modified)
                .map(DateTime::<Utc>::from),
            digests: job
                .digests()
                .iter()
                .map(|(id, bytes)| (id.clone(), hex::encode(bytes)))
                .collect(),
            error: job.error().map(ToString::to_string),
        }
    }
}

/// A renamed path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// Comparison of two trees
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub renamed: Vec<Rename>,
    pub modified: Vec<String>,
    pub unchanged: usize,
}

impl DiffReport {
    /// Whether the trees differ at all
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty()
            && self.removed.is_empty()
            && self.renamed.is_empty()
            && self.modified.is_empty())
    }
}

impl From<&Delta> for DiffReport {
    fn from(delta: &Delta) -> Self {
        let (old, new) = delta.renamed();
        Self {
            added: delta.added(),
            removed: delta.removed(),
            renamed: old
                .into_iter()
                .zip(new)
                .map(|(from, to)| Rename { from, to })
                .collect(),
            modified: delta.modified(),
            unchanged: delta.same().len(),
        }
    }
}
