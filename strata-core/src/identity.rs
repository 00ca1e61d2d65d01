//! Identity types for commits

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Opaque commit identifier.
///
/// The layout engine never interprets the contents; it only compares and
/// orders hashes, so any string produced by the host VCS works.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitHash(String);

impl CommitHash {
    /// Create a hash from any string-like value.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log output.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(12)
            .map(|(idx, _)| idx)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommitHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CommitHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for CommitHash {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CommitHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered set of commit hashes. Used for subsets and DAG set algebra.
///
/// Ordered so iteration (and therefore every derived layout) is deterministic.
pub type CommitSet = BTreeSet<CommitHash>;

/// Build a [`CommitSet`] from anything that yields hash-like values.
pub fn commit_set<I, H>(hashes: I) -> CommitSet
where
    I: IntoIterator<Item = H>,
    H: Into<CommitHash>,
{
    hashes.into_iter().map(Into::into).collect()
}
