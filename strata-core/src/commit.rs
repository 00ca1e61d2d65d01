//! Commit model consumed by the DAG and the layout engine.

use crate::{CommitHash, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PHASE
// ============================================================================

/// Publication phase of a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Pushed to a shared branch; immutable.
    Public,
    /// Local work in progress.
    #[default]
    Draft,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Public => "public",
            Phase::Draft => "draft",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid phase string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid phase: {0}")]
pub struct PhaseParseError(pub String);

impl FromStr for Phase {
    type Err = PhaseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Phase::Public),
            "draft" => Ok(Phase::Draft),
            _ => Err(PhaseParseError(s.to_string())),
        }
    }
}

// ============================================================================
// COMMIT
// ============================================================================

/// A commit as supplied by the host application's commit model.
///
/// Only `hash`, `parents` and the two flags influence layout. The remaining
/// fields feed ordering (`date`) and glyph selection (`phase`, `successor`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: CommitHash,
    /// Ordered parents. The first parent is the straight continuation.
    pub parents: Vec<CommitHash>,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<Timestamp>,
    /// The working copy parent.
    #[serde(default)]
    pub is_head: bool,
    /// Synthetic "you are here" annotation, never a real graph member.
    #[serde(default)]
    pub is_you_are_here: bool,
    /// Set when the commit was rewritten into another commit.
    #[serde(default)]
    pub successor: Option<CommitHash>,
}

impl Commit {
    /// Create a draft commit with the given parents.
    pub fn new<I, H>(hash: impl Into<CommitHash>, parents: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<CommitHash>,
    {
        Self {
            hash: hash.into(),
            parents: parents.into_iter().map(Into::into).collect(),
            phase: Phase::Draft,
            author: String::new(),
            description: String::new(),
            date: None,
            is_head: false,
            is_you_are_here: false,
            successor: None,
        }
    }

    /// Create the "you are here" pseudo-commit sitting on top of `parent`.
    pub fn you_are_here(
        hash: impl Into<CommitHash>,
        parent: impl Into<CommitHash>,
        description: impl Into<String>,
    ) -> Self {
        let mut commit = Self::new(hash, [parent.into()]);
        commit.description = description.into();
        commit.is_you_are_here = true;
        commit
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_date(mut self, date: Timestamp) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_successor(mut self, successor: impl Into<CommitHash>) -> Self {
        self.successor = Some(successor.into());
        self
    }

    /// Mark as the working copy parent.
    pub fn as_head(mut self) -> Self {
        self.is_head = true;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn is_public(&self) -> bool {
        self.phase == Phase::Public
    }

    /// Rewritten commits are drawn as obsolete.
    pub fn is_obsolete(&self) -> bool {
        self.successor.is_some()
    }

    /// First line of the description.
    pub fn title(&self) -> &str {
        self.description.lines().next().unwrap_or("")
    }
}
