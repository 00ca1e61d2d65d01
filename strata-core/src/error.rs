//! Error types for strata operations

use crate::CommitHash;
use thiserror::Error;

/// Errors raised while building or walking a DAG.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DagError {
    #[error("Commit not found: {hash}")]
    UnknownCommit { hash: CommitHash },

    #[error("Commit {hash} lists itself as a parent")]
    SelfParent { hash: CommitHash },

    #[error("Cycle detected among {} commits: {remaining:?}", .remaining.len())]
    CycleDetected { remaining: Vec<CommitHash> },
}

/// Invariant violations detected by the layout engine.
///
/// These indicate a caller bug (for example a DAG mutated mid-traversal).
/// The renderer stops at the first one instead of repairing its column table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Commit {hash} was already rendered")]
    DuplicateRow { hash: CommitHash },

    #[error("Commit {child} rendered after its parent {parent}")]
    OrderViolation { child: CommitHash, parent: CommitHash },

    #[error("Commit {hash} occupies more than one column: {columns:?}")]
    ColumnConflict { hash: CommitHash, columns: Vec<usize> },

    #[error("Rendering finished with unresolved lineages: {hashes:?}")]
    UnresolvedColumns { hashes: Vec<CommitHash> },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse configuration: {reason}")]
    Parse { reason: String },
}

/// Master error type for all strata errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StrataError {
    #[error("DAG error: {0}")]
    Dag(#[from] DagError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for strata operations.
pub type StrataResult<T> = Result<T, StrataError>;

// =============================================================================
// TESTS
// =============================================================================
