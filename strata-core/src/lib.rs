//! Strata Core - Commit Model Types
//!
//! Data structures shared by the DAG and the layout engine: commit identity,
//! the commit model, typed parent edges, errors and configuration.
//! This crate contains no layout logic.

mod commit;
mod config;
mod edge;
mod error;
mod identity;

pub use commit::{Commit, Phase, PhaseParseError};
pub use config::{RenderConfig, TextConfig, TieBreak};
pub use edge::{EdgeKind, ParentEdge};
pub use error::{ConfigError, DagError, RenderError, StrataError, StrataResult};
pub use identity::{commit_set, CommitHash, CommitSet, Timestamp};
