//! Typed parent edges handed from the traversal to the renderer.

use crate::CommitHash;
use serde::{Deserialize, Serialize};

/// Solid vs. dashed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Direct graph edge.
    Parent,
    /// Edge through commits elided by the subset filter.
    Ancestor,
}

/// One outgoing edge of a rendered commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "hash", rename_all = "lowercase")]
pub enum ParentEdge {
    /// The parent is rendered.
    Parent(CommitHash),
    /// A rendered ancestor reached through elided commits.
    Ancestor(CommitHash),
    /// The chain leaves the rendered set for good. Drawn as a terminator.
    Anonymous,
}

impl ParentEdge {
    /// Target hash, if the edge reconnects to a rendered commit.
    pub fn id(&self) -> Option<&CommitHash> {
        match self {
            ParentEdge::Parent(hash) | ParentEdge::Ancestor(hash) => Some(hash),
            ParentEdge::Anonymous => None,
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, ParentEdge::Parent(_))
    }

    pub fn kind(&self) -> EdgeKind {
        if self.is_direct() {
            EdgeKind::Parent
        } else {
            EdgeKind::Ancestor
        }
    }

    /// Pick between the direct and indirect flavour of a value.
    pub fn select<T>(&self, direct: T, indirect: T) -> T {
        if self.is_direct() {
            direct
        } else {
            indirect
        }
    }
}
