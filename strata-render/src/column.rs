//! The active column table.

use serde::{Deserialize, Serialize};
use strata_core::{CommitHash, EdgeKind, ParentEdge};

use crate::line::{LinkLine, NodeLine, PadLine};

/// State of one column between rows.
///
/// When two edges claim the same column the later variant in declaration
/// order wins (`Empty < Blocked < Reserved < Ancestor < Parent`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "hash", rename_all = "lowercase")]
pub enum Column {
    #[default]
    Empty,
    /// Held for the rest of the current row only (anonymous parent).
    Blocked,
    /// Kept free for a commit whose row has not arrived yet.
    Reserved(CommitHash),
    Ancestor(CommitHash),
    Parent(CommitHash),
}

impl Column {
    pub fn matches(&self, hash: &CommitHash) -> bool {
        match self {
            Column::Empty | Column::Blocked => false,
            Column::Reserved(h) | Column::Ancestor(h) | Column::Parent(h) => h == hash,
        }
    }

    pub fn hash(&self) -> Option<&CommitHash> {
        match self {
            Column::Empty | Column::Blocked => None,
            Column::Reserved(h) | Column::Ancestor(h) | Column::Parent(h) => Some(h),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Column::Empty => 0,
            Column::Blocked => 1,
            Column::Reserved(_) => 2,
            Column::Ancestor(_) => 3,
            Column::Parent(_) => 4,
        }
    }

    /// Overwrite with `other` if it takes precedence.
    pub fn merge(&mut self, other: &Column) {
        if other.precedence() > self.precedence() {
            *self = other.clone();
        }
    }

    /// Blocked columns become free once the row is done.
    pub fn reset(&mut self) {
        if *self == Column::Blocked {
            *self = Column::Empty;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Column::Empty
    }

    /// Kind of edge this column carries into the next row, if any.
    pub fn edge_kind(&self) -> Option<EdgeKind> {
        match self {
            Column::Parent(_) => Some(EdgeKind::Parent),
            Column::Ancestor(_) => Some(EdgeKind::Ancestor),
            _ => None,
        }
    }

    pub fn to_node_line(&self) -> NodeLine {
        match self {
            Column::Ancestor(_) => NodeLine::Ancestor,
            Column::Parent(_) => NodeLine::Parent,
            _ => NodeLine::Blank,
        }
    }

    pub fn to_link_line(&self) -> LinkLine {
        match self {
            Column::Ancestor(_) => LinkLine::VERT_ANCESTOR,
            Column::Parent(_) => LinkLine::VERT_PARENT,
            _ => LinkLine::empty(),
        }
    }

    pub fn to_pad_line(&self) -> PadLine {
        match self {
            Column::Ancestor(_) => PadLine::Ancestor,
            Column::Parent(_) => PadLine::Parent,
            _ => PadLine::Blank,
        }
    }
}

impl From<&ParentEdge> for Column {
    fn from(edge: &ParentEdge) -> Self {
        match edge {
            ParentEdge::Parent(hash) => Column::Parent(hash.clone()),
            ParentEdge::Ancestor(hash) => Column::Ancestor(hash.clone()),
            ParentEdge::Anonymous => Column::Blocked,
        }
    }
}

/// Lookup and housekeeping over the column vector.
pub trait ColumnsExt {
    /// Every column index holding `hash`.
    fn positions(&self, hash: &CommitHash) -> Vec<usize>;
    fn find(&self, hash: &CommitHash) -> Option<usize>;
    /// `index` if it is empty, otherwise the lowest empty column.
    fn find_empty(&self, index: usize) -> Option<usize>;
    fn first_empty(&self) -> Option<usize>;
    fn new_empty(&mut self) -> usize;
    /// Drop trailing empty columns.
    fn trim(&mut self);
    /// Release blocked columns, then trim.
    fn reset(&mut self);
}

impl ColumnsExt for Vec<Column> {
    fn positions(&self, hash: &CommitHash) -> Vec<usize> {
        self.iter()
            .enumerate()
            .filter(|(_, c)| c.matches(hash))
            .map(|(i, _)| i)
            .collect()
    }

    fn find(&self, hash: &CommitHash) -> Option<usize> {
        self.iter().position(|c| c.matches(hash))
    }

    fn find_empty(&self, index: usize) -> Option<usize> {
        if self.get(index).is_some_and(Column::is_empty) {
            return Some(index);
        }
        self.first_empty()
    }

    fn first_empty(&self) -> Option<usize> {
        self.iter().position(Column::is_empty)
    }

    fn new_empty(&mut self) -> usize {
        self.push(Column::Empty);
        self.len() - 1
    }

    fn trim(&mut self) {
        while self.last().is_some_and(Column::is_empty) {
            self.pop();
        }
    }

    fn reset(&mut self) {
        for column in self.iter_mut() {
            column.reset();
        }
        self.trim();
    }
}
