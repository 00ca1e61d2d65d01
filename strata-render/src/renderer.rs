//! Row-by-row column assignment and edge routing.
//!
//! Rows must be fed children first. For each row the renderer picks the node
//! column, hands every parent edge a column, and records the shapes that
//! connect them:
//!
//! ```text
//! node line     │ o          node glyph plus pass-through edges
//! link line     ├─╯          forks and merges toward parent columns
//! term line     ╎            anonymous parents end here
//!               ~
//! pad line      │            edges continuing to the next row
//! ```

use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use serde::{Deserialize, Serialize};
use strata_core::{CommitHash, EdgeKind, ParentEdge, RenderError, StrataResult};

use crate::column::{Column, ColumnsExt};
use crate::line::{LinkLine, NodeLine, PadLine};

// ============================================================================
// ROW TYPES
// ============================================================================

/// Per-row rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowOptions {
    /// Place the node right of every active lineage.
    pub force_last_column: bool,
}

/// Layout of one rendered commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRow {
    pub hash: CommitHash,
    /// More than one parent edge.
    pub merge: bool,
    pub node_column: usize,
    /// Columns holding this row's parent edges, ascending.
    pub parent_columns: Vec<usize>,
    /// No edge arrives from above.
    pub is_head: bool,
    /// No edge leaves below.
    pub is_root: bool,
    /// Kind of the edge arriving from above.
    pub incoming_edge: Option<EdgeKind>,
    pub node_line: Vec<NodeLine>,
    /// Padding above extra message lines, derived from the node line.
    pub top_pad_lines: Vec<PadLine>,
    pub link_line: Option<Vec<LinkLine>>,
    /// Bits of `link_line` that start at this row's node.
    pub link_line_from_node: Option<Vec<LinkLine>>,
    /// Columns whose anonymous parent terminates here.
    pub term_line: Option<Vec<bool>>,
    pub pad_lines: Vec<PadLine>,
}

impl GraphRow {
    /// Number of columns in every line of this row.
    pub fn width(&self) -> usize {
        self.node_line.len()
    }

    pub fn has_ancestor_pad(&self) -> bool {
        self.pad_lines.contains(&PadLine::Ancestor)
    }
}

// ============================================================================
// COLUMN BOUNDS
// ============================================================================

/// Extent of the parent columns around the node column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AncestorColumnBounds {
    target: usize,
    min_ancestor: usize,
    min_parent: usize,
    max_parent: usize,
    max_ancestor: usize,
}

impl AncestorColumnBounds {
    fn new(columns: &BTreeMap<usize, &ParentEdge>, target: usize) -> Option<Self> {
        let (&first, _) = columns.iter().next()?;
        let (&last, _) = columns.iter().next_back()?;
        let min_parent = columns
            .iter()
            .find(|(_, edge)| edge.is_direct())
            .map_or(target, |(&i, _)| i);
        let max_parent = columns
            .iter()
            .rev()
            .find(|(_, edge)| edge.is_direct())
            .map_or(target, |(&i, _)| i);
        Some(Self {
            target,
            min_ancestor: first.min(target),
            min_parent: min_parent.min(target),
            max_parent: max_parent.max(target),
            max_ancestor: last.max(target),
        })
    }

    /// Columns strictly between the outermost parent columns.
    fn range(&self) -> Range<usize> {
        if self.min_ancestor < self.max_ancestor {
            self.min_ancestor + 1..self.max_ancestor
        } else {
            0..0
        }
    }

    /// Solid inside the parent span, dashed in the rest of the ancestor span.
    fn horizontal_line(&self, index: usize) -> LinkLine {
        if index == self.target {
            LinkLine::empty()
        } else if index > self.min_parent && index < self.max_parent {
            LinkLine::HORIZ_PARENT
        } else if index > self.min_ancestor && index < self.max_ancestor {
            LinkLine::HORIZ_ANCESTOR
        } else {
            LinkLine::empty()
        }
    }
}

// ============================================================================
// RENDERER
// ============================================================================

/// Stateful column assigner. One instance per rendering pass.
#[derive(Debug, Default)]
pub struct Renderer {
    columns: Vec<Column>,
    rendered: HashSet<CommitHash>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current number of columns, trailing empties excluded.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Keep a column free for `hash` until its row is rendered.
    pub fn reserve(&mut self, hash: CommitHash) {
        if self.columns.find(&hash).is_some() {
            return;
        }
        match self.columns.first_empty() {
            Some(index) => self.columns[index] = Column::Reserved(hash),
            None => self.columns.push(Column::Reserved(hash)),
        }
    }

    /// Lay out the row for `hash`.
    pub fn next_row(
        &mut self,
        hash: CommitHash,
        parents: Vec<ParentEdge>,
        options: RowOptions,
    ) -> StrataResult<GraphRow> {
        self.check_row(&hash, &parents)?;

        let existing = self.columns.find(&hash);
        let incoming = existing.and_then(|i| self.columns[i].edge_kind());
        let is_head = incoming.is_none();
        let is_root = parents.is_empty();

        let column = match existing {
            Some(index) if options.force_last_column && incoming.is_some() => {
                tracing::warn!(
                    hash = %hash,
                    column = index,
                    "Cannot move a commit with an incoming edge to the last column"
                );
                index
            }
            Some(index) if options.force_last_column => {
                self.columns[index] = Column::Empty;
                self.columns.trim();
                self.columns.new_empty()
            }
            Some(index) => index,
            None if options.force_last_column => self.columns.new_empty(),
            None => match self.columns.first_empty() {
                Some(index) => index,
                None => self.columns.new_empty(),
            },
        };
        self.columns[column] = Column::Empty;
        let merge = parents.len() > 1;

        let mut node_line: Vec<NodeLine> = self.columns.iter().map(Column::to_node_line).collect();
        node_line[column] = NodeLine::Node;

        let mut top_pad_lines: Vec<PadLine> =
            self.columns.iter().map(Column::to_pad_line).collect();
        top_pad_lines[column] = if is_root { PadLine::Blank } else { PadLine::Parent };

        let mut link_line: Vec<LinkLine> = self.columns.iter().map(Column::to_link_line).collect();
        let mut from_node: Vec<LinkLine> = vec![LinkLine::empty(); self.columns.len()];
        let mut need_link_line = false;

        let mut term_line: Vec<bool> = vec![false; self.columns.len()];
        let mut need_term_line = false;

        let mut pad_lines: Vec<PadLine> = self.columns.iter().map(Column::to_pad_line).collect();

        // Give every parent a column: its existing lineage, the node column,
        // the lowest free column, or a new one.
        let mut parent_columns: BTreeMap<usize, &ParentEdge> = BTreeMap::new();
        for edge in &parents {
            if let Some(index) = edge.id().and_then(|id| self.columns.find(id)) {
                self.columns[index].merge(&Column::from(edge));
                parent_columns.insert(index, edge);
                continue;
            }
            if let Some(index) = self.columns.find_empty(column) {
                self.columns[index].merge(&Column::from(edge));
                parent_columns.insert(index, edge);
                continue;
            }
            parent_columns.insert(self.columns.len(), edge);
            self.columns.push(Column::from(edge));
            node_line.push(NodeLine::Blank);
            top_pad_lines.push(PadLine::Blank);
            link_line.push(LinkLine::empty());
            from_node.push(LinkLine::empty());
            term_line.push(false);
            pad_lines.push(PadLine::Blank);
        }

        for (&i, edge) in &parent_columns {
            if edge.id().is_none() {
                term_line[i] = true;
                need_term_line = true;
            }
        }

        // A lone parent sitting right of the node is pulled into the node
        // column, keeping the style of the edge it arrived with.
        if parents.len() == 1 {
            if let Some((&parent_column, _)) = parent_columns.iter().next() {
                if parent_column > column {
                    self.columns.swap(column, parent_column);
                    if let Some(edge) = parent_columns.remove(&parent_column) {
                        parent_columns.insert(column, edge);
                    }

                    let was_direct = link_line[parent_column].contains(LinkLine::VERT_PARENT);
                    let pick = |direct: LinkLine, ancestor: LinkLine| {
                        if was_direct {
                            direct
                        } else {
                            ancestor
                        }
                    };
                    let fork = pick(LinkLine::RIGHT_FORK_PARENT, LinkLine::RIGHT_FORK_ANCESTOR);
                    link_line[column] |= fork;
                    from_node[column] |= fork;
                    let horiz = pick(LinkLine::HORIZ_PARENT, LinkLine::HORIZ_ANCESTOR);
                    for i in column + 1..parent_column {
                        link_line[i] |= horiz;
                        from_node[i] |= horiz;
                    }
                    let merge_in = pick(LinkLine::LEFT_MERGE_PARENT, LinkLine::LEFT_MERGE_ANCESTOR);
                    link_line[parent_column] = merge_in;
                    from_node[parent_column] = merge_in;
                    need_link_line = true;
                    pad_lines[parent_column] = PadLine::Blank;
                }
            }
        }

        if let Some(bounds) = AncestorColumnBounds::new(&parent_columns, column) {
            for i in bounds.range() {
                let horiz = bounds.horizontal_line(i);
                if !horiz.is_empty() {
                    link_line[i] |= horiz;
                    from_node[i] |= horiz;
                    need_link_line = true;
                }
            }

            let mut node_merge = LinkLine::empty();
            if bounds.max_parent > column {
                node_merge |= LinkLine::RIGHT_MERGE_PARENT;
            } else if bounds.max_ancestor > column {
                node_merge |= LinkLine::RIGHT_MERGE_ANCESTOR;
            }
            if bounds.min_parent < column {
                node_merge |= LinkLine::LEFT_MERGE_PARENT;
            } else if bounds.min_ancestor < column {
                node_merge |= LinkLine::LEFT_MERGE_ANCESTOR;
            }
            if !node_merge.is_empty() {
                link_line[column] |= node_merge;
                from_node[column] |= node_merge;
                need_link_line = true;
            }

            for (&i, edge) in &parent_columns {
                pad_lines[i] = self.columns[i].to_pad_line();
                let kind = edge.kind();
                let shape = if i < column {
                    LinkLine::for_kind(kind, LinkLine::RIGHT_FORK_PARENT, LinkLine::RIGHT_FORK_ANCESTOR)
                } else if i == column {
                    LinkLine::CHILD
                        | LinkLine::for_kind(kind, LinkLine::VERT_PARENT, LinkLine::VERT_ANCESTOR)
                } else {
                    LinkLine::for_kind(kind, LinkLine::LEFT_FORK_PARENT, LinkLine::LEFT_FORK_ANCESTOR)
                };
                link_line[i] |= shape;
                from_node[i] |= shape;
            }
        }

        self.columns.reset();
        self.rendered.insert(hash.clone());

        tracing::trace!(
            hash = %hash,
            column,
            parents = parents.len(),
            width = node_line.len(),
            "Rendered row"
        );

        Ok(GraphRow {
            hash,
            merge,
            node_column: column,
            parent_columns: parent_columns.keys().copied().collect(),
            is_head,
            is_root,
            incoming_edge: incoming,
            node_line,
            top_pad_lines,
            link_line: need_link_line.then_some(link_line),
            link_line_from_node: need_link_line.then_some(from_node),
            term_line: need_term_line.then_some(term_line),
            pad_lines,
        })
    }

    /// Fail when any lineage is still waiting for its row.
    pub fn finish(self) -> StrataResult<()> {
        let hashes: Vec<CommitHash> = self.columns.iter().filter_map(Column::hash).cloned().collect();
        if hashes.is_empty() {
            return Ok(());
        }
        tracing::error!(unresolved = hashes.len(), "Rendering finished with open columns");
        Err(RenderError::UnresolvedColumns { hashes }.into())
    }

    fn check_row(&self, hash: &CommitHash, parents: &[ParentEdge]) -> StrataResult<()> {
        if self.rendered.contains(hash) {
            tracing::error!(hash = %hash, "Duplicate row");
            return Err(RenderError::DuplicateRow { hash: hash.clone() }.into());
        }
        if let Some(parent) = parents
            .iter()
            .filter_map(ParentEdge::id)
            .find(|p| self.rendered.contains(*p))
        {
            tracing::error!(child = %hash, parent = %parent, "Parent rendered before child");
            return Err(RenderError::OrderViolation {
                child: hash.clone(),
                parent: parent.clone(),
            }
            .into());
        }
        let columns = self.columns.positions(hash);
        if columns.len() > 1 {
            tracing::error!(hash = %hash, ?columns, "Commit claimed by several columns");
            return Err(RenderError::ColumnConflict {
                hash: hash.clone(),
                columns,
            }
            .into());
        }
        Ok(())
    }
}
