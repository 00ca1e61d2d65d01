//! Strata Render - commit graph layout engine
//!
//! Turns the walk produced by [`Dag::walk_for_rendering`] into one
//! [`GraphRow`] per commit: the node column, the columns carried to the
//! next row, and bitmask descriptions of every edge shape in between.
//! [`TextRenderer`] and the tile functions are two consumers of those rows.

mod column;
mod digest;
mod line;
mod renderer;
mod text;
mod tile;

pub use column::{Column, ColumnsExt};
pub use digest::LayoutDigest;
pub use line::{LinkLine, NodeLine, PadLine};
pub use renderer::{GraphRow, Renderer, RowOptions};
pub use text::TextRenderer;
pub use tile::{
    link_tile_edges, node_tile_edges, pad_tile_edges, term_tile_edges, EdgeFlag, RowTiles,
    TermMark, TileEdge, TILE_EXTENT,
};

use strata_core::{CommitSet, RenderConfig, StrataResult};
use strata_dag::{Dag, WalkItem};

/// Lay out `dag`, or only `subset` of it, top to bottom.
///
/// "You are here" commits are forced into the last column.
pub fn render_dag(
    dag: &Dag,
    subset: Option<&CommitSet>,
    config: &RenderConfig,
) -> StrataResult<Vec<GraphRow>> {
    config.validate()?;
    let walk = dag.walk_for_rendering(subset, config)?;

    let mut renderer = Renderer::new();
    let mut rows = Vec::with_capacity(walk.len());
    let mut width = 0;
    for item in walk {
        match item {
            WalkItem::Reserve(hash) => renderer.reserve(hash),
            WalkItem::Row { commit, parents } => {
                let options = RowOptions {
                    force_last_column: commit.is_you_are_here,
                };
                let row = renderer.next_row(commit.hash.clone(), parents, options)?;
                width = width.max(row.width());
                rows.push(row);
            }
        }
    }
    renderer.finish()?;

    tracing::debug!(rows = rows.len(), width, "Rendered commit graph");
    Ok(rows)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{commit_set, Commit, EdgeKind, Phase, TieBreak};

    fn config() -> RenderConfig {
        RenderConfig {
            tie_break: TieBreak::HashOrder,
            ..RenderConfig::default()
        }
    }

    fn order(rows: &[GraphRow]) -> Vec<&str> {
        rows.iter().map(|r| r.hash.as_str()).collect()
    }

    #[test]
    fn test_fork_scenario() {
        let dag = Dag::from_commits([
            Commit::new("A", Vec::<&str>::new()),
            Commit::new("B", ["A"]),
            Commit::new("C", ["A"]),
        ])
        .unwrap();
        let rows = render_dag(&dag, None, &config()).unwrap();
        assert_eq!(order(&rows), vec!["B", "C", "A"]);
        assert_ne!(rows[0].node_column, rows[1].node_column);
        let fork = rows[1].link_line.as_ref().unwrap();
        assert!(fork[rows[0].node_column].contains(LinkLine::RIGHT_FORK_PARENT));
        assert_eq!(rows[2].node_column, rows[0].node_column);
        assert!(rows[2].is_root);
    }

    #[test]
    fn test_subset_scenario() {
        let dag = Dag::from_commits([
            Commit::new("A", Vec::<&str>::new()),
            Commit::new("B", ["A"]),
            Commit::new("C", ["B"]),
        ])
        .unwrap();
        let subset = commit_set(["A", "C"]);
        let rows = render_dag(&dag, Some(&subset), &config()).unwrap();
        assert_eq!(order(&rows), vec!["C", "A"]);
        assert_eq!(rows[0].pad_lines, vec![PadLine::Ancestor]);
        assert_eq!(rows[1].incoming_edge, Some(EdgeKind::Ancestor));
        assert!(rows.iter().all(|r| r.term_line.is_none()));
    }

    #[test]
    fn test_public_column_reserved() {
        //   D2
        //   |
        //   D1  P2
        //    \  |
        //      P1
        let dag = Dag::from_commits([
            Commit::new("P1", Vec::<&str>::new()).with_phase(Phase::Public),
            Commit::new("P2", ["P1"]).with_phase(Phase::Public),
            Commit::new("D1", ["P1"]),
            Commit::new("D2", ["D1"]),
        ])
        .unwrap();
        let rows = render_dag(&dag, None, &config()).unwrap();
        let p2 = rows.iter().find(|r| r.hash.as_str() == "P2").unwrap();
        let d2 = rows.iter().find(|r| r.hash.as_str() == "D2").unwrap();
        assert_eq!(p2.node_column, 0);
        assert_eq!(d2.node_column, 1);
    }

    #[test]
    fn test_you_are_here_takes_last_column() {
        let dag = Dag::from_commits([
            Commit::new("A", Vec::<&str>::new()),
            Commit::new("B", ["A"]),
            Commit::new("C", ["A"]).as_head(),
            Commit::you_are_here("yah", "C", "You are here"),
        ])
        .unwrap();
        let rows = render_dag(&dag, None, &config()).unwrap();
        let yah = rows.iter().find(|r| r.hash.as_str() == "yah").unwrap();
        // B's lineage holds column 0 when the pseudo-commit arrives.
        assert_eq!(order(&rows), vec!["B", "yah", "C", "A"]);
        assert_eq!(yah.node_column, 1);
        assert!(yah.is_head);
        assert_eq!(yah.node_line, vec![NodeLine::Parent, NodeLine::Node]);
    }

    #[test]
    fn test_invalid_subset_is_error() {
        let dag = Dag::from_commits([Commit::new("A", Vec::<&str>::new())]).unwrap();
        let subset = commit_set(["missing"]);
        assert!(render_dag(&dag, Some(&subset), &config()).is_err());
    }

    #[test]
    fn test_empty_dag_renders_nothing() {
        let rows = render_dag(&Dag::new(), None, &config()).unwrap();
        assert!(rows.is_empty());
    }
}
