//! Strata Test Utilities
//!
//! Shared test infrastructure for the strata workspace:
//! - Proptest generators for DAGs and subsets
//! - Fixtures for common graph shapes
//! - Assertions over rendered rows

// Re-export core types for convenience
pub use strata_core::{
    commit_set, Commit, CommitHash, CommitSet, ConfigError, DagError, EdgeKind, ParentEdge,
    Phase, RenderConfig, RenderError, StrataError, StrataResult, TieBreak, Timestamp,
};
pub use strata_dag::Dag;
pub use strata_render::{GraphRow, LinkLine, NodeLine, PadLine};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for commit graphs.

    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use proptest::sample::Index;

    /// Shape of one generated commit.
    #[derive(Debug, Clone)]
    struct CommitPlan {
        parent_count: usize,
        first: Index,
        second: Index,
        missing_parent: bool,
        public: bool,
        date: Option<i64>,
    }

    fn arb_commit_plan() -> impl Strategy<Value = CommitPlan> {
        (
            prop_oneof![3 => Just(1usize), 1 => Just(2usize), 1 => Just(0usize)],
            any::<Index>(),
            any::<Index>(),
            prop::bool::weighted(0.05),
            prop::bool::weighted(0.3),
            prop::option::of(1577836800i64..1893456000i64),
        )
            .prop_map(|(parent_count, first, second, missing_parent, public, date)| {
                CommitPlan {
                    parent_count,
                    first,
                    second,
                    missing_parent,
                    public,
                    date,
                }
            })
    }

    /// Generate a Timestamp between 2020 and 2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    /// Generate an acyclic DAG of up to `max_commits` commits.
    ///
    /// Commit `c{i}` only points at commits with a smaller index, so the
    /// graph never has a cycle. A few commits reference parents that are not
    /// loaded, and optionally a "you are here" commit sits on one of them.
    pub fn arb_dag_sized(max_commits: usize) -> impl Strategy<Value = Dag> {
        (
            prop::collection::vec(arb_commit_plan(), 1..=max_commits.max(1)),
            prop::option::of(any::<Index>()),
        )
            .prop_map(|(plans, you_are_here)| build_dag(&plans, you_are_here))
    }

    /// Generate an acyclic DAG of up to 30 commits.
    pub fn arb_dag() -> impl Strategy<Value = Dag> {
        arb_dag_sized(30)
    }

    /// Generate a subset of the commits in `dag`.
    pub fn arb_subset(dag: &Dag) -> impl Strategy<Value = CommitSet> {
        let hashes: Vec<CommitHash> = dag.all().into_iter().collect();
        let len = hashes.len();
        prop::sample::subsequence(hashes, 0..=len).prop_map(|v| v.into_iter().collect())
    }

    /// Generate a DAG together with a subset of it.
    pub fn arb_dag_with_subset() -> impl Strategy<Value = (Dag, CommitSet)> {
        arb_dag().prop_flat_map(|dag| {
            let subset = arb_subset(&dag);
            (Just(dag), subset)
        })
    }

    /// Generate a render configuration.
    pub fn arb_render_config() -> impl Strategy<Value = RenderConfig> {
        (
            any::<bool>(),
            any::<bool>(),
            prop_oneof![Just(TieBreak::NewestFirst), Just(TieBreak::HashOrder)],
        )
            .prop_map(
                |(reserve_public_column, ignore_anonymous_parents, tie_break)| RenderConfig {
                    reserve_public_column,
                    ignore_anonymous_parents,
                    tie_break,
                },
            )
    }

    fn build_dag(plans: &[CommitPlan], you_are_here: Option<Index>) -> Dag {
        let mut commits = Vec::with_capacity(plans.len() + 1);
        for (i, plan) in plans.iter().enumerate() {
            let mut parents: Vec<CommitHash> = Vec::new();
            if i > 0 {
                for pick in [&plan.first, &plan.second].into_iter().take(plan.parent_count) {
                    let parent = CommitHash::new(format!("c{}", pick.index(i)));
                    if !parents.contains(&parent) {
                        parents.push(parent);
                    }
                }
            }
            if plan.missing_parent {
                parents.push(CommitHash::new(format!("gone{}", i)));
            }
            let mut commit = Commit::new(format!("c{}", i), parents)
                .with_description(format!("commit {}", i));
            if plan.public {
                commit = commit.with_phase(Phase::Public);
            }
            if let Some(date) = plan.date.and_then(|secs| chrono::DateTime::from_timestamp(secs, 0)) {
                commit = commit.with_date(date);
            }
            commits.push(commit);
        }
        if let Some(index) = you_are_here {
            let target = format!("c{}", index.index(plans.len()));
            if let Some(head) = commits.iter_mut().find(|c| c.hash.as_str() == target) {
                head.is_head = true;
            }
            commits.push(Commit::you_are_here("you-are-here", target, "You are here"));
        }
        // Parents always precede their children here, so insertion cannot
        // fail on self-parents.
        Dag::from_commits(commits).unwrap_or_default()
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built graphs for common testing scenarios.

    use super::*;

    /// Build a DAG from `(hash, parents)` pairs.
    pub fn dag_from_edges(edges: &[(&str, &[&str])]) -> Dag {
        let commits = edges
            .iter()
            .map(|(hash, parents)| Commit::new(*hash, parents.iter().copied()));
        Dag::from_commits(commits).unwrap_or_default()
    }

    /// `c0 <- c1 <- ... <- c{len-1}`.
    pub fn linear_chain(len: usize) -> Dag {
        let commits = (0..len).map(|i| {
            let parents: Vec<String> = if i == 0 {
                Vec::new()
            } else {
                vec![format!("c{}", i - 1)]
            };
            Commit::new(format!("c{}", i), parents)
        });
        Dag::from_commits(commits).unwrap_or_default()
    }

    /// `A`, `B(A)`, `C(A)`.
    pub fn fork() -> Dag {
        dag_from_edges(&[("A", &[]), ("B", &["A"]), ("C", &["A"])])
    }

    /// `A`, `B(A)`, `C(A)`, `D(B, C)`.
    pub fn diamond() -> Dag {
        dag_from_edges(&[("A", &[]), ("B", &["A"]), ("C", &["A"]), ("D", &["B", "C"])])
    }

    /// A public trunk `P1 <- P2 <- P3` with a draft stack `D1 <- D2` on P1
    /// and a "you are here" marker on D2.
    pub fn stack_on_trunk() -> Dag {
        let commits = [
            Commit::new("P1", Vec::<&str>::new()).with_phase(Phase::Public),
            Commit::new("P2", ["P1"]).with_phase(Phase::Public),
            Commit::new("P3", ["P2"]).with_phase(Phase::Public),
            Commit::new("D1", ["P1"]).with_description("first draft"),
            Commit::new("D2", ["D1"]).with_description("second draft").as_head(),
            Commit::you_are_here("yah", "D2", "You are here"),
        ];
        Dag::from_commits(commits).unwrap_or_default()
    }

    /// Config with deterministic hash-order tie breaking.
    pub fn hash_order_config() -> RenderConfig {
        RenderConfig {
            tie_break: TieBreak::HashOrder,
            ..RenderConfig::default()
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over layouts and results.

    use super::*;
    use std::collections::BTreeSet;

    /// Assert that a StrataResult is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &StrataResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a StrataResult is a DAG error.
    #[track_caller]
    pub fn assert_dag_error<T: std::fmt::Debug>(result: &StrataResult<T>) {
        match result {
            Err(StrataError::Dag(_)) => {}
            other => panic!("Expected Dag error, got: {:?}", other),
        }
    }

    /// Assert that a StrataResult is a render error.
    #[track_caller]
    pub fn assert_render_error<T: std::fmt::Debug>(result: &StrataResult<T>) {
        match result {
            Err(StrataError::Render(_)) => {}
            other => panic!("Expected Render error, got: {:?}", other),
        }
    }

    /// Assert that `rows` render exactly the commits in `expected`, once each.
    #[track_caller]
    pub fn assert_rows_cover(rows: &[GraphRow], expected: &CommitSet) {
        let mut seen = BTreeSet::new();
        for row in rows {
            assert!(seen.insert(&row.hash), "Commit {} rendered twice", row.hash);
        }
        let seen: CommitSet = seen.into_iter().cloned().collect();
        assert_eq!(&seen, expected, "Rendered commits differ from the expected set");
    }

    /// Assert the structural invariants of a finished layout.
    ///
    /// Per row: equal line widths, exactly one node inside the width,
    /// ascending in-range parent columns, consistent merge/root flags,
    /// highlight bits within the link line, terminators only on parent
    /// columns. Across rows: every column carried by a pad line shows up
    /// with the same kind in the next node line, and nothing is carried past
    /// the last row.
    #[track_caller]
    pub fn assert_rows_well_formed(rows: &[GraphRow]) {
        let mut carried: Vec<PadLine> = Vec::new();
        for row in rows {
            let width = row.width();
            let hash = &row.hash;
            assert_eq!(row.top_pad_lines.len(), width, "top pad width of {}", hash);
            assert_eq!(row.pad_lines.len(), width, "pad width of {}", hash);
            assert!(row.node_column < width, "node column of {} out of range", hash);
            assert_eq!(row.node_line[row.node_column], NodeLine::Node);
            assert_eq!(
                row.node_line.iter().filter(|l| **l == NodeLine::Node).count(),
                1,
                "row {} has more than one node",
                hash
            );

            assert!(
                row.parent_columns.windows(2).all(|w| w[0] < w[1]),
                "parent columns of {} not ascending",
                hash
            );
            assert!(row.parent_columns.iter().all(|c| *c < width));
            assert_eq!(row.is_root, row.parent_columns.is_empty(), "root flag of {}", hash);
            assert_eq!(row.merge, row.parent_columns.len() > 1, "merge flag of {}", hash);

            match (&row.link_line, &row.link_line_from_node) {
                (Some(link), Some(from_node)) => {
                    assert_eq!(link.len(), width);
                    assert_eq!(from_node.len(), width);
                    for (all, own) in link.iter().zip(from_node) {
                        assert!(all.contains(*own), "highlight outside link line in {}", hash);
                    }
                    if row.merge {
                        assert!(
                            link[row.node_column].intersects(LinkLine::ANY_MERGE),
                            "merge row {} lacks a merge shape",
                            hash
                        );
                    }
                }
                (None, None) => assert!(!row.merge, "merge row {} without link line", hash),
                _ => panic!("link line and highlight disagree in {}", hash),
            }

            if let Some(term) = &row.term_line {
                assert_eq!(term.len(), width);
                for (i, is_term) in term.iter().enumerate() {
                    if *is_term {
                        assert!(row.parent_columns.contains(&i));
                    }
                }
            }

            if row.is_root {
                assert_eq!(row.pad_lines[row.node_column], PadLine::Blank);
                assert_eq!(row.top_pad_lines[row.node_column], PadLine::Blank);
            }

            // Continuity with the previous row.
            for (i, line) in row.node_line.iter().enumerate() {
                let above = carried.get(i).copied().unwrap_or_default();
                if i == row.node_column {
                    let expected = match row.incoming_edge {
                        Some(kind) => PadLine::from_kind(kind),
                        None => PadLine::Blank,
                    };
                    assert_eq!(above, expected, "incoming edge of {}", hash);
                    continue;
                }
                let shown = match line {
                    NodeLine::Parent => PadLine::Parent,
                    NodeLine::Ancestor => PadLine::Ancestor,
                    _ => PadLine::Blank,
                };
                assert_eq!(above, shown, "column {} broken above {}", i, hash);
            }
            assert!(
                carried.iter().skip(width).all(|l| l.is_blank()),
                "row {} drops a carried column",
                hash
            );
            assert_eq!(row.is_head, row.incoming_edge.is_none());

            carried = row.pad_lines.clone();
        }
        assert!(
            carried.iter().all(|l| l.is_blank()),
            "edges carried past the last row"
        );
    }
}
