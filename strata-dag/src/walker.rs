//! Subset-aware traversal feeding the layout engine.
//!
//! ```text
//! Dag + subset
//!     ↓
//! typed parents (Parent / Ancestor / Anonymous per rendered commit)
//!     ↓
//! sort_desc (children first, gap aware)
//!     ↓
//! [Reserve(first public)] Row, Row, ...
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use strata_core::{
    Commit, CommitHash, CommitSet, DagError, ParentEdge, RenderConfig, StrataResult,
};

use crate::Dag;

/// One step of the rendering walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WalkItem<'a> {
    /// Keep a column free for this commit until its row arrives.
    Reserve(CommitHash),
    /// Render `commit` with the given typed parent edges.
    Row {
        commit: &'a Commit,
        parents: Vec<ParentEdge>,
    },
}

/// Memo of "nearest rendered ancestors" for elided commits.
///
/// Scoped to one walk; the render set it was built for must not change.
#[derive(Debug, Default)]
pub struct NearestCache {
    nearest: HashMap<CommitHash, CommitSet>,
}

impl NearestCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Dag {
    /// Rendered commits reachable from the elided commit `start` without
    /// passing through another rendered commit.
    fn nearest_rendered(
        &self,
        start: &CommitHash,
        render_set: &CommitSet,
        cache: &mut NearestCache,
    ) -> StrataResult<CommitSet> {
        let mut in_progress: HashSet<CommitHash> = HashSet::new();
        let mut stack: Vec<(CommitHash, bool)> = vec![(start.clone(), false)];

        while let Some((hash, expanded)) = stack.pop() {
            if cache.nearest.contains_key(&hash) {
                continue;
            }
            if expanded {
                let mut found = CommitSet::new();
                for parent in self.parent_hashes(&hash) {
                    if render_set.contains(parent) {
                        found.insert(parent.clone());
                    } else if let Some(sub) = cache.nearest.get(parent) {
                        found.extend(sub.iter().cloned());
                    }
                }
                in_progress.remove(&hash);
                cache.nearest.insert(hash, found);
                continue;
            }

            if !in_progress.insert(hash.clone()) {
                return Err(DagError::CycleDetected {
                    remaining: in_progress.into_iter().collect(),
                }
                .into());
            }
            stack.push((hash.clone(), true));
            for parent in self.parent_hashes(&hash) {
                if self.contains(parent)
                    && !render_set.contains(parent)
                    && !cache.nearest.contains_key(parent)
                {
                    if in_progress.contains(parent) {
                        return Err(DagError::CycleDetected {
                            remaining: in_progress.into_iter().collect(),
                        }
                        .into());
                    }
                    stack.push((parent.clone(), false));
                }
            }
        }

        Ok(cache.nearest.get(start).cloned().unwrap_or_default())
    }

    /// Resolve the parents of `hash` against `render_set`.
    ///
    /// - rendered parent → `Parent`
    /// - parent not loaded → `Anonymous` (skipped with `ignore_anonymous`)
    /// - elided parent → `Ancestor` for each nearest rendered ancestor, or
    ///   `Anonymous` when the chain never reconnects
    ///
    /// Duplicate targets collapse with `Parent` winning, an `Ancestor`
    /// reachable through another listed target is dropped, and at most one
    /// `Anonymous` edge is kept.
    pub fn typed_parents(
        &self,
        hash: &CommitHash,
        render_set: &CommitSet,
        ignore_anonymous: bool,
        cache: &mut NearestCache,
    ) -> StrataResult<Vec<ParentEdge>> {
        let mut raw: Vec<ParentEdge> = Vec::new();
        for parent in self.parent_hashes(hash) {
            if render_set.contains(parent) {
                raw.push(ParentEdge::Parent(parent.clone()));
            } else if !self.contains(parent) {
                raw.push(ParentEdge::Anonymous);
            } else {
                let nearest = self.nearest_rendered(parent, render_set, cache)?;
                let heads = self.heads(&nearest);
                if heads.is_empty() {
                    raw.push(ParentEdge::Anonymous);
                } else {
                    raw.extend(heads.into_iter().map(ParentEdge::Ancestor));
                }
            }
        }

        let direct: CommitSet = raw
            .iter()
            .filter(|e| e.is_direct())
            .filter_map(|e| e.id().cloned())
            .collect();
        let targets: CommitSet = raw.iter().filter_map(|e| e.id().cloned()).collect();

        let mut seen = CommitSet::new();
        let mut has_anonymous = false;
        let mut edges = Vec::with_capacity(raw.len());
        for edge in raw {
            match &edge {
                ParentEdge::Parent(target) => {
                    if !seen.insert(target.clone()) {
                        continue;
                    }
                }
                ParentEdge::Ancestor(target) => {
                    if direct.contains(target) || !seen.insert(target.clone()) {
                        continue;
                    }
                    let redundant = targets.iter().filter(|t| *t != target).any(|other| {
                        self.ancestors(&CommitSet::from([other.clone()]))
                            .contains(target)
                    });
                    if redundant {
                        continue;
                    }
                }
                ParentEdge::Anonymous => {
                    if ignore_anonymous || has_anonymous {
                        continue;
                    }
                    has_anonymous = true;
                }
            }
            edges.push(edge);
        }
        Ok(edges)
    }

    /// Produce the reserve/row stream for rendering `subset` (or everything).
    ///
    /// Each rendered commit appears in exactly one `Row`, after every rendered
    /// commit that reaches it. With `reserve_public_column` the first public
    /// commit in that order gets a `Reserve` item up front.
    pub fn walk_for_rendering(
        &self,
        subset: Option<&CommitSet>,
        config: &RenderConfig,
    ) -> StrataResult<Vec<WalkItem<'_>>> {
        let render_set = match subset {
            Some(subset) => {
                if let Some(unknown) = subset.iter().find(|h| !self.contains(h)) {
                    return Err(DagError::UnknownCommit {
                        hash: unknown.clone(),
                    }
                    .into());
                }
                subset.clone()
            }
            None => self.all(),
        };

        let mut cache = NearestCache::new();
        let mut edges: BTreeMap<CommitHash, Vec<ParentEdge>> = BTreeMap::new();
        for hash in &render_set {
            let typed = self.typed_parents(
                hash,
                &render_set,
                config.ignore_anonymous_parents,
                &mut cache,
            )?;
            edges.insert(hash.clone(), typed);
        }

        let order = self.sort_desc(&render_set, &edges, config.tie_break)?;

        let mut items = Vec::with_capacity(order.len() + 1);
        if config.reserve_public_column {
            let first_public = order
                .iter()
                .filter_map(|h| self.get(h))
                .find(|c| c.is_public() && !c.is_you_are_here);
            if let Some(commit) = first_public {
                items.push(WalkItem::Reserve(commit.hash.clone()));
            }
        }

        for hash in order {
            let Some(commit) = self.get(&hash) else {
                return Err(DagError::UnknownCommit { hash }.into());
            };
            let parents = edges.remove(&hash).unwrap_or_default();
            items.push(WalkItem::Row { commit, parents });
        }

        tracing::debug!(
            rendered = render_set.len(),
            total = self.len(),
            elided_memo = cache.nearest.len(),
            "Computed rendering walk"
        );
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{commit_set, Phase, StrataError, TieBreak};

    fn config() -> RenderConfig {
        RenderConfig {
            tie_break: TieBreak::HashOrder,
            ..RenderConfig::default()
        }
    }

    fn rows<'a>(items: &'a [WalkItem<'a>]) -> Vec<(&'a str, &'a [ParentEdge])> {
        items
            .iter()
            .filter_map(|item| match item {
                WalkItem::Row { commit, parents } => {
                    Some((commit.hash.as_str(), parents.as_slice()))
                }
                WalkItem::Reserve(_) => None,
            })
            .collect()
    }

    fn chain() -> Dag {
        Dag::from_commits([
            Commit::new("A", Vec::<&str>::new()),
            Commit::new("B", ["A"]),
            Commit::new("C", ["B"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_full_walk_uses_direct_parents() {
        let dag = chain();
        let items = dag.walk_for_rendering(None, &config()).unwrap();
        assert_eq!(
            rows(&items),
            vec![
                ("C", &[ParentEdge::Parent("B".into())][..]),
                ("B", &[ParentEdge::Parent("A".into())][..]),
                ("A", &[][..]),
            ]
        );
    }

    #[test]
    fn test_elided_middle_becomes_ancestor_edge() {
        let dag = chain();
        let subset = commit_set(["A", "C"]);
        let items = dag.walk_for_rendering(Some(&subset), &config()).unwrap();
        assert_eq!(
            rows(&items),
            vec![
                ("C", &[ParentEdge::Ancestor("A".into())][..]),
                ("A", &[][..]),
            ]
        );
    }

    #[test]
    fn test_elided_chain_without_rendered_ancestor_is_anonymous() {
        let dag = chain();
        let subset = commit_set(["C"]);
        let items = dag.walk_for_rendering(Some(&subset), &config()).unwrap();
        assert_eq!(rows(&items), vec![("C", &[ParentEdge::Anonymous][..])]);
    }

    #[test]
    fn test_missing_parent_is_anonymous_unless_ignored() {
        let dag = Dag::from_commits([Commit::new("A", ["gone"])]).unwrap();
        let items = dag.walk_for_rendering(None, &config()).unwrap();
        assert_eq!(rows(&items), vec![("A", &[ParentEdge::Anonymous][..])]);

        let ignoring = RenderConfig {
            ignore_anonymous_parents: true,
            ..config()
        };
        let items = dag.walk_for_rendering(None, &ignoring).unwrap();
        assert_eq!(rows(&items), vec![("A", &[][..])]);
    }

    #[test]
    fn test_unknown_subset_member_rejected() {
        let dag = chain();
        let subset = commit_set(["A", "nope"]);
        let result = dag.walk_for_rendering(Some(&subset), &config());
        assert!(matches!(
            result,
            Err(StrataError::Dag(DagError::UnknownCommit { hash })) if hash.as_str() == "nope"
        ));
    }

    #[test]
    fn test_redundant_ancestor_edge_dropped() {
        //   D
        //   |\
        //   C x      (x elided, x -> A)
        //   |/
        //   A
        let dag = Dag::from_commits([
            Commit::new("A", Vec::<&str>::new()),
            Commit::new("C", ["A"]),
            Commit::new("x", ["A"]),
            Commit::new("D", ["C", "x"]),
        ])
        .unwrap();
        let subset = commit_set(["A", "C", "D"]);
        let mut cache = NearestCache::new();
        let edges = dag
            .typed_parents(&"D".into(), &subset, false, &mut cache)
            .unwrap();
        assert_eq!(edges, vec![ParentEdge::Parent("C".into())]);
    }

    #[test]
    fn test_elided_merge_yields_multiple_ancestors() {
        //   E
        //   |
        //   m      (elided merge of B and C)
        //   |\
        //   B C
        let dag = Dag::from_commits([
            Commit::new("B", Vec::<&str>::new()),
            Commit::new("C", Vec::<&str>::new()),
            Commit::new("m", ["B", "C"]),
            Commit::new("E", ["m"]),
        ])
        .unwrap();
        let subset = commit_set(["B", "C", "E"]);
        let mut cache = NearestCache::new();
        let edges = dag
            .typed_parents(&"E".into(), &subset, false, &mut cache)
            .unwrap();
        assert_eq!(
            edges,
            vec![
                ParentEdge::Ancestor("B".into()),
                ParentEdge::Ancestor("C".into())
            ]
        );
    }

    #[test]
    fn test_reserve_first_public_commit() {
        let dag = Dag::from_commits([
            Commit::new("P1", Vec::<&str>::new()).with_phase(Phase::Public),
            Commit::new("P2", ["P1"]).with_phase(Phase::Public),
            Commit::new("D1", ["P1"]),
        ])
        .unwrap();
        let items = dag.walk_for_rendering(None, &config()).unwrap();
        assert_eq!(items[0], WalkItem::Reserve("P2".into()));
        assert_eq!(items.len(), 4);

        let no_reserve = RenderConfig {
            reserve_public_column: false,
            ..config()
        };
        let items = dag.walk_for_rendering(None, &no_reserve).unwrap();
        assert!(matches!(items[0], WalkItem::Row { .. }));
    }

    #[test]
    fn test_you_are_here_precedes_its_parent() {
        let dag = Dag::from_commits([
            Commit::new("A", Vec::<&str>::new()).as_head(),
            Commit::you_are_here("yah", "A", "You are here"),
        ])
        .unwrap();
        let items = dag.walk_for_rendering(None, &config()).unwrap();
        let order: Vec<&str> = rows(&items).into_iter().map(|(h, _)| h).collect();
        assert_eq!(order, vec!["yah", "A"]);
    }

    #[test]
    fn test_cycle_through_elided_commits_detected() {
        let dag = Dag::from_commits([
            Commit::new("A", ["x"]),
            Commit::new("x", ["y"]),
            Commit::new("y", ["x"]),
        ])
        .unwrap();
        let subset = commit_set(["A"]);
        let result = dag.walk_for_rendering(Some(&subset), &config());
        assert!(matches!(
            result,
            Err(StrataError::Dag(DagError::CycleDetected { .. }))
        ));
    }
}
