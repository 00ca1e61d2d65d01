//! Children-before-parents ordering for rendering.
//!
//! The order is computed over the gap-aware graph (typed parent edges), so a
//! commit is emitted before any rendered ancestor it reaches through elided
//! commits, not only before its direct parents.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use strata_core::{
    CommitHash, CommitSet, DagError, ParentEdge, StrataResult, TieBreak, Timestamp,
};

use crate::Dag;

/// Priority of a commit whose children have all been emitted.
/// Smallest key is emitted first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ReadyKey {
    recency: Reverse<Option<Timestamp>>,
    hash: CommitHash,
}

impl Dag {
    /// Sort `set` so children come before parents.
    ///
    /// `edges` maps every member of `set` to its typed parents (targets outside
    /// `set` are ignored). Among ready commits the first edge target of the
    /// commit just emitted wins, which keeps a line of descent contiguous;
    /// otherwise `tie_break` decides.
    pub fn sort_desc(
        &self,
        set: &CommitSet,
        edges: &BTreeMap<CommitHash, Vec<ParentEdge>>,
        tie_break: TieBreak,
    ) -> StrataResult<Vec<CommitHash>> {
        let key_of = |hash: &CommitHash| ReadyKey {
            recency: Reverse(match tie_break {
                TieBreak::NewestFirst => self.get(hash).and_then(|c| c.date),
                TieBreak::HashOrder => None,
            }),
            hash: hash.clone(),
        };

        let mut pending: HashMap<&CommitHash, usize> = set.iter().map(|h| (h, 0)).collect();
        for hash in set {
            for target in edge_targets(edges, set, hash) {
                if let Some(count) = pending.get_mut(target) {
                    *count += 1;
                }
            }
        }

        let mut ready: BTreeSet<ReadyKey> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(hash, _)| key_of(*hash))
            .collect();

        let mut order = Vec::with_capacity(set.len());
        let mut preferred: Option<ReadyKey> = None;
        loop {
            let next = match preferred.take() {
                Some(key) if ready.remove(&key) => key,
                _ => match ready.pop_first() {
                    Some(key) => key,
                    None => break,
                },
            };

            let targets = edge_targets(edges, set, &next.hash);
            for target in &targets {
                if let Some(count) = pending.get_mut(*target) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(key_of(*target));
                    }
                }
            }
            preferred = targets.first().map(|t| key_of(*t));
            order.push(next.hash);
        }

        if order.len() < set.len() {
            let emitted: BTreeSet<&CommitHash> = order.iter().collect();
            let remaining: Vec<CommitHash> = set
                .iter()
                .filter(|h| !emitted.contains(h))
                .cloned()
                .collect();
            tracing::error!(remaining = remaining.len(), "Cycle detected while ordering commits");
            return Err(DagError::CycleDetected { remaining }.into());
        }

        Ok(order)
    }
}

/// Distinct edge targets of `hash` that are members of `set`, in edge order.
fn edge_targets<'a>(
    edges: &'a BTreeMap<CommitHash, Vec<ParentEdge>>,
    set: &CommitSet,
    hash: &CommitHash,
) -> Vec<&'a CommitHash> {
    let mut seen = BTreeSet::new();
    edges
        .get(hash)
        .into_iter()
        .flatten()
        .filter_map(ParentEdge::id)
        .filter(|t| set.contains(*t) && seen.insert(*t))
        .collect()
}
