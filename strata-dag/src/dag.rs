//! In-memory commit DAG.
//!
//! Holds commits keyed by hash plus a child index derived from the parent
//! lists. Parents that are not loaded are allowed; the walker turns them into
//! anonymous edges.

use std::collections::{BTreeMap, VecDeque};

use strata_core::{Commit, CommitHash, CommitSet, DagError, Phase, StrataResult};

/// Commit graph keyed by hash.
///
/// Backed by ordered maps so every query result iterates deterministically.
#[derive(Debug, Clone, Default)]
pub struct Dag {
    commits: BTreeMap<CommitHash, Commit>,
    /// parent -> children. "You are here" commits are not indexed.
    children: BTreeMap<CommitHash, CommitSet>,
}

impl Dag {
    /// Create a new empty DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a DAG from a batch of commits.
    pub fn from_commits<I>(commits: I) -> StrataResult<Self>
    where
        I: IntoIterator<Item = Commit>,
    {
        let mut dag = Self::new();
        for commit in commits {
            dag.add(commit)?;
        }
        Ok(dag)
    }

    /// Insert or replace a commit.
    pub fn add(&mut self, commit: Commit) -> StrataResult<()> {
        if commit.parents.contains(&commit.hash) {
            return Err(DagError::SelfParent { hash: commit.hash }.into());
        }
        self.unlink(&commit.hash);
        if !commit.is_you_are_here {
            for parent in &commit.parents {
                self.children
                    .entry(parent.clone())
                    .or_default()
                    .insert(commit.hash.clone());
            }
        }
        self.commits.insert(commit.hash.clone(), commit);
        Ok(())
    }

    /// Remove a commit, returning it if present.
    ///
    /// Children keep listing the removed hash as a parent; it becomes an
    /// anonymous parent from the renderer's point of view.
    pub fn remove(&mut self, hash: &CommitHash) -> Option<Commit> {
        self.unlink(hash);
        self.commits.remove(hash)
    }

    fn unlink(&mut self, hash: &CommitHash) {
        let Some(old) = self.commits.get(hash) else {
            return;
        };
        for parent in &old.parents {
            if let Some(children) = self.children.get_mut(parent) {
                children.remove(hash);
                if children.is_empty() {
                    self.children.remove(parent);
                }
            }
        }
    }

    pub fn get(&self, hash: &CommitHash) -> Option<&Commit> {
        self.commits.get(hash)
    }

    pub fn contains(&self, hash: &CommitHash) -> bool {
        self.commits.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Iterate commits in hash order.
    pub fn iter(&self) -> impl Iterator<Item = &Commit> {
        self.commits.values()
    }

    /// All loaded hashes.
    pub fn all(&self) -> CommitSet {
        self.commits.keys().cloned().collect()
    }

    /// Parent hashes as recorded on the commit, loaded or not.
    pub fn parent_hashes(&self, hash: &CommitHash) -> &[CommitHash] {
        self.commits
            .get(hash)
            .map(|c| c.parents.as_slice())
            .unwrap_or(&[])
    }

    /// Loaded children of a commit, excluding "you are here" annotations.
    pub fn children_of(&self, hash: &CommitHash) -> CommitSet {
        self.children
            .get(hash)
            .map(|children| {
                children
                    .iter()
                    .filter(|c| self.contains(c))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    // ========================================================================
    // SET ALGEBRA
    // ========================================================================

    /// Loaded parents of every member of `set`.
    pub fn parents(&self, set: &CommitSet) -> CommitSet {
        set.iter()
            .flat_map(|hash| self.parent_hashes(hash))
            .filter(|p| self.contains(p))
            .cloned()
            .collect()
    }

    /// Loaded children of every member of `set`.
    pub fn children(&self, set: &CommitSet) -> CommitSet {
        set.iter().flat_map(|hash| self.children_of(hash)).collect()
    }

    /// `set` plus everything reachable through parent edges.
    ///
    /// Only loaded commits are returned. "You are here" commits are walked
    /// through but never reported.
    pub fn ancestors(&self, set: &CommitSet) -> CommitSet {
        self.closure(set, |hash| self.parent_hashes(hash).to_vec())
    }

    /// `set` plus everything reachable through child edges.
    pub fn descendants(&self, set: &CommitSet) -> CommitSet {
        self.closure(set, |hash| self.children_of(hash).into_iter().collect())
    }

    fn closure<F>(&self, set: &CommitSet, next: F) -> CommitSet
    where
        F: Fn(&CommitHash) -> Vec<CommitHash>,
    {
        let mut seen = CommitSet::new();
        let mut queue: VecDeque<CommitHash> =
            set.iter().filter(|h| self.contains(h)).cloned().collect();
        while let Some(hash) = queue.pop_front() {
            if !seen.insert(hash.clone()) {
                continue;
            }
            for n in next(&hash) {
                if self.contains(&n) && !seen.contains(&n) {
                    queue.push_back(n);
                }
            }
        }
        seen.retain(|h| self.get(h).is_some_and(|c| !c.is_you_are_here));
        seen
    }

    /// Members of `set` that have no strict descendant inside `set`.
    ///
    /// Correct for any set, not only ancestor-closed ones.
    pub fn heads(&self, set: &CommitSet) -> CommitSet {
        let present: CommitSet = set.iter().filter(|h| self.contains(h)).cloned().collect();
        let below = self.ancestors(&self.parents(&present));
        present.difference(&below).cloned().collect()
    }

    /// Members of `set` that have no strict ancestor inside `set`.
    pub fn roots(&self, set: &CommitSet) -> CommitSet {
        let present: CommitSet = set.iter().filter(|h| self.contains(h)).cloned().collect();
        let above = self.descendants(&self.children(&present));
        present.difference(&above).cloned().collect()
    }

    pub fn public(&self) -> CommitSet {
        self.with_phase(Phase::Public)
    }

    pub fn draft(&self) -> CommitSet {
        self.with_phase(Phase::Draft)
    }

    fn with_phase(&self, phase: Phase) -> CommitSet {
        self.commits
            .values()
            .filter(|c| c.phase == phase && !c.is_you_are_here)
            .map(|c| c.hash.clone())
            .collect()
    }

    /// Commits flagged as the working copy parent.
    pub fn head_commits(&self) -> CommitSet {
        self.commits
            .values()
            .filter(|c| c.is_head)
            .map(|c| c.hash.clone())
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
