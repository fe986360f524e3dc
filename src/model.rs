// src/model.rs

use std::collections::HashMap;

/// Uniquely identifies a commit
pub type CommitId = git2::Oid;

/// Layout rank of a commit, 0 at the starting head
pub type Depth = usize;

/// Branch lane of a commit
pub type Lane = usize;

/// The lane reserved for the first-parent chain from the head
pub const MAINLINE: Lane = 0;

/// A commit as handed out by a history reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: CommitId,
    /// Index 0 is the first (mainline) parent, the rest are merge sources
    pub parent_ids: Vec<CommitId>,
}

impl Commit {
    pub fn new(id: CommitId, parent_ids: Vec<CommitId>) -> Self {
        Self { id, parent_ids }
    }
}

impl From<&git2::Commit<'_>> for Commit {
    fn from(commit: &git2::Commit<'_>) -> Self {
        Self {
            id: commit.id(),
            parent_ids: commit.parent_ids().collect(),
        }
    }
}

/// A commit together with its layout attributes
#[derive(Debug, Clone)]
pub struct Revision {
    pub commit: Commit,
    pub depth: Depth,
    /// Unset until lanes are partitioned
    pub branch: Option<Lane>,
}

impl Revision {
    pub fn new(commit: Commit, depth: Depth) -> Self {
        Self { commit, depth, branch: None }
    }

    pub fn id(&self) -> CommitId {
        self.commit.id
    }

    pub fn parent_ids(&self) -> &[CommitId] {
        &self.commit.parent_ids
    }

    pub fn first_parent(&self) -> Option<CommitId> {
        self.commit.parent_ids.first().copied()
    }

    pub fn is_merge(&self) -> bool {
        self.commit.parent_ids.len() > 1
    }
}

/// A non-first parent waiting to be explored, with the commit it was seen from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchHead {
    pub head: CommitId,
    pub origin: CommitId,
}

/// All revisions known to one layout run.
///
/// Iteration follows discovery order, so every pass over the whole set
/// visits commits in the same order on every run.
#[derive(Debug, Default, Clone)]
pub struct WorkingSet {
    revisions: HashMap<CommitId, Revision>,
    order: Vec<CommitId>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    pub fn contains(&self, id: &CommitId) -> bool {
        self.revisions.contains_key(id)
    }

    pub fn get(&self, id: &CommitId) -> Option<&Revision> {
        self.revisions.get(id)
    }

    pub fn get_mut(&mut self, id: &CommitId) -> Option<&mut Revision> {
        self.revisions.get_mut(id)
    }

    pub fn depth(&self, id: &CommitId) -> Option<Depth> {
        self.revisions.get(id).map(|rev| rev.depth)
    }

    /// Adds a revision unless its commit is already known.
    /// Returns whether it was added.
    pub fn insert(&mut self, revision: Revision) -> bool {
        let id = revision.id();
        if self.revisions.contains_key(&id) {
            return false;
        }
        self.order.push(id);
        self.revisions.insert(id, revision);
        true
    }

    /// Commit ids in discovery order
    pub fn ids(&self) -> &[CommitId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &Revision> + '_ {
        self.order.iter().filter_map(|id| self.revisions.get(id))
    }

    pub fn max_depth(&self) -> Option<Depth> {
        self.revisions.values().map(|rev| rev.depth).max()
    }

    /// Removes every revision deeper than `horizon` and returns their ids
    /// in discovery order.
    pub fn prune_beyond(&mut self, horizon: Depth) -> Vec<CommitId> {
        let revisions = &mut self.revisions;
        let mut removed = Vec::new();
        self.order.retain(|id| {
            let keep = revisions.get(id).map_or(false, |rev| rev.depth <= horizon);
            if !keep {
                revisions.remove(id);
                removed.push(*id);
            }
            keep
        });
        removed
    }
}
