// src/reader.rs

use crate::error::{Error, Result};
use crate::model::{Commit, CommitId};
use chrono::{DateTime, Utc};
use git2::Repository;
use std::collections::HashMap;
use std::path::Path;

/// Commits along a first-parent chain, head first
pub type FirstParentWalk<'a> = Box<dyn Iterator<Item = Result<Commit>> + 'a>;

/// Read access to commit history.
///
/// A walk is lazy and single-use: callers stop pulling as soon as the chain
/// reconverges with history they already know.
pub trait HistoryReader {
    fn head(&self) -> Result<CommitId>;

    /// Commits from `start` following only first parents, ending at a root.
    fn first_parent_walk(&self, start: CommitId) -> Result<FirstParentWalk<'_>>;
}

/// History read from a git repository on disk
pub struct GitReader {
    repo: Repository,
}

impl GitReader {
    /// Opens the repository at `repo_path` or the nearest one above it.
    pub fn open(repo_path: &Path) -> Result<Self> {
        let repo = Repository::discover(repo_path)?;
        Ok(Self { repo })
    }

    /// Resolves a revision expression (`main`, `HEAD~3`, a hash) to a commit.
    pub fn resolve(&self, revspec: &str) -> Result<CommitId> {
        let commit = self.repo.revparse_single(revspec)?.peel_to_commit()?;
        Ok(commit.id())
    }

    pub fn commit_time(&self, id: CommitId) -> Result<Option<DateTime<Utc>>> {
        let time = self.repo.find_commit(id)?.time();
        Ok(DateTime::from_timestamp(time.seconds(), 0))
    }
}

impl HistoryReader for GitReader {
    fn head(&self) -> Result<CommitId> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id())
    }

    fn first_parent_walk(&self, start: CommitId) -> Result<FirstParentWalk<'_>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(start)?;
        revwalk.simplify_first_parent()?;

        let repo = &self.repo;
        Ok(Box::new(revwalk.map(move |oid| -> Result<Commit> {
            let commit = repo.find_commit(oid?)?;
            Ok(Commit::from(&commit))
        })))
    }
}

/// History held in memory, for tests and for callers that already have
/// the commit graph at hand.
#[derive(Debug, Default, Clone)]
pub struct MemoryHistory {
    head: Option<CommitId>,
    commits: HashMap<CommitId, Commit>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_head(mut self, head: CommitId) -> Self {
        self.head = Some(head);
        self
    }

    pub fn insert(&mut self, id: CommitId, parent_ids: Vec<CommitId>) -> &mut Self {
        self.commits.insert(id, Commit::new(id, parent_ids));
        self
    }
}

impl HistoryReader for MemoryHistory {
    fn head(&self) -> Result<CommitId> {
        self.head.ok_or(Error::EmptyHistory)
    }

    fn first_parent_walk(&self, start: CommitId) -> Result<FirstParentWalk<'_>> {
        if !self.commits.contains_key(&start) {
            return Err(Error::MissingCommit(start));
        }
        Ok(Box::new(MemoryWalk {
            history: self,
            next: Some(start),
        }))
    }
}

struct MemoryWalk<'a> {
    history: &'a MemoryHistory,
    next: Option<CommitId>,
}

impl Iterator for MemoryWalk<'_> {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        match self.history.commits.get(&id) {
            Some(commit) => {
                self.next = commit.parent_ids.first().copied();
                Some(Ok(commit.clone()))
            }
            None => Some(Err(Error::MissingCommit(id))),
        }
    }
}

/// Deterministic commit id for small test graphs
#[cfg(test)]
pub(crate) fn oid(n: u64) -> CommitId {
    CommitId::from_str(&format!("{n:040x}")).unwrap()
}

/// Builds a history from `(commit, parents)` pairs, commits named by number.
#[cfg(test)]
pub(crate) fn history(head: u64, commits: &[(u64, &[u64])]) -> MemoryHistory {
    let mut history = MemoryHistory::new().with_head(oid(head));
    for (id, parents) in commits {
        history.insert(oid(*id), parents.iter().map(|p| oid(*p)).collect());
    }
    history
}
