// src/explorer.rs

use crate::error::Result;
use crate::model::{BranchHead, Commit, CommitId, Depth, Revision, WorkingSet};
use crate::propagate::Propagator;
use crate::reader::HistoryReader;
use indicatif::ProgressBar;
use std::collections::VecDeque;
use tracing::debug;

/// Counters from one exploration
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExploreStats {
    /// Branch heads whose walk was started
    pub branch_walks: usize,
    /// Branch heads dropped because they start past the horizon
    pub dropped_branch_heads: usize,
    /// Depth values raised by propagation while exploring
    pub raised: usize,
}

/// Discovers the commits reachable from a start commit.
///
/// History is only ever read along first-parent chains. Every other parent
/// becomes a branch head that is walked later, in the order it was found,
/// until the walk runs into a commit that is already known.
pub struct Explorer<'a, R: HistoryReader + ?Sized> {
    reader: &'a R,
    propagator: &'a Propagator,
    horizon: Depth,
    frontier: VecDeque<BranchHead>,
    progress: ProgressBar,
    stats: ExploreStats,
}

impl<'a, R: HistoryReader + ?Sized> Explorer<'a, R> {
    pub fn new(reader: &'a R, propagator: &'a Propagator, horizon: Depth) -> Self {
        Self {
            reader,
            propagator,
            horizon,
            frontier: VecDeque::new(),
            progress: ProgressBar::hidden(),
            stats: ExploreStats::default(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Walks the mainline from `start`, then drains the frontier.
    pub fn run(mut self, set: &mut WorkingSet, start: CommitId) -> Result<ExploreStats> {
        self.progress.set_message("Walking mainline");
        self.walk(set, start, 0)?;
        debug!(commits = set.len(), queued = self.frontier.len(), "mainline walked");

        self.progress.set_message("Exploring branches");
        while let Some(branch) = self.frontier.pop_front() {
            let Some(origin_depth) = set.depth(&branch.origin) else { continue };
            let depth = origin_depth + 1;

            if set.contains(&branch.head) {
                self.stats.raised += self.propagator.propagate(set, branch.head, depth)?;
                continue;
            }
            if depth > self.horizon {
                self.stats.dropped_branch_heads += 1;
                continue;
            }

            debug!(head = %branch.head, origin = %branch.origin, depth, "walking branch");
            self.walk(set, branch.head, depth)?;
            self.stats.branch_walks += 1;
            self.progress.inc(1);
        }

        self.progress.finish_with_message("Exploration complete");
        Ok(self.stats)
    }

    fn walk(&mut self, set: &mut WorkingSet, start: CommitId, start_depth: Depth) -> Result<()> {
        let reader = self.reader;
        for (offset, commit) in reader.first_parent_walk(start)?.enumerate() {
            let commit = commit?;
            let depth = start_depth + offset;
            if set.contains(&commit.id) {
                // reconverged with known history
                self.stats.raised += self.propagator.propagate(set, commit.id, depth)?;
                break;
            }
            self.discover(set, commit, depth)?;
        }
        Ok(())
    }

    fn discover(&mut self, set: &mut WorkingSet, commit: Commit, depth: Depth) -> Result<()> {
        for &parent in commit.parent_ids.iter().skip(1) {
            if set.contains(&parent) {
                self.stats.raised += self.propagator.propagate(set, parent, depth + 1)?;
            } else if depth < self.horizon {
                self.frontier.push_back(BranchHead {
                    head: parent,
                    origin: commit.id,
                });
            } else {
                self.stats.dropped_branch_heads += 1;
            }
        }
        set.insert(Revision::new(commit, depth));
        Ok(())
    }
}
