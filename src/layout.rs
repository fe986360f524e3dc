// src/layout.rs

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::explorer::Explorer;
use crate::lanes::Partitioner;
use crate::model::{CommitId, Depth, Lane, Revision, WorkingSet};
use crate::propagate::Propagator;
use crate::reader::HistoryReader;
use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{debug, info};

/// Sizes of the commit set at each stage of a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LayoutStats {
    /// Commits discovered, before horizon pruning
    pub explored: usize,
    pub explored_max_depth: Option<Depth>,
    /// Commits kept after pruning
    pub retained: usize,
    pub retained_max_depth: Option<Depth>,
    pub pruned: usize,
    pub dropped_branch_heads: usize,
    pub branch_walks: usize,
    /// Depth values raised by relaxation over the whole run
    pub raised: usize,
    /// Lanes handed out, the mainline included
    pub lanes: usize,
}

/// Depth and lane for every commit within the horizon
#[derive(Debug, Clone)]
pub struct Layout {
    pub head: CommitId,
    pub revisions: WorkingSet,
    /// Commits that ended up without a lane, in discovery order
    pub unassigned: Vec<CommitId>,
    pub stats: LayoutStats,
}

impl Layout {
    pub fn get(&self, id: &CommitId) -> Option<&Revision> {
        self.revisions.get(id)
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// The first-parent chain from the head, as far as it was kept
    pub fn mainline(&self) -> Vec<CommitId> {
        let mut chain = Vec::new();
        let mut next = Some(self.head);
        while let Some(rev) = next.and_then(|id| self.revisions.get(&id)) {
            chain.push(rev.id());
            next = rev.first_parent();
        }
        chain
    }

    /// Commits of one lane, shallowest first
    pub fn lane(&self, lane: Lane) -> Vec<&Revision> {
        let mut members: Vec<&Revision> = self
            .revisions
            .iter()
            .filter(|rev| rev.branch == Some(lane))
            .collect();
        members.sort_by_key(|rev| rev.depth);
        members
    }

    /// All commits ordered for drawing: by depth, then lane, then discovery.
    /// Commits without a lane come last within their depth.
    pub fn rows(&self) -> Vec<&Revision> {
        let mut rows: Vec<&Revision> = self.revisions.iter().collect();
        rows.sort_by_key(|rev| (rev.depth, rev.branch.unwrap_or(Lane::MAX)));
        rows
    }

    /// Parent edges whose parent does not sit deeper than its child.
    /// Empty for every finished layout.
    pub fn depth_violations(&self) -> Vec<(CommitId, CommitId)> {
        let revisions: Vec<&Revision> = self.revisions.iter().collect();
        revisions
            .par_iter()
            .flat_map_iter(|rev| {
                rev.parent_ids().iter().filter_map(move |parent| {
                    let parent_depth = self.revisions.depth(parent)?;
                    (parent_depth <= rev.depth).then_some((rev.id(), *parent))
                })
            })
            .collect()
    }
}

/// Runs exploration, depth correction, pruning and lane assignment
pub struct LayoutEngine {
    config: LayoutConfig,
    progress: ProgressBar,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Lays out the history reachable from the reader's head.
    pub fn run<R: HistoryReader + ?Sized>(&self, reader: &R) -> Result<Layout> {
        let head = reader.head()?;
        self.run_from(reader, head)
    }

    /// Lays out the history reachable from `start`.
    pub fn run_from<R: HistoryReader + ?Sized>(
        &self,
        reader: &R,
        start: CommitId,
    ) -> Result<Layout> {
        let propagator = Propagator::new(&self.config);
        let mut revisions = WorkingSet::new();

        let explored = Explorer::new(reader, &propagator, self.config.horizon)
            .with_progress(self.progress.clone())
            .run(&mut revisions, start)?;

        let mut raised = explored.raised;
        raised += propagator.relax_edges(&mut revisions)?;
        raised += propagator.correct_merges(&mut revisions)?;

        let explored_count = revisions.len();
        let explored_max_depth = revisions.max_depth();
        info!(
            commits = explored_count,
            max_depth = ?explored_max_depth,
            branch_walks = explored.branch_walks,
            "history explored"
        );

        let pruned = revisions.prune_beyond(self.config.horizon);
        debug!(
            pruned = pruned.len(),
            horizon = self.config.horizon,
            "pruned out of scope commits"
        );

        let report = Partitioner::new(&self.config).assign(&mut revisions, start);

        let stats = LayoutStats {
            explored: explored_count,
            explored_max_depth,
            retained: revisions.len(),
            retained_max_depth: revisions.max_depth(),
            pruned: pruned.len(),
            dropped_branch_heads: explored.dropped_branch_heads,
            branch_walks: explored.branch_walks,
            raised,
            lanes: report.lanes,
        };
        info!(commits = stats.retained, lanes = stats.lanes, "layout complete");

        Ok(Layout {
            head: start,
            revisions,
            unassigned: report.unassigned,
            stats,
        })
    }
}
