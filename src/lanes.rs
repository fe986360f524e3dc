// src/lanes.rs

//! Branch lane assignment.
//!
//! Lane 0 is the first-parent chain from the head. Each further lane starts
//! at a fork point, the shallowest commit that already has a lane and still
//! has a parent without one, and follows parents without a lane for as long
//! as there is one. When a commit has several such parents the one with the
//! lowest parent index is taken, so repeated runs draw the same lanes.

use crate::config::LayoutConfig;
use crate::model::{CommitId, Depth, Lane, WorkingSet, MAINLINE};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Outcome of lane assignment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaneReport {
    /// Lanes handed out, the mainline included
    pub lanes: usize,
    /// Commits no lane could reach, in discovery order
    pub unassigned: Vec<CommitId>,
}

pub struct Partitioner {
    lane_limit: usize,
}

impl Partitioner {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            lane_limit: config.lane_limit,
        }
    }

    pub fn assign(&self, set: &mut WorkingSet, head: CommitId) -> LaneReport {
        let mut lanes = 0;
        if assign_mainline(set, head) > 0 {
            lanes += 1;
        }

        let mut levels: BTreeMap<Depth, Vec<CommitId>> = BTreeMap::new();
        for rev in set.iter() {
            levels.entry(rev.depth).or_default().push(rev.id());
        }
        let mut unassigned: HashSet<CommitId> = set
            .iter()
            .filter(|rev| rev.branch.is_none())
            .map(|rev| rev.id())
            .collect();

        let mut lane = MAINLINE + 1;
        while !unassigned.is_empty() && lane <= self.lane_limit {
            let Some((fork, start)) = find_fork_point(set, &levels, &unassigned) else {
                break;
            };
            let length = walk_lane(set, &mut unassigned, start, lane);
            debug!(lane, fork = %fork, length, "allocated lane");
            lanes += 1;
            lane += 1;
        }

        let unassigned: Vec<CommitId> = set
            .iter()
            .filter(|rev| rev.branch.is_none())
            .map(|rev| rev.id())
            .collect();
        if !unassigned.is_empty() {
            warn!(count = unassigned.len(), "commits left without a lane");
        }

        LaneReport { lanes, unassigned }
    }
}

/// Puts the first-parent chain from `head` on the mainline lane.
fn assign_mainline(set: &mut WorkingSet, head: CommitId) -> usize {
    let mut length = 0;
    let mut next = Some(head);
    while let Some(id) = next {
        let Some(rev) = set.get_mut(&id) else { break };
        rev.branch = Some(MAINLINE);
        length += 1;
        next = rev.first_parent();
    }
    length
}

/// Finds the shallowest commit with a lane that has a parent without one.
/// Returns the fork point and the parent the new lane starts at.
fn find_fork_point(
    set: &WorkingSet,
    levels: &BTreeMap<Depth, Vec<CommitId>>,
    unassigned: &HashSet<CommitId>,
) -> Option<(CommitId, CommitId)> {
    levels.values().flatten().find_map(|id| {
        let rev = set.get(id)?;
        if rev.branch.is_none() {
            return None;
        }
        rev.parent_ids()
            .iter()
            .find(|parent| unassigned.contains(*parent))
            .map(|parent| (*id, *parent))
    })
}

fn walk_lane(
    set: &mut WorkingSet,
    unassigned: &mut HashSet<CommitId>,
    start: CommitId,
    lane: Lane,
) -> usize {
    let mut length = 0;
    let mut next = Some(start);
    while let Some(id) = next {
        let Some(rev) = set.get_mut(&id) else { break };
        rev.branch = Some(lane);
        unassigned.remove(&id);
        length += 1;
        next = rev
            .parent_ids()
            .iter()
            .find(|parent| unassigned.contains(*parent))
            .copied();
    }
    length
}
