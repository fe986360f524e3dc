// src/propagate.rs

//! Depth relaxation.
//!
//! Depths only ever grow. When a commit turns out to be reachable over a
//! longer path than the one it was first seen on, its new depth is pushed
//! into its parents one level at a time until every parent sits strictly
//! deeper than each of its children. Commits already past the horizon are
//! left alone: they will be pruned whatever their final depth is, which
//! also bounds the number of rounds a single propagation can take.

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::model::{CommitId, Depth, WorkingSet};
use tracing::{debug, trace};

pub struct Propagator {
    horizon: Depth,
    max_rounds: usize,
}

impl Propagator {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            horizon: config.horizon,
            max_rounds: config.max_propagation_rounds,
        }
    }

    /// Raises `id` to `depth` and its ancestors accordingly.
    ///
    /// No-op for unknown commits and for commits already at least that deep.
    /// Returns how many depth values changed.
    pub fn propagate(&self, set: &mut WorkingSet, id: CommitId, depth: Depth) -> Result<usize> {
        let mut todo = vec![id];
        let mut proposed = depth;
        let mut raised = 0;

        for _ in 0..self.max_rounds {
            if todo.is_empty() {
                return Ok(raised);
            }
            let mut next = Vec::new();
            for commit in todo {
                let Some(rev) = set.get_mut(&commit) else { continue };
                if rev.depth >= proposed || rev.depth > self.horizon {
                    continue;
                }
                trace!(%commit, from = rev.depth, to = proposed, "raising depth");
                rev.depth = proposed;
                raised += 1;
                next.extend_from_slice(rev.parent_ids());
            }
            todo = next;
            proposed += 1;
        }

        match todo.first() {
            None => Ok(raised),
            Some(&commit) => Err(Error::PropagationDiverged {
                origin: id,
                commit,
                rounds: self.max_rounds,
            }),
        }
    }

    /// Proposes `depth + 1` across every parent edge in the set, in
    /// discovery order. Afterwards every parent within the horizon sits
    /// deeper than each of its children.
    pub fn relax_edges(&self, set: &mut WorkingSet) -> Result<usize> {
        let mut raised = 0;
        for id in set.ids().to_vec() {
            let Some(rev) = set.get(&id) else { continue };
            if rev.depth > self.horizon {
                continue;
            }
            let depth = rev.depth + 1;
            for parent in rev.parent_ids().to_vec() {
                raised += self.propagate(set, parent, depth)?;
            }
        }
        Ok(raised)
    }

    /// Places every merge within the horizon directly above its deepest
    /// known parent, then pushes the new depth into all of its parents.
    ///
    /// A merge first seen on the mainline gets its depth before its side
    /// branches are explored. Without this pass such a merge can sit
    /// shallower than commits that precede it.
    pub fn correct_merges(&self, set: &mut WorkingSet) -> Result<usize> {
        let mut raised = 0;
        for id in set.ids().to_vec() {
            let Some(rev) = set.get(&id) else { continue };
            if !rev.is_merge() || rev.depth > self.horizon {
                continue;
            }
            let current = rev.depth;
            let parents = rev.parent_ids().to_vec();
            let Some(target) = parents
                .iter()
                .filter_map(|parent| set.depth(parent))
                .map(|depth| depth.saturating_sub(1))
                .max()
            else {
                continue;
            };

            let depth = if target > current {
                debug!(merge = %id, from = current, to = target, "correcting merge depth");
                if let Some(rev) = set.get_mut(&id) {
                    rev.depth = target;
                }
                raised += 1;
                target
            } else {
                current
            };
            for parent in parents {
                raised += self.propagate(set, parent, depth + 1)?;
            }
        }
        Ok(raised)
    }
}
