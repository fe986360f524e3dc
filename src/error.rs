// src/error.rs

use crate::model::CommitId;

/// Failures that abort a layout run.
///
/// Commits cut off by the horizon and commits left without a lane are not
/// errors; they are reported on the finished layout.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("repository access failed: {0}")]
    Repository(#[from] git2::Error),

    #[error("commit {0} cannot be found in the history")]
    MissingCommit(CommitId),

    #[error("history has no head commit")]
    EmptyHistory,

    /// The propagation guard tripped. Points at a cycle or corrupt parent data.
    #[error(
        "depth propagation from {origin} did not settle after {rounds} rounds \
         (still raising {commit})"
    )]
    PropagationDiverged {
        origin: CommitId,
        commit: CommitId,
        rounds: usize,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
