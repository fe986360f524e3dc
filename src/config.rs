// src/config.rs

use crate::model::Depth;

pub const DEFAULT_HORIZON: Depth = 1000;
pub const DEFAULT_PROPAGATION_ROUNDS: usize = 10_000;
pub const DEFAULT_LANE_LIMIT: usize = 1000;

/// Bounds on how much history a layout run explores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Deepest depth kept in the layout; branch heads past it are never walked
    pub horizon: Depth,
    /// Guard on the rounds of a single propagation
    pub max_propagation_rounds: usize,
    /// Most side lanes allocated after the mainline
    pub lane_limit: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            max_propagation_rounds: DEFAULT_PROPAGATION_ROUNDS,
            lane_limit: DEFAULT_LANE_LIMIT,
        }
    }
}

impl LayoutConfig {
    pub fn with_horizon(mut self, horizon: Depth) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_max_propagation_rounds(mut self, rounds: usize) -> Self {
        self.max_propagation_rounds = rounds;
        self
    }

    pub fn with_lane_limit(mut self, lane_limit: usize) -> Self {
        self.lane_limit = lane_limit;
        self
    }
}
