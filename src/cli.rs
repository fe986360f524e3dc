// src/cli.rs

use clap::Parser;
use git_lanes::config::{DEFAULT_HORIZON, DEFAULT_LANE_LIMIT, DEFAULT_PROPAGATION_ROUNDS};
use git_lanes::LayoutConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the git repository to lay out
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// Revision to start from instead of HEAD
    #[arg(long)]
    pub rev: Option<String>,

    /// Deepest depth kept in the layout
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    pub horizon: usize,

    /// Rounds a single depth propagation may take before the run aborts
    #[arg(long, default_value_t = DEFAULT_PROPAGATION_ROUNDS)]
    pub max_rounds: usize,

    /// Most side lanes to allocate after the mainline
    #[arg(long, default_value_t = DEFAULT_LANE_LIMIT)]
    pub lane_limit: usize,

    /// What to print once the layout is computed
    #[arg(long, value_enum, default_value_t = Output::Summary)]
    pub output: Output,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig::default()
            .with_horizon(self.horizon)
            .with_max_propagation_rounds(self.max_rounds)
            .with_lane_limit(self.lane_limit)
    }
}

#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum Output {
    /// Commit counts and maximum depth before and after pruning
    Summary,
    /// Summary plus one line per commit: depth, lane, id and date
    Rows,
}
