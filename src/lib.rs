// src/lib.rs

//! Depth and branch-lane layout for git commit graphs.
//!
//! A run starts at one commit, discovers the history behind it along
//! first-parent chains, relaxes depths until every parent sits deeper than
//! its children, drops everything past the horizon and finally groups the
//! remaining commits into lanes, lane 0 being the mainline.
//!
//! ```no_run
//! use git_lanes::{GitReader, LayoutConfig, LayoutEngine};
//! use std::path::Path;
//!
//! let reader = GitReader::open(Path::new("."))?;
//! let layout = LayoutEngine::new(LayoutConfig::default()).run(&reader)?;
//! for rev in layout.rows() {
//!     println!("{} {:?} {}", rev.depth, rev.branch, rev.id());
//! }
//! # Ok::<(), git_lanes::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod explorer;
pub mod lanes;
pub mod layout;
pub mod model;
pub mod propagate;
pub mod reader;

pub use config::LayoutConfig;
pub use error::{Error, Result};
pub use layout::{Layout, LayoutEngine, LayoutStats};
pub use model::{Commit, CommitId, Depth, Lane, Revision, WorkingSet, MAINLINE};
pub use reader::{GitReader, HistoryReader, MemoryHistory};
