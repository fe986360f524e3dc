// src/main.rs

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Args, Output};
use git_lanes::{GitReader, HistoryReader, Layout, LayoutEngine};
use indicatif::ProgressBar;
use std::io::Write;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    let start_time = Instant::now();

    match run(&args, &mut std::io::stdout().lock()) {
        Ok(()) => {
            println!("Total time: {:.2?}", start_time.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error laying out repository: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, out: &mut impl Write) -> anyhow::Result<()> {
    let reader = GitReader::open(&args.repo)
        .with_context(|| format!("failed to open repository at {}", args.repo.display()))?;
    let start = match &args.rev {
        Some(rev) => reader
            .resolve(rev)
            .with_context(|| format!("failed to resolve revision {rev}"))?,
        None => reader.head().context("failed to resolve HEAD")?,
    };

    let bar = ProgressBar::new_spinner();
    bar.enable_steady_tick(Duration::from_millis(120));
    let layout = LayoutEngine::new(args.layout_config())
        .with_progress(bar)
        .run_from(&reader, start)?;

    let stats = &layout.stats;
    writeln!(out, "before cleanup: {} {}", stats.explored, stats.explored_max_depth.unwrap_or(0))?;
    writeln!(out, "after cleanup: {} {}", stats.retained, stats.retained_max_depth.unwrap_or(0))?;
    writeln!(
        out,
        "{} lanes, {} branch heads past the horizon",
        stats.lanes, stats.dropped_branch_heads
    )?;
    if !layout.unassigned.is_empty() {
        writeln!(out, "{} commits without a lane:", layout.unassigned.len())?;
        for id in &layout.unassigned {
            writeln!(out, "  {id}")?;
        }
    }

    if let Output::Rows = args.output {
        write_rows(out, &reader, &layout)?;
    }
    Ok(())
}

fn write_rows(out: &mut impl Write, reader: &GitReader, layout: &Layout) -> anyhow::Result<()> {
    for rev in layout.rows() {
        let lane = rev.branch.map_or_else(|| "-".to_string(), |lane| lane.to_string());
        let date = reader
            .commit_time(rev.id())?
            .map_or_else(|| "?".to_string(), |time| time.to_rfc3339());
        let id = rev.id().to_string();
        writeln!(out, "{:>5} {:>4} {} {}", rev.depth, lane, &id[..10], date)?;
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env("GIT_LANES_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "git_lanes=warn",
            1 => "git_lanes=debug",
            _ => "git_lanes=trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
