// src/main.rs

mod cli;
mod graph;
mod model;
mod parser;
mod report;
mod tally;

use anyhow::Context;
use clap::Parser;
use cli::Args;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error analyzing comments export: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let start_time = Instant::now();

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let parsed = parser::parse_comments(&text, args.strategy);
    info!(
        commenters = parsed.tags_by_commenter.len(),
        tagged_users = parsed.all_djs.len(),
        skipped_blocks = parsed.skipped_blocks,
        "parse complete"
    );

    let raw_counts = tally::raw_mention_counts(&text);
    let unique_counts = tally::unique_voter_counts(&parsed.tags_by_commenter);
    let tag_graph = graph::build_graph(&parsed.tags_by_commenter);
    let dj_stats = graph::compute_dj_stats(&parsed.tags_by_commenter);

    println!(
        "Analysis finished in {:.2?}. Found {} commenters tagging {} users ({} nodes, {} edges).",
        start_time.elapsed(),
        parsed.tags_by_commenter.len(),
        parsed.all_djs.len(),
        tag_graph.node_count(),
        tag_graph.edge_count(),
    );

    report::print_leaderboards(&raw_counts, &unique_counts, args.top);
    report::print_artist_summary(&args.artists, &raw_counts, &dj_stats);

    Ok(())
}
