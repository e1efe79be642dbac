// src/report.rs

use crate::model::{DjStats, Username};
use crate::tally;
use std::collections::BTreeMap;

/// Print the two leaderboards the pipeline exists for: every raw mention
/// occurrence, and one vote per commenter.
pub fn print_leaderboards(
    raw_counts: &BTreeMap<Username, u64>,
    unique_counts: &BTreeMap<Username, u64>,
    top: usize,
) {
    println!("\n=== Top {} raw mentions (every tag occurrence) ===", top);
    for (tag, count) in tally::top_k(raw_counts, top) {
        println!("@{}: {}", tag, count);
    }

    println!("\n=== Top {} unique voters (one vote per commenter) ===", top);
    for (tag, count) in tally::top_k(unique_counts, top) {
        println!("@{}: {}", tag, count);
    }
}

/// Print a raw-vs-unique summary for each requested handle. Handles are
/// accepted with or without a leading `@` and in any casing.
pub fn print_artist_summary(
    artists: &[String],
    raw_counts: &BTreeMap<Username, u64>,
    dj_stats: &BTreeMap<Username, DjStats>,
) {
    if artists.is_empty() {
        return;
    }

    println!("\n=== Tag summary for selected artists ===");
    for artist in artists {
        let handle = artist.trim_start_matches('@').to_ascii_lowercase();
        let mentions = raw_counts.get(&handle).copied().unwrap_or(0);
        let voters = dj_stats
            .get(&handle)
            .map_or(0, |stats| stats.unique_taggers.len());
        println!(
            "@{}: raw mentions: {}, unique voters: {}",
            handle, mentions, voters
        );
    }
}
