// src/tally.rs

use crate::model::{UserTagMap, Username};
use crate::parser;
use std::collections::{BTreeMap, BTreeSet};

/// Count every mention occurrence in the raw export text. Duplicates within
/// one comment and repeats across comments all count. The scan is
/// independent of block parsing, so mentions inside malformed blocks are
/// counted too.
pub fn raw_mention_counts(text: &str) -> BTreeMap<Username, u64> {
    let mut counts = BTreeMap::new();
    for tag in parser::extract_mentions(text) {
        *counts.entry(tag).or_insert(0) += 1;
    }
    counts
}

/// Count, per tag, how many distinct commenters ever cast it. A commenter
/// casting the same tag in several comments still counts once.
pub fn unique_voter_counts(tags_by_commenter: &UserTagMap) -> BTreeMap<Username, u64> {
    let mut counts = BTreeMap::new();
    for tags in tags_by_commenter.values() {
        let unique: BTreeSet<&Username> = tags.iter().collect();
        for tag in unique {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// The `k` highest-counted tags, count descending. Ties break by
/// lexicographic handle order so the result is stable across runs.
pub fn top_k(counts: &BTreeMap<Username, u64>, k: usize) -> Vec<(Username, u64)> {
    let mut entries: Vec<(Username, u64)> =
        counts.iter().map(|(tag, &count)| (tag.clone(), count)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(k);
    entries
}
