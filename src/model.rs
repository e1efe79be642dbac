// src/model.rs

use std::collections::{BTreeMap, BTreeSet};

/// A normalized user handle. Handles are lowercased at extraction time, so
/// every downstream structure shares one keyspace regardless of how the
/// handle was spelled in the export.
pub type Username = String;

/// Maps a commenter to every handle they tagged, in document order,
/// duplicates preserved. A commenter is present only if they cast at
/// least one tag.
pub type UserTagMap = BTreeMap<Username, Vec<Username>>;

/// The complete results of parsing a comments export
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedComments {
    pub tags_by_commenter: UserTagMap,
    /// Every handle that was tagged at least once. Not disjoint from the
    /// commenter set: a user can both comment and be tagged.
    pub all_djs: BTreeSet<Username>,
    /// Blocks dropped because they were too short or started with junk
    pub skipped_blocks: usize,
}

/// Node classification in the tag graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Authored at least one tagged comment
    Commenter,
    /// Was tagged at least once. Sticky: a commenter becomes a dj the
    /// moment someone tags them and never reverts.
    Dj,
}

/// Per-tagged-user aggregates consumed by reporting and visualization
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DjStats {
    /// Raw tag occurrences across all comments, duplicates counted
    pub mentions: u64,
    /// Distinct commenters who tagged this user at least once
    pub unique_taggers: BTreeSet<Username>,
}
