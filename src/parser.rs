// src/parser.rs

use crate::cli::Strategy;
use crate::model::{ParsedComments, Username};
use rayon::prelude::*;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@([A-Za-z0-9_.]+)").expect("mention regex"))
}

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9_.]+)'s profile picture$").expect("marker regex"))
}

/// Pull every @mention out of a piece of text, in order, duplicates kept.
/// A mention is the longest run of word characters, dots and underscores
/// after an `@`. Handles are lowercased so differently-cased spellings of
/// the same handle collapse into one.
pub fn extract_mentions(text: &str) -> Vec<Username> {
    mention_re()
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_ascii_lowercase()))
        .collect()
}

/// Parse a comments export into the commenter→tags relation.
///
/// Both strategies tolerate noise by skipping anything they cannot
/// recognize; a bad block never aborts the document. They agree on
/// well-formed four-line blocks and may diverge on malformed ones.
pub fn parse_comments(text: &str, strategy: Strategy) -> ParsedComments {
    match strategy {
        Strategy::MarkerSplit => parse_marker_split(text),
        Strategy::FixedOffset => parse_fixed_offset(text),
    }
}

/// Split the dump at every profile-picture marker line. Everything from one
/// marker up to the next belongs to one comment; mentions are extracted
/// from the whole remainder of the block (username echo and time lines
/// cannot contain an `@`, so this is harmless on clean input).
fn parse_marker_split(text: &str) -> ParsedComments {
    let lines: Vec<&str> = text.lines().collect();

    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| marker_re().is_match(line))
        .map(|(i, _)| i)
        .collect();

    let blocks: Vec<&[&str]> = starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(lines.len());
            &lines[start..end]
        })
        .collect();

    // Blocks are independent, so scan them in parallel. collect() keeps the
    // original block order, which keeps tag order per commenter equal to
    // document order.
    let parsed: Vec<Option<(Username, Vec<Username>)>> =
        blocks.par_iter().map(|block| parse_block(block)).collect();

    let mut out = collect_blocks(parsed);

    // Text before the first marker is junk from the capture tool.
    let junk_prefix = match starts.first() {
        Some(&first) => lines[..first].iter().any(|l| !l.trim().is_empty()),
        None => lines.iter().any(|l| !l.trim().is_empty()),
    };
    if junk_prefix {
        out.skipped_blocks += 1;
        debug!("discarded junk before the first comment marker");
    }

    out
}

fn parse_block(block: &[&str]) -> Option<(Username, Vec<Username>)> {
    if block.len() < 2 {
        return None;
    }
    let caps = marker_re().captures(block[0])?;
    let commenter = caps[1].to_ascii_lowercase();
    let body = block[1..].join(" ");
    Some((commenter, extract_mentions(&body)))
}

/// Cursor scan assuming every comment is exactly four non-blank lines:
/// marker, username echo, elapsed time, comment text. Mentions are read
/// from the fourth line only and the cursor advances by four per
/// recognized block, by one otherwise.
fn parse_fixed_offset(text: &str) -> ParsedComments {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut parsed = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        match marker_re().captures(lines[i]) {
            Some(caps) if i + 3 < lines.len() => {
                let commenter = caps[1].to_ascii_lowercase();
                parsed.push(Some((commenter, extract_mentions(lines[i + 3]))));
                i += 4;
            }
            Some(_) => {
                // Marker too close to the end of the dump to form a block.
                parsed.push(None);
                i += 1;
            }
            None => i += 1,
        }
    }

    collect_blocks(parsed)
}

/// Fold per-block results into the relation. `None` marks a malformed
/// block; a block with zero tags is well-formed but contributes nothing,
/// so commenters who never tag anyone stay out of the map entirely.
fn collect_blocks(parsed: Vec<Option<(Username, Vec<Username>)>>) -> ParsedComments {
    let mut out = ParsedComments::default();

    for entry in parsed {
        match entry {
            None => out.skipped_blocks += 1,
            Some((_, tags)) if tags.is_empty() => {}
            Some((commenter, tags)) => {
                let list = out.tags_by_commenter.entry(commenter).or_default();
                for tag in tags {
                    out.all_djs.insert(tag.clone());
                    list.push(tag);
                }
            }
        }
    }

    if out.skipped_blocks > 0 {
        debug!(skipped = out.skipped_blocks, "skipped malformed comment blocks");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Strategy;
    use crate::model::UserTagMap;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    const SAMPLE: &str = "alice's profile picture\nalice\n2d\n@bob hi @bob @carol\n\
                          bob's profile picture\nbob\n5h\nno tags here";

    fn djs(names: &[&str]) -> BTreeSet<Username> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn tag_map(entries: &[(&str, &[&str])]) -> UserTagMap {
        entries
            .iter()
            .map(|(commenter, tags)| {
                (
                    commenter.to_string(),
                    tags.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn extracts_mentions_in_order_with_duplicates() {
        let found = extract_mentions("shout to @dj.foo and @Bar_99, again @dj.foo!");
        assert_eq!(found, vec!["dj.foo", "bar_99", "dj.foo"]);
    }

    #[test]
    fn mentions_are_lowercased() {
        assert_eq!(extract_mentions("@DJFoo @djfoo"), vec!["djfoo", "djfoo"]);
    }

    #[test]
    fn sample_dump_builds_expected_tag_map() {
        let expected = tag_map(&[("alice", &["bob", "bob", "carol"])]);
        for strategy in [Strategy::MarkerSplit, Strategy::FixedOffset] {
            let parsed = parse_comments(SAMPLE, strategy);
            assert_eq!(parsed.tags_by_commenter, expected, "{:?}", strategy);
            assert_eq!(parsed.all_djs, djs(&["bob", "carol"]), "{:?}", strategy);
            assert_eq!(parsed.skipped_blocks, 0, "{:?}", strategy);
        }
    }

    #[test]
    fn untagged_commenter_stays_out_of_the_map() {
        let parsed = parse_comments(SAMPLE, Strategy::MarkerSplit);
        assert!(!parsed.tags_by_commenter.contains_key("bob"));
    }

    #[test]
    fn empty_input_yields_empty_everything() {
        for strategy in [Strategy::MarkerSplit, Strategy::FixedOffset] {
            let parsed = parse_comments("", strategy);
            assert_eq!(parsed, ParsedComments::default(), "{:?}", strategy);
        }
    }

    #[test]
    fn junk_before_first_marker_is_discarded() {
        let text = format!("Load more comments\nReply\n{}", SAMPLE);
        let parsed = parse_comments(&text, Strategy::MarkerSplit);
        assert_eq!(parsed.tags_by_commenter.len(), 1);
        assert_eq!(parsed.skipped_blocks, 1);
    }

    #[test]
    fn single_line_block_is_skipped() {
        let parsed = parse_comments("alice's profile picture", Strategy::MarkerSplit);
        assert!(parsed.tags_by_commenter.is_empty());
        assert_eq!(parsed.skipped_blocks, 1);
    }

    #[test]
    fn marker_with_invalid_username_is_ordinary_body_text() {
        // "bad name" contains a space, so the line is not a boundary and
        // its mentions belong to alice.
        let text = "alice's profile picture\nalice\n2d\n@bob\n\
                    bad name's profile picture @carol\nwhatever";
        let parsed = parse_comments(text, Strategy::MarkerSplit);
        assert_eq!(
            parsed.tags_by_commenter["alice"],
            vec!["bob".to_string(), "carol".to_string()]
        );
    }

    #[test]
    fn strategies_diverge_on_mentions_outside_the_comment_line() {
        // A mention smuggled into the time-line slot: the marker-split
        // parser scans the whole block remainder and finds it, the
        // fixed-offset parser only reads the fourth line.
        let text = "alice's profile picture\nalice\n@carol\n@bob";
        let split = parse_comments(text, Strategy::MarkerSplit);
        let fixed = parse_comments(text, Strategy::FixedOffset);
        assert_eq!(split.tags_by_commenter["alice"], vec!["carol", "bob"]);
        assert_eq!(fixed.tags_by_commenter["alice"], vec!["bob"]);
    }

    #[test]
    fn truncated_trailing_marker_is_skipped_by_fixed_offset() {
        let text = "alice's profile picture\nalice\n2d\n@bob\nbob's profile picture\nbob";
        let parsed = parse_comments(text, Strategy::FixedOffset);
        assert_eq!(parsed.tags_by_commenter.len(), 1);
        assert_eq!(parsed.skipped_blocks, 1);
    }

    fn handle() -> impl proptest::strategy::Strategy<Value = String> {
        "[a-z][a-z0-9_.]{0,8}"
    }

    fn well_formed_dump(
        blocks: &[(String, Vec<String>)],
    ) -> String {
        let mut text = String::new();
        for (commenter, tags) in blocks {
            let comment = tags
                .iter()
                .map(|t| format!("@{}", t))
                .collect::<Vec<_>>()
                .join(" ");
            text.push_str(&format!(
                "{0}'s profile picture\n{0}\n2d\n{1}\n",
                commenter, comment
            ));
        }
        text
    }

    proptest! {
        #[test]
        fn strategies_agree_on_well_formed_dumps(
            blocks in proptest::collection::vec(
                (handle(), proptest::collection::vec(handle(), 1..4)),
                0..6,
            )
        ) {
            let text = well_formed_dump(&blocks);
            let split = parse_comments(&text, Strategy::MarkerSplit);
            let fixed = parse_comments(&text, Strategy::FixedOffset);
            prop_assert_eq!(&split.tags_by_commenter, &fixed.tags_by_commenter);
            prop_assert_eq!(&split.all_djs, &fixed.all_djs);
            prop_assert_eq!(split.skipped_blocks, 0);
            prop_assert_eq!(fixed.skipped_blocks, 0);
        }

        #[test]
        fn tag_order_per_commenter_follows_document_order(
            tags in proptest::collection::vec(handle(), 1..10)
        ) {
            let blocks = vec![("alice".to_string(), tags.clone())];
            let text = well_formed_dump(&blocks);
            let parsed = parse_comments(&text, Strategy::MarkerSplit);
            prop_assert_eq!(&parsed.tags_by_commenter["alice"], &tags);
        }
    }
}
