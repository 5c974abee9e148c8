//! Hashtag extraction and frequency/engagement tallies.

use std::collections::HashMap;

use pulse_core::Post;
use regex::Regex;

use crate::types::HashtagStat;

/// Maximum number of hashtags returned by [`hashtag_frequency`].
const TOP_HASHTAGS: usize = 10;

/// Extract the hashtags of a caption: `#` followed by one or more word
/// characters, lowercased, deduplicated in first-occurrence order.
#[must_use]
pub fn extract_hashtags(caption: &str) -> Vec<String> {
    let re = Regex::new(r"#\w+").expect("valid hashtag regex");
    let mut seen = Vec::new();
    for m in re.find_iter(caption) {
        let tag = m.as_str().to_lowercase();
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

/// Tally hashtags across a post collection.
///
/// Each post contributes at most once per unique tag (case-insensitive).
/// Per tag: occurrence count and the rounded mean engagement of the posts it
/// appears in. Returns the top 10 by count descending; equal counts keep
/// first-encounter order (stable sort).
#[must_use]
pub fn hashtag_frequency(posts: &[Post]) -> Vec<HashtagStat> {
    // Tallies in first-encounter order so the sort below is reproducible.
    let mut order: Vec<String> = Vec::new();
    let mut tallies: HashMap<String, (i64, i64)> = HashMap::new();

    for post in posts {
        for tag in extract_hashtags(&post.caption) {
            let entry = tallies.entry(tag.clone()).or_insert_with(|| {
                order.push(tag);
                (0, 0)
            });
            entry.0 += 1;
            entry.1 += post.engagement_score;
        }
    }

    let mut stats: Vec<HashtagStat> = order
        .into_iter()
        .map(|tag| {
            let (count, total_engagement) = tallies[&tag];
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            let avg_engagement = (total_engagement as f64 / count as f64).round() as i64;
            HashtagStat {
                hashtag: tag,
                count,
                avg_engagement,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats.truncate(TOP_HASHTAGS);
    stats
}
