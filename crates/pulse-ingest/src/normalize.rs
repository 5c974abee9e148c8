//! Column-schema normalization from arbitrary upload rows to canonical posts.

use std::collections::HashMap;

use chrono::Utc;
use pulse_core::{Post, Prediction, SentimentLabel};
use serde_json::Value;

use crate::coerce::{coerce_count, coerce_string, parse_timestamp, split_comments};
use crate::emotion::classify_emotion;
use crate::predict;
use crate::rows::RawRow;
use crate::scorer::comparative_score;

/// Alias → canonical column names, looked up after key normalization.
///
/// Canonical names map to themselves so normalization is idempotent. Entries
/// like `likescount` cover camelCase source headers, which lowercase into a
/// single run. Kept as data so new aliases are one line, not a branch.
const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("id", "post_id"),
    ("post_id", "post_id"),
    ("postid", "post_id"),
    ("caption", "caption"),
    ("post_text", "caption"),
    ("text", "caption"),
    ("description", "caption"),
    ("content", "caption"),
    ("likes", "likes"),
    ("likes_count", "likes"),
    ("likescount", "likes"),
    ("like_count", "likes"),
    ("comments_count", "comments_count"),
    ("commentscount", "comments_count"),
    ("comment_count", "comments_count"),
    ("comments", "comments_count"),
    ("shares", "shares"),
    ("shares_count", "shares"),
    ("sharescount", "shares"),
    ("share_count", "shares"),
    ("timestamp", "timestamp"),
    ("date", "timestamp"),
    ("created_at", "timestamp"),
    ("createdat", "timestamp"),
    ("posted_at", "timestamp"),
    ("time", "timestamp"),
    ("comment_texts", "comment_texts"),
    ("comments_text", "comment_texts"),
    ("commenttexts", "comment_texts"),
    ("comment", "comment_texts"),
];

/// Normalize a raw column name: trim, lowercase, collapse whitespace/hyphen
/// runs into a single underscore.
fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut in_separator = false;
    for c in key.trim().chars() {
        if c.is_whitespace() || c == '-' {
            if !in_separator {
                out.push('_');
            }
            in_separator = true;
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    out
}

/// Map a raw column name to its canonical field name.
///
/// Unrecognized names pass through in normalized form.
fn canonical_key(key: &str) -> String {
    let normalized = normalize_key(key);
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map_or(normalized, |(_, canonical)| (*canonical).to_string())
}

/// Normalize one upload row into a canonical [`Post`].
///
/// Field-level malformations never fail: bad counts become 0, bad
/// timestamps become the ingestion time, missing captions become empty. The
/// prediction fields carry the zero-average fallback until the batch
/// pipeline recomputes them against the cohort average.
#[must_use]
pub fn normalize_row(row: &RawRow) -> Post {
    let mut fields: HashMap<String, &Value> = HashMap::with_capacity(row.len());
    for (key, value) in row {
        fields.insert(canonical_key(key), value);
    }

    let caption = {
        let primary = coerce_string(fields.get("caption").copied());
        if primary.is_empty() {
            coerce_string(fields.get("text").copied())
        } else {
            primary
        }
    };

    let sentiment_score = comparative_score(&caption);
    let sentiment_label = SentimentLabel::from_score(sentiment_score);
    let emotion_label = classify_emotion(&caption);

    let likes = coerce_count(fields.get("likes").copied());
    let comments_count = coerce_count(fields.get("comments_count").copied());
    let shares = coerce_count(fields.get("shares").copied());

    let comments = split_comments(fields.get("comment_texts").copied());
    let timestamp = parse_timestamp(fields.get("timestamp").copied(), Utc::now());

    let post_id = {
        let supplied = coerce_string(fields.get("post_id").copied());
        if supplied.is_empty() {
            Post::generate_id()
        } else {
            supplied
        }
    };

    let Prediction {
        predicted_performance,
        confidence_score,
    } = predict::predict(likes + comments_count + shares, 0.0);

    Post {
        post_id,
        caption,
        likes,
        comments_count,
        shares,
        timestamp,
        comments,
        sentiment_score,
        sentiment_label,
        emotion_label,
        engagement_score: likes + comments_count + shares,
        predicted_performance,
        confidence_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::EmotionLabel;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        value.as_object().expect("test row must be an object").clone()
    }

    // -----------------------------------------------------------------------
    // key mapping
    // -----------------------------------------------------------------------

    #[test]
    fn normalize_key_collapses_separators() {
        assert_eq!(normalize_key("  Likes Count "), "likes_count");
        assert_eq!(normalize_key("posted - at"), "posted_at");
        assert_eq!(normalize_key("Share-Count"), "share_count");
    }

    #[test]
    fn canonical_key_maps_aliases() {
        assert_eq!(canonical_key("likesCount"), "likes");
        assert_eq!(canonical_key("like_count"), "likes");
        assert_eq!(canonical_key("post text"), "caption");
        assert_eq!(canonical_key("created_at"), "timestamp");
        assert_eq!(canonical_key("comments"), "comments_count");
        assert_eq!(canonical_key("comment"), "comment_texts");
        assert_eq!(canonical_key("ID"), "post_id");
    }

    #[test]
    fn canonical_key_is_idempotent_on_canonical_names() {
        for name in ["post_id", "caption", "likes", "comments_count", "shares", "timestamp"] {
            assert_eq!(canonical_key(name), name);
        }
    }

    #[test]
    fn canonical_key_passes_unknown_through_normalized() {
        assert_eq!(canonical_key("Reach Estimate"), "reach_estimate");
    }

    // -----------------------------------------------------------------------
    // normalize_row
    // -----------------------------------------------------------------------

    #[test]
    fn alias_and_canonical_rows_normalize_identically() {
        let aliased = normalize_row(&row(json!({
            "likes_count": 5,
            "post_text": "steady",
            "share_count": 2,
        })));
        let canonical = normalize_row(&row(json!({
            "likes": 5,
            "caption": "steady",
            "shares": 2,
        })));
        assert_eq!(aliased.likes, canonical.likes);
        assert_eq!(aliased.caption, canonical.caption);
        assert_eq!(aliased.shares, canonical.shares);
        assert_eq!(aliased.engagement_score, canonical.engagement_score);
    }

    #[test]
    fn engagement_is_sum_of_metrics() {
        let post = normalize_row(&row(json!({
            "likes": "10",
            "commentsCount": 3,
            "shares": 2.9,
        })));
        assert_eq!(post.likes, 10);
        assert_eq!(post.comments_count, 3);
        assert_eq!(post.shares, 2);
        assert_eq!(post.engagement_score, 15);
    }

    #[test]
    fn missing_metrics_default_to_zero() {
        let post = normalize_row(&row(json!({
            "caption": "Having a great day! #sunshine #happy",
        })));
        assert_eq!(post.likes, 0);
        assert_eq!(post.comments_count, 0);
        assert_eq!(post.shares, 0);
        assert_eq!(post.engagement_score, 0);
        assert_eq!(post.sentiment_label, SentimentLabel::Positive);
        assert_eq!(post.emotion_label, EmotionLabel::Happy);
    }

    #[test]
    fn negative_metrics_clamp_to_zero() {
        let post = normalize_row(&row(json!({"likes": -3, "shares": "-1"})));
        assert_eq!(post.likes, 0);
        assert_eq!(post.shares, 0);
        assert_eq!(post.engagement_score, 0);
    }

    #[test]
    fn supplied_post_id_is_kept_and_stringified() {
        let post = normalize_row(&row(json!({"id": 12345})));
        assert_eq!(post.post_id, "12345");
    }

    #[test]
    fn absent_post_id_generates_token() {
        let post = normalize_row(&row(json!({"caption": "x"})));
        assert_eq!(post.post_id.len(), 8);
    }

    #[test]
    fn comment_texts_split_from_pipe_string() {
        let post = normalize_row(&row(json!({
            "comments_text": "nice | great shot|",
        })));
        assert_eq!(post.comments, vec!["nice", "great shot"]);
    }

    #[test]
    fn epoch_seconds_and_millis_normalize_to_same_instant() {
        let secs = normalize_row(&row(json!({"date": 1_700_000_000i64})));
        let millis = normalize_row(&row(json!({"date": 1_700_000_000_000i64})));
        assert_eq!(secs.timestamp, millis.timestamp);
    }

    #[test]
    fn unparseable_timestamp_defaults_to_ingestion_time() {
        let before = Utc::now();
        let post = normalize_row(&row(json!({"date": "whenever"})));
        let after = Utc::now();
        assert!(post.timestamp >= before && post.timestamp <= after);
    }

    #[test]
    fn neutral_caption_is_neutral() {
        let post = normalize_row(&row(json!({"caption": "schedule for next week"})));
        assert_eq!(post.sentiment_label, SentimentLabel::Neutral);
        assert!(post.sentiment_score.abs() < f64::EPSILON);
    }

    #[test]
    fn negative_caption_is_negative() {
        let post = normalize_row(&row(json!({"caption": "terrible awful service"})));
        assert_eq!(post.sentiment_label, SentimentLabel::Negative);
        assert_eq!(post.emotion_label, EmotionLabel::Angry);
    }
}
