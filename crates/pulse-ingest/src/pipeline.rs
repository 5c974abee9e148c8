//! Batch ingestion orchestration.

use pulse_core::Post;

use crate::normalize::normalize_row;
use crate::predict::predict;
use crate::rows::RawRow;

/// Mean engagement across a post collection. 0.0 for an empty slice.
#[must_use]
pub fn batch_average(posts: &[Post]) -> f64 {
    if posts.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let denom = posts.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let total = posts.iter().map(|p| p.engagement_score).sum::<i64>() as f64;
    total / denom
}

/// Normalize a batch of upload rows and attach performance predictions.
///
/// 1. Normalize every row into a canonical post (rows are independent).
/// 2. Compute the batch average engagement.
/// 3. Predict each post's tier/confidence against that average.
///
/// Row counts in and out are always equal; malformed fields degrade inside
/// [`normalize_row`] rather than dropping rows.
#[must_use]
pub fn ingest_rows(rows: &[RawRow]) -> Vec<Post> {
    let mut posts: Vec<Post> = rows.iter().map(normalize_row).collect();

    let avg_engagement = batch_average(&posts);
    for post in &mut posts {
        let prediction = predict(post.engagement_score, avg_engagement);
        post.predicted_performance = prediction.predicted_performance;
        post.confidence_score = prediction.confidence_score;
    }

    tracing::debug!(
        rows = rows.len(),
        avg_engagement,
        "normalized ingestion batch"
    );

    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::PerformanceTier;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<RawRow> {
        value
            .as_array()
            .expect("test rows must be an array")
            .iter()
            .map(|v| v.as_object().expect("row must be an object").clone())
            .collect()
    }

    #[test]
    fn empty_batch_yields_no_posts() {
        assert!(ingest_rows(&[]).is_empty());
    }

    #[test]
    fn batch_average_of_empty_is_zero() {
        assert_eq!(batch_average(&[]), 0.0);
    }

    #[test]
    fn predictions_use_batch_average() {
        // Engagements 100 and 10 → avg 55; both deviations clamp to 95.
        let posts = ingest_rows(&rows(json!([
            {"likes": 100, "caption": "big"},
            {"likes": 10, "caption": "small"},
        ])));
        assert_eq!(posts[0].predicted_performance, PerformanceTier::High);
        assert_eq!(posts[0].confidence_score, 95);
        assert_eq!(posts[1].predicted_performance, PerformanceTier::Low);
        assert_eq!(posts[1].confidence_score, 95);
    }

    #[test]
    fn all_zero_batch_gets_medium_fallback() {
        let posts = ingest_rows(&rows(json!([{"caption": "a"}, {"caption": "b"}])));
        for post in posts {
            assert_eq!(post.predicted_performance, PerformanceTier::Medium);
            assert_eq!(post.confidence_score, 50);
        }
    }

    #[test]
    fn row_count_is_preserved() {
        let posts = ingest_rows(&rows(json!([
            {"likes": "not-a-number", "date": "garbage"},
            {},
            {"caption": 42},
        ])));
        assert_eq!(posts.len(), 3);
    }
}
