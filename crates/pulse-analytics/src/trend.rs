//! Two-half engagement trend over a time-ordered post collection.

use pulse_core::Post;

use crate::types::TrendDirection;

/// Trend thresholds: the second-half mean must beat the first-half mean by
/// 10% either way to leave neutral.
const UP_FACTOR: f64 = 1.1;
const DOWN_FACTOR: f64 = 0.9;

/// Mean engagement of the first and second halves of the collection after
/// sorting ascending by timestamp. The first half takes `floor(n/2)`
/// elements; an empty half has mean 0.
#[must_use]
pub fn half_means(posts: &[Post]) -> (f64, f64) {
    let mut ordered: Vec<(i64, i64)> = posts
        .iter()
        .map(|p| (p.timestamp.timestamp_millis(), p.engagement_score))
        .collect();
    ordered.sort_by_key(|(ts, _)| *ts);

    let split = ordered.len() / 2;
    (
        mean(&ordered[..split]),
        mean(&ordered[split..]),
    )
}

fn mean(slice: &[(i64, i64)]) -> f64 {
    if slice.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let denom = slice.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let total = slice.iter().map(|(_, e)| e).sum::<i64>() as f64;
    total / denom
}

/// Compare the second half of the collection to the first:
/// `up` above +10%, `down` below -10%, else `neutral`.
#[must_use]
pub fn engagement_trend(posts: &[Post]) -> TrendDirection {
    let (first, second) = half_means(posts);
    direction(first, second)
}

pub(crate) fn direction(first: f64, second: f64) -> TrendDirection {
    if second > first * UP_FACTOR {
        TrendDirection::Up
    } else if second < first * DOWN_FACTOR {
        TrendDirection::Down
    } else {
        TrendDirection::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pulse_core::{EmotionLabel, PerformanceTier, SentimentLabel};

    fn post(epoch_secs: i64, engagement: i64) -> Post {
        Post {
            post_id: "p".to_string(),
            caption: String::new(),
            likes: engagement,
            comments_count: 0,
            shares: 0,
            timestamp: DateTime::from_timestamp(epoch_secs, 0).expect("valid epoch"),
            comments: Vec::new(),
            sentiment_score: 0.0,
            sentiment_label: SentimentLabel::Neutral,
            emotion_label: EmotionLabel::Neutral,
            engagement_score: engagement,
            predicted_performance: PerformanceTier::Medium,
            confidence_score: 50,
        }
    }

    #[test]
    fn empty_collection_is_neutral() {
        assert_eq!(engagement_trend(&[]), TrendDirection::Neutral);
    }

    #[test]
    fn rising_engagement_is_up() {
        let posts = vec![post(100, 10), post(200, 10), post(300, 50), post(400, 50)];
        assert_eq!(engagement_trend(&posts), TrendDirection::Up);
    }

    #[test]
    fn falling_engagement_is_down() {
        let posts = vec![post(100, 50), post(200, 50), post(300, 10), post(400, 10)];
        assert_eq!(engagement_trend(&posts), TrendDirection::Down);
    }

    #[test]
    fn flat_engagement_is_neutral() {
        let posts = vec![post(100, 20), post(200, 20), post(300, 20), post(400, 20)];
        assert_eq!(engagement_trend(&posts), TrendDirection::Neutral);
    }

    #[test]
    fn input_order_does_not_matter() {
        // Same posts, shuffled: the trend sorts by timestamp itself.
        let posts = vec![post(400, 50), post(100, 10), post(300, 50), post(200, 10)];
        assert_eq!(engagement_trend(&posts), TrendDirection::Up);
    }

    #[test]
    fn single_post_compares_against_empty_first_half() {
        // floor(1/2) = 0: first half empty (mean 0), second half the post.
        assert_eq!(engagement_trend(&[post(100, 5)]), TrendDirection::Up);
        assert_eq!(engagement_trend(&[post(100, 0)]), TrendDirection::Neutral);
    }

    #[test]
    fn half_means_splits_at_floor() {
        let posts = vec![post(100, 10), post(200, 20), post(300, 30)];
        let (first, second) = half_means(&posts);
        assert!((first - 10.0).abs() < f64::EPSILON);
        assert!((second - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn just_inside_band_is_neutral() {
        // Second half exactly 1.1x the first is not strictly greater.
        let posts = vec![post(100, 10), post(200, 11)];
        assert_eq!(engagement_trend(&posts), TrendDirection::Neutral);
    }
}
