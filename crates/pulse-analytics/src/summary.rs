//! The per-dashboard analytics summary payload.

use std::collections::HashMap;

use pulse_core::{EmotionLabel, Post, SentimentLabel};

use crate::hashtags::hashtag_frequency;
use crate::trend::engagement_trend;
use crate::types::{
    AnalyticsSummary, BestPost, EmotionDistribution, EngagementPoint, SentimentDistribution,
    TrendDirection,
};

/// The engagement time series keeps at most this many date buckets.
const MAX_TIME_BUCKETS: usize = 20;

/// Roll a filtered post collection up into the analytics summary.
///
/// Callers pass posts sorted descending by timestamp (the storage layer's
/// listing order); the time-series bucket order follows that encounter
/// order. Empty input produces the all-zero payload with `null` best post
/// and a neutral trend.
#[must_use]
pub fn summarize(posts: &[Post]) -> AnalyticsSummary {
    if posts.is_empty() {
        return AnalyticsSummary {
            total_posts: 0,
            total_likes: 0,
            avg_engagement: 0,
            sentiment_distribution: SentimentDistribution::default(),
            emotion_distribution: EmotionDistribution::default(),
            engagement_over_time: Vec::new(),
            hashtag_frequency: Vec::new(),
            best_performing_post: None,
            engagement_trend: TrendDirection::Neutral,
        };
    }

    #[allow(clippy::cast_possible_wrap)]
    let total_posts = posts.len() as i64;
    let total_likes = posts.iter().map(|p| p.likes).sum();
    let total_engagement: i64 = posts.iter().map(|p| p.engagement_score).sum();
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let avg_engagement = (total_engagement as f64 / total_posts as f64).round() as i64;

    let mut sentiment = SentimentDistribution::default();
    for post in posts {
        match post.sentiment_label {
            SentimentLabel::Positive => sentiment.positive += 1,
            SentimentLabel::Neutral => sentiment.neutral += 1,
            SentimentLabel::Negative => sentiment.negative += 1,
        }
    }

    let mut emotion = EmotionDistribution::default();
    for post in posts {
        match post.emotion_label {
            EmotionLabel::Happy => emotion.happy += 1,
            EmotionLabel::Excited => emotion.excited += 1,
            EmotionLabel::Angry => emotion.angry += 1,
            EmotionLabel::Neutral => emotion.neutral += 1,
        }
    }

    let best = posts
        .iter()
        .fold(None::<&Post>, |best, post| match best {
            Some(b) if post.engagement_score > b.engagement_score => Some(post),
            Some(b) => Some(b),
            None => Some(post),
        })
        .map(|post| BestPost {
            post_id: post.post_id.clone(),
            caption: post.caption.clone(),
            engagement_score: post.engagement_score,
        });

    AnalyticsSummary {
        total_posts,
        total_likes,
        avg_engagement,
        sentiment_distribution: sentiment,
        emotion_distribution: emotion,
        engagement_over_time: engagement_over_time(posts),
        hashtag_frequency: hashtag_frequency(posts),
        best_performing_post: best,
        engagement_trend: engagement_trend(posts),
    }
}

/// Group posts by calendar date in encounter order; mean engagement per
/// bucket, rounded; truncated to the trailing [`MAX_TIME_BUCKETS`] buckets.
fn engagement_over_time(posts: &[Post]) -> Vec<EngagementPoint> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, (i64, i64)> = HashMap::new();

    for post in posts {
        let date = format_date(post);
        let entry = buckets.entry(date.clone()).or_insert_with(|| {
            order.push(date);
            (0, 0)
        });
        entry.0 += post.engagement_score;
        entry.1 += 1;
    }

    let mut points: Vec<EngagementPoint> = order
        .into_iter()
        .map(|date| {
            let (total, count) = buckets[&date];
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            let engagement = (total as f64 / count as f64).round() as i64;
            EngagementPoint { date, engagement }
        })
        .collect();

    if points.len() > MAX_TIME_BUCKETS {
        points.drain(..points.len() - MAX_TIME_BUCKETS);
    }
    points
}

fn format_date(post: &Post) -> String {
    // "Nov 14" style labels, UTC calendar date.
    post.timestamp.format("%b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pulse_core::PerformanceTier;

    fn post(
        caption: &str,
        likes: i64,
        timestamp: DateTime<Utc>,
        sentiment: SentimentLabel,
        emotion: EmotionLabel,
    ) -> Post {
        Post {
            post_id: format!("post-{likes}"),
            caption: caption.to_string(),
            likes,
            comments_count: 0,
            shares: 0,
            timestamp,
            comments: Vec::new(),
            sentiment_score: 0.0,
            sentiment_label: sentiment,
            emotion_label: emotion,
            engagement_score: likes,
            predicted_performance: PerformanceTier::Medium,
            confidence_score: 50,
        }
    }

    fn at(epoch_secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(epoch_secs, 0).expect("valid epoch")
    }

    #[test]
    fn empty_input_produces_exact_empty_payload() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_posts, 0);
        assert_eq!(summary.total_likes, 0);
        assert_eq!(summary.avg_engagement, 0);
        assert_eq!(summary.sentiment_distribution, SentimentDistribution::default());
        assert_eq!(summary.emotion_distribution, EmotionDistribution::default());
        assert!(summary.engagement_over_time.is_empty());
        assert!(summary.hashtag_frequency.is_empty());
        assert!(summary.best_performing_post.is_none());
        assert_eq!(summary.engagement_trend, TrendDirection::Neutral);
    }

    #[test]
    fn totals_and_average() {
        let posts = vec![
            post("a", 10, at(1_700_000_000), SentimentLabel::Positive, EmotionLabel::Happy),
            post("b", 21, at(1_700_000_100), SentimentLabel::Neutral, EmotionLabel::Neutral),
        ];
        let summary = summarize(&posts);
        assert_eq!(summary.total_posts, 2);
        assert_eq!(summary.total_likes, 31);
        // (10 + 21) / 2 = 15.5 rounds to 16.
        assert_eq!(summary.avg_engagement, 16);
    }

    #[test]
    fn distributions_count_labels() {
        let posts = vec![
            post("a", 1, at(1_700_000_000), SentimentLabel::Positive, EmotionLabel::Happy),
            post("b", 1, at(1_700_000_000), SentimentLabel::Positive, EmotionLabel::Excited),
            post("c", 1, at(1_700_000_000), SentimentLabel::Negative, EmotionLabel::Angry),
            post("d", 1, at(1_700_000_000), SentimentLabel::Neutral, EmotionLabel::Neutral),
        ];
        let summary = summarize(&posts);
        assert_eq!(summary.sentiment_distribution.positive, 2);
        assert_eq!(summary.sentiment_distribution.negative, 1);
        assert_eq!(summary.sentiment_distribution.neutral, 1);
        assert_eq!(summary.emotion_distribution.happy, 1);
        assert_eq!(summary.emotion_distribution.excited, 1);
        assert_eq!(summary.emotion_distribution.angry, 1);
        assert_eq!(summary.emotion_distribution.neutral, 1);
    }

    #[test]
    fn best_post_takes_first_encountered_max() {
        let mut first = post("first", 50, at(1_700_000_000), SentimentLabel::Neutral, EmotionLabel::Neutral);
        first.post_id = "first".to_string();
        let mut tied = post("tied", 50, at(1_700_000_100), SentimentLabel::Neutral, EmotionLabel::Neutral);
        tied.post_id = "tied".to_string();
        let summary = summarize(&[first, tied]);
        assert_eq!(summary.best_performing_post.unwrap().post_id, "first");
    }

    #[test]
    fn time_series_groups_by_date_in_encounter_order() {
        // Two posts on Nov 14 2023 (86400-second day boundary), one on Nov 15.
        let nov_14_a = at(1_699_920_000);
        let nov_14_b = at(1_699_960_000);
        let nov_15 = at(1_700_050_000);
        // Descending listing order: Nov 15 first.
        let posts = vec![
            post("x", 30, nov_15, SentimentLabel::Neutral, EmotionLabel::Neutral),
            post("y", 10, nov_14_b, SentimentLabel::Neutral, EmotionLabel::Neutral),
            post("z", 21, nov_14_a, SentimentLabel::Neutral, EmotionLabel::Neutral),
        ];
        let summary = summarize(&posts);
        assert_eq!(summary.engagement_over_time.len(), 2);
        assert_eq!(summary.engagement_over_time[0].date, "Nov 15");
        assert_eq!(summary.engagement_over_time[0].engagement, 30);
        assert_eq!(summary.engagement_over_time[1].date, "Nov 14");
        // (10 + 21) / 2 = 15.5 rounds to 16.
        assert_eq!(summary.engagement_over_time[1].engagement, 16);
    }

    #[test]
    fn time_series_keeps_last_twenty_buckets() {
        let day = 86_400;
        let posts: Vec<Post> = (0..25)
            .map(|i| {
                post(
                    "t",
                    i,
                    at(1_700_000_000 + i * day),
                    SentimentLabel::Neutral,
                    EmotionLabel::Neutral,
                )
            })
            .collect();
        let summary = summarize(&posts);
        assert_eq!(summary.engagement_over_time.len(), 20);
        // The first five encounter-order buckets are dropped.
        assert_eq!(summary.engagement_over_time[0].engagement, 5);
    }

    #[test]
    fn hashtags_flow_through_summary() {
        let posts = vec![
            post("#sunny day", 10, at(1_700_000_000), SentimentLabel::Neutral, EmotionLabel::Neutral),
            post("#sunny again", 20, at(1_700_000_100), SentimentLabel::Neutral, EmotionLabel::Neutral),
        ];
        let summary = summarize(&posts);
        assert_eq!(summary.hashtag_frequency[0].hashtag, "#sunny");
        assert_eq!(summary.hashtag_frequency[0].count, 2);
        assert_eq!(summary.hashtag_frequency[0].avg_engagement, 15);
    }
}
