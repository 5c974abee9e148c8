//! Analytics payload shapes.
//!
//! Field names serialize in camelCase — the dashboard UI contract.

use serde::Serialize;

/// Direction of the engagement trend between the two halves of a
/// time-ordered post collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

/// Post counts per sentiment label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentDistribution {
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
}

/// Post counts per emotion label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmotionDistribution {
    #[serde(rename = "Happy")]
    pub happy: i64,
    #[serde(rename = "Excited")]
    pub excited: i64,
    #[serde(rename = "Neutral")]
    pub neutral: i64,
    #[serde(rename = "Angry")]
    pub angry: i64,
}

/// One calendar-date bucket of the engagement time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngagementPoint {
    /// Locale-style label, e.g. `"Nov 14"`.
    pub date: String,
    /// Mean engagement for the date, rounded.
    pub engagement: i64,
}

/// Tally for one hashtag across a post collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashtagStat {
    /// Lowercased tag including the `#` prefix.
    pub hashtag: String,
    /// Number of posts the tag occurs in (deduped per post).
    pub count: i64,
    /// Mean engagement of those posts, rounded.
    pub avg_engagement: i64,
}

/// Reduced shape of the best-performing post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestPost {
    pub post_id: String,
    pub caption: String,
    pub engagement_score: i64,
}

/// The full analytics payload for one dashboard view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_posts: i64,
    pub total_likes: i64,
    pub avg_engagement: i64,
    pub sentiment_distribution: SentimentDistribution,
    pub emotion_distribution: EmotionDistribution,
    pub engagement_over_time: Vec<EngagementPoint>,
    pub hashtag_frequency: Vec<HashtagStat>,
    pub best_performing_post: Option<BestPost>,
    pub engagement_trend: TrendDirection,
}

/// One derived insight card.
#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub id: &'static str,
    pub title: &'static str,
    pub value: String,
    pub description: String,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendDirection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_camel_case_fields() {
        let summary = AnalyticsSummary {
            total_posts: 1,
            total_likes: 2,
            avg_engagement: 3,
            sentiment_distribution: SentimentDistribution::default(),
            emotion_distribution: EmotionDistribution::default(),
            engagement_over_time: vec![EngagementPoint {
                date: "Nov 14".to_string(),
                engagement: 3,
            }],
            hashtag_frequency: vec![HashtagStat {
                hashtag: "#one".to_string(),
                count: 1,
                avg_engagement: 3,
            }],
            best_performing_post: Some(BestPost {
                post_id: "abc".to_string(),
                caption: "hi".to_string(),
                engagement_score: 3,
            }),
            engagement_trend: TrendDirection::Up,
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&summary).expect("serialize"))
                .expect("parse");
        assert_eq!(json["totalPosts"], 1);
        assert_eq!(json["avgEngagement"], 3);
        assert_eq!(json["engagementTrend"], "up");
        assert_eq!(json["bestPerformingPost"]["postId"], "abc");
        assert_eq!(json["hashtagFrequency"][0]["avgEngagement"], 3);
    }

    #[test]
    fn emotion_distribution_uses_capitalized_labels() {
        let json = serde_json::to_string(&EmotionDistribution::default()).expect("serialize");
        for key in ["\"Happy\"", "\"Excited\"", "\"Neutral\"", "\"Angry\""] {
            assert!(json.contains(key), "missing {key} in {json}");
        }
    }

    #[test]
    fn insight_trend_is_omitted_when_absent() {
        let card = Insight {
            id: "best-post",
            title: "Best Performing Post",
            value: "42".to_string(),
            description: "Post ID: abc".to_string(),
            icon: "\u{1f680}",
            trend: None,
        };
        let json = serde_json::to_string(&card).expect("serialize");
        assert!(!json.contains("trend"));
    }
}
