//! The canonical post record and its derived-label types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentiment classification derived from the comparative score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Classify a comparative score: `> 0.05` positive, `< -0.05` negative,
    /// else neutral.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > 0.05 {
            Self::Positive
        } else if score < -0.05 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    /// Parse a stored label. Unknown strings fall back to `Neutral`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

/// Emotion classification over a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmotionLabel {
    Happy,
    Angry,
    Excited,
    Neutral,
}

impl EmotionLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Angry => "Angry",
            Self::Excited => "Excited",
            Self::Neutral => "Neutral",
        }
    }

    /// Parse a stored label. Unknown strings fall back to `Neutral`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "Happy" => Self::Happy,
            "Angry" => Self::Angry,
            "Excited" => Self::Excited,
            _ => Self::Neutral,
        }
    }
}

/// Performance tier assigned by the predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceTier {
    High,
    Medium,
    Low,
}

impl PerformanceTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parse a stored tier. Unknown strings fall back to `Medium`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "High" => Self::High,
            "Low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

/// Predictor output: a tier plus a 0-100 confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_performance: PerformanceTier,
    pub confidence_score: i32,
}

/// The canonical, fully-derived post record used everywhere downstream of
/// ingestion.
///
/// Invariant: `engagement_score == likes + comments_count + shares`. Any
/// mutation of the three metrics must recompute `engagement_score` and the
/// derived sentiment/emotion/prediction fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// External identifier; generated when the source row carries none.
    pub post_id: String,
    pub caption: String,
    pub likes: i64,
    pub comments_count: i64,
    pub shares: i64,
    pub timestamp: DateTime<Utc>,
    pub comments: Vec<String>,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub emotion_label: EmotionLabel,
    pub engagement_score: i64,
    pub predicted_performance: PerformanceTier,
    pub confidence_score: i32,
}

impl Post {
    /// Generate an 8-character post token from a v4 UUID.
    #[must_use]
    pub fn generate_id() -> String {
        let id = Uuid::new_v4().simple().to_string();
        id[..8].to_string()
    }
}
