//! Aggregated analytics over canonical post collections.
//!
//! Rolls a dashboard's posts up into the summary payload the UI charts from
//! (distributions, time series, hashtag tables, trend direction) and derives
//! the ordered insight-card list. Everything here is pure and synchronous;
//! filtering happens upstream in storage.

pub mod hashtags;
pub mod insights;
pub mod summary;
pub mod trend;
pub mod types;

pub use hashtags::{extract_hashtags, hashtag_frequency};
pub use insights::generate_insights;
pub use summary::summarize;
pub use trend::engagement_trend;
pub use types::{
    AnalyticsSummary, BestPost, EmotionDistribution, EngagementPoint, HashtagStat, Insight,
    SentimentDistribution, TrendDirection,
};
