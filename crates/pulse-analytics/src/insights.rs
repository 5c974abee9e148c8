//! Derived "AI insight" cards over a dashboard's full post collection.

use std::collections::HashMap;

use chrono::Timelike;
use pulse_core::{Post, SentimentLabel};

use crate::trend::{direction, half_means};
use crate::types::{Insight, TrendDirection};

/// Pearson |r| above this is a strong correlation; above
/// [`MODERATE_CORRELATION`], moderate; anything else weak.
const STRONG_CORRELATION: f64 = 0.7;
const MODERATE_CORRELATION: f64 = 0.4;

/// Generate the fixed, ordered insight-card list for a post collection.
///
/// Empty input yields no cards. The best-time card is omitted when no slot
/// accumulates engagement data (only possible on empty input, kept as a
/// guard for the slot fold).
#[must_use]
pub fn generate_insights(posts: &[Post]) -> Vec<Insight> {
    if posts.is_empty() {
        return Vec::new();
    }

    let mut insights = Vec::with_capacity(5);

    insights.push(best_post_card(posts));
    if let Some(card) = best_time_card(posts) {
        insights.push(card);
    }
    insights.push(trend_card(posts));
    insights.push(sentiment_card(posts));
    insights.push(correlation_card(posts));

    insights
}

fn best_post_card(posts: &[Post]) -> Insight {
    let best = posts
        .iter()
        .reduce(|best, post| {
            if post.engagement_score > best.engagement_score {
                post
            } else {
                best
            }
        })
        .expect("non-empty input");

    Insight {
        id: "best-post",
        title: "Best Performing Post",
        value: best.engagement_score.to_string(),
        description: format!(
            "Post ID: {}",
            best.post_id.chars().take(8).collect::<String>()
        ),
        icon: "\u{1f680}",
        trend: None,
    }
}

/// Best posting slot: the (weekday, hour) pair with the highest mean
/// engagement, first-encountered winning ties.
fn best_time_card(posts: &[Post]) -> Option<Insight> {
    let mut order: Vec<(String, u32)> = Vec::new();
    let mut slots: HashMap<(String, u32), (i64, i64)> = HashMap::new();

    for post in posts {
        let day = post.timestamp.format("%a").to_string();
        let hour = post.timestamp.hour();
        let entry = slots.entry((day.clone(), hour)).or_insert_with(|| {
            order.push((day, hour));
            (0, 0)
        });
        entry.0 += post.engagement_score;
        entry.1 += 1;
    }

    let mut best: Option<(&(String, u32), f64)> = None;
    for key in &order {
        let (total, count) = slots[key];
        #[allow(clippy::cast_precision_loss)]
        let avg = total as f64 / count as f64;
        if best.is_none_or(|(_, best_avg)| avg > best_avg) {
            best = Some((key, avg));
        }
    }

    best.map(|((day, hour), avg)| Insight {
        id: "best-time",
        title: "Best Posting Time",
        value: format!("{day} {hour}:00"),
        description: format!("Average engagement: {}", avg.round()),
        icon: "\u{23f0}",
        trend: None,
    })
}

fn trend_card(posts: &[Post]) -> Insight {
    let (first, second) = half_means(posts);
    let trend = direction(first, second);
    #[allow(clippy::cast_possible_truncation)]
    let percent = if first > 0.0 {
        ((second - first) / first * 100.0).round() as i64
    } else {
        0
    };

    let (value, description, icon) = match trend {
        TrendDirection::Up => (
            format!("\u{2191} {}%", percent.abs()),
            "Increasing".to_string(),
            "\u{1f4c8}",
        ),
        TrendDirection::Down => (
            format!("\u{2193} {}%", percent.abs()),
            "Decreasing".to_string(),
            "\u{1f4c9}",
        ),
        TrendDirection::Neutral => (
            "\u{2192} Stable".to_string(),
            "Stable".to_string(),
            "\u{27a1}\u{fe0f}",
        ),
    };

    Insight {
        id: "engagement-trend",
        title: "Engagement Trend",
        value,
        description,
        icon,
        trend: Some(trend),
    }
}

fn sentiment_card(posts: &[Post]) -> Insight {
    let mut positive = 0i64;
    let mut neutral = 0i64;
    let mut negative = 0i64;
    for post in posts {
        match post.sentiment_label {
            SentimentLabel::Positive => positive += 1,
            SentimentLabel::Neutral => neutral += 1,
            SentimentLabel::Negative => negative += 1,
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    let total = posts.len() as i64;
    let percent = |count: i64| -> i64 {
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let p = (count as f64 / total as f64 * 100.0).round() as i64;
        p
    };

    // First-max-wins over the fixed label order keeps ties reproducible.
    let board = [
        ("positive", positive),
        ("neutral", neutral),
        ("negative", negative),
    ];
    let mut dominant = board[0];
    for candidate in board {
        if candidate.1 > dominant.1 {
            dominant = candidate;
        }
    }

    let icon = match dominant.0 {
        "positive" => "\u{1f60a}",
        "negative" => "\u{1f614}",
        _ => "\u{1f610}",
    };

    Insight {
        id: "sentiment-dominance",
        title: "Sentiment Dominance",
        value: format!("{}% {}", percent(dominant.1), dominant.0),
        description: format!(
            "Positive: {}%, Neutral: {}%, Negative: {}%",
            percent(positive),
            percent(neutral),
            percent(negative)
        ),
        icon,
        trend: None,
    }
}

fn correlation_card(posts: &[Post]) -> Insight {
    let r = pearson(posts);
    let strength = if r.abs() > STRONG_CORRELATION {
        "Strong"
    } else if r.abs() > MODERATE_CORRELATION {
        "Moderate"
    } else {
        "Weak"
    };
    let direction = if r > 0.0 { "Positive" } else { "Negative" };

    Insight {
        id: "correlation",
        title: "Comments \u{2194} Shares",
        value: format!("{strength} {direction}"),
        description: format!("Correlation: {r:.2}"),
        icon: if r > 0.0 { "\u{1f517}" } else { "\u{1f500}" },
        trend: None,
    }
}

/// Pearson correlation between per-post comment and share counts.
///
/// Defined as 0 when either variable has zero variance.
fn pearson(posts: &[Post]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = posts.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let avg_comments = posts.iter().map(|p| p.comments_count).sum::<i64>() as f64 / n;
    #[allow(clippy::cast_precision_loss)]
    let avg_shares = posts.iter().map(|p| p.shares).sum::<i64>() as f64 / n;

    let mut covariance = 0.0;
    let mut variance_comments = 0.0;
    let mut variance_shares = 0.0;
    for post in posts {
        #[allow(clippy::cast_precision_loss)]
        let dc = post.comments_count as f64 - avg_comments;
        #[allow(clippy::cast_precision_loss)]
        let ds = post.shares as f64 - avg_shares;
        covariance += dc * ds;
        variance_comments += dc * dc;
        variance_shares += ds * ds;
    }

    if variance_comments > 0.0 && variance_shares > 0.0 {
        covariance / (variance_comments * variance_shares).sqrt()
    } else {
        0.0
    }
}
