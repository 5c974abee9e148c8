//! Database operations for the `posts` table.

use chrono::{DateTime, Utc};
use pulse_core::{EmotionLabel, PerformanceTier, Post, SentimentLabel};
use serde_json::Value;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub dashboard_id: Uuid,
    pub post_id: String,
    pub caption: String,
    pub likes: i64,
    pub comments_count: i64,
    pub shares: i64,
    pub posted_at: DateTime<Utc>,
    pub comments: Value,
    pub sentiment_score: f64,
    pub sentiment_label: String,
    pub emotion_label: String,
    pub engagement_score: i64,
    pub predicted_performance: String,
    pub confidence_score: i32,
    pub created_at: DateTime<Utc>,
}

impl PostRow {
    /// Convert the stored row back into the canonical post record.
    #[must_use]
    pub fn into_post(self) -> Post {
        let comments = match self.comments {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        Post {
            post_id: self.post_id,
            caption: self.caption,
            likes: self.likes,
            comments_count: self.comments_count,
            shares: self.shares,
            timestamp: self.posted_at,
            comments,
            sentiment_score: self.sentiment_score,
            sentiment_label: SentimentLabel::parse(&self.sentiment_label),
            emotion_label: EmotionLabel::parse(&self.emotion_label),
            engagement_score: self.engagement_score,
            predicted_performance: PerformanceTier::parse(&self.predicted_performance),
            confidence_score: self.confidence_score,
        }
    }
}

const POST_COLUMNS: &str = "id, dashboard_id, post_id, caption, likes, comments_count, shares, \
     posted_at, comments, sentiment_score, sentiment_label, emotion_label, engagement_score, \
     predicted_performance, confidence_score, created_at";

/// Optional listing filters; both date bounds are inclusive (the `to` bound
/// is pushed to end-of-day by the API layer before it reaches storage).
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub sentiment: Option<SentimentLabel>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    if let Some(sentiment) = filter.sentiment {
        builder.push(" AND sentiment_label = ");
        builder.push_bind(sentiment.as_str());
    }
    if let Some(from) = filter.date_from {
        builder.push(" AND posted_at >= ");
        builder.push_bind(from);
    }
    if let Some(to) = filter.date_to {
        builder.push(" AND posted_at <= ");
        builder.push_bind(to);
    }
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Bulk-insert a batch of canonical posts for one dashboard.
///
/// Runs in a single transaction so a mid-batch failure leaves nothing
/// behind. Returns the number of inserted rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails.
pub async fn insert_posts(
    pool: &PgPool,
    dashboard_id: Uuid,
    posts: &[Post],
) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;

    for post in posts {
        sqlx::query(
            "INSERT INTO posts \
                 (dashboard_id, post_id, caption, likes, comments_count, shares, posted_at, \
                  comments, sentiment_score, sentiment_label, emotion_label, engagement_score, \
                  predicted_performance, confidence_score) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(dashboard_id)
        .bind(&post.post_id)
        .bind(&post.caption)
        .bind(post.likes)
        .bind(post.comments_count)
        .bind(post.shares)
        .bind(post.timestamp)
        .bind(Value::from(post.comments.clone()))
        .bind(post.sentiment_score)
        .bind(post.sentiment_label.as_str())
        .bind(post.emotion_label.as_str())
        .bind(post.engagement_score)
        .bind(post.predicted_performance.as_str())
        .bind(post.confidence_score)
        .execute(tx.as_mut())
        .await?;
    }

    tx.commit().await?;
    Ok(posts.len() as u64)
}

/// Delete all posts of a dashboard (the overwrite path). Returns the number
/// of removed rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_posts_by_dashboard(pool: &PgPool, dashboard_id: Uuid) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM posts WHERE dashboard_id = $1")
        .bind(dashboard_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Delete one post scoped to its owning user. Returns `true` when a row was
/// removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_post(pool: &PgPool, id: i64, user_id: &str) -> Result<bool, DbError> {
    let result = sqlx::query(
        "DELETE FROM posts \
         WHERE id = $1 \
           AND dashboard_id IN (SELECT id FROM dashboards WHERE user_id = $2)",
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// List a dashboard's posts with optional filters, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_posts(
    pool: &PgPool,
    dashboard_id: Uuid,
    filter: &PostFilter,
) -> Result<Vec<PostRow>, DbError> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE dashboard_id = "
    ));
    builder.push_bind(dashboard_id);
    push_filters(&mut builder, filter);
    builder.push(" ORDER BY posted_at DESC, id DESC");

    let rows = builder.build_query_as::<PostRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// One page of a dashboard's filtered post listing plus the total row count
/// for the same filter.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn list_posts_page(
    pool: &PgPool,
    dashboard_id: Uuid,
    filter: &PostFilter,
    limit: i64,
    offset: i64,
) -> Result<(Vec<PostRow>, i64), DbError> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE dashboard_id = "
    ));
    builder.push_bind(dashboard_id);
    push_filters(&mut builder, filter);
    builder.push(" ORDER BY posted_at DESC, id DESC LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    let rows = builder.build_query_as::<PostRow>().fetch_all(pool).await?;

    let mut count_builder =
        QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts WHERE dashboard_id = ");
    count_builder.push_bind(dashboard_id);
    push_filters(&mut count_builder, filter);
    let total: i64 = count_builder
        .build_query_scalar()
        .fetch_one(pool)
        .await?;

    Ok((rows, total))
}

/// Fetch one post scoped to its owning user.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_post_owned(
    pool: &PgPool,
    id: i64,
    user_id: &str,
) -> Result<Option<PostRow>, DbError> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {POST_COLUMNS} FROM posts \
         WHERE id = $1 \
           AND dashboard_id IN (SELECT id FROM dashboards WHERE user_id = $2)"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

// ---------------------------------------------------------------------------
// Metric update path (transactional)
// ---------------------------------------------------------------------------

/// Fetch one owned post with a row lock, for the update-recompute cycle.
///
/// Must run inside a transaction; the lock holds until commit so concurrent
/// edits cannot interleave between the cohort-average read and the write.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_post_for_update(
    conn: &mut PgConnection,
    id: i64,
    user_id: &str,
) -> Result<Option<PostRow>, DbError> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {POST_COLUMNS} FROM posts \
         WHERE id = $1 \
           AND dashboard_id IN (SELECT id FROM dashboards WHERE user_id = $2) \
         FOR UPDATE"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Mean engagement across all current posts of a dashboard; 0.0 when the
/// dashboard has no posts.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn dashboard_avg_engagement(
    conn: &mut PgConnection,
    dashboard_id: Uuid,
) -> Result<f64, DbError> {
    let avg: f64 = sqlx::query_scalar(
        "SELECT COALESCE(AVG(engagement_score), 0)::float8 FROM posts WHERE dashboard_id = $1",
    )
    .bind(dashboard_id)
    .fetch_one(conn)
    .await?;

    Ok(avg)
}

/// Write a post's metrics and every derived field, returning the new row.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the row vanished, [`DbError::Sqlx`] on
/// query failure.
#[allow(clippy::too_many_arguments)]
pub async fn save_post_metrics(
    conn: &mut PgConnection,
    id: i64,
    likes: i64,
    comments_count: i64,
    shares: i64,
    sentiment_score: f64,
    sentiment_label: SentimentLabel,
    emotion_label: EmotionLabel,
    predicted_performance: PerformanceTier,
    confidence_score: i32,
) -> Result<PostRow, DbError> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        "UPDATE posts SET \
             likes = $2, \
             comments_count = $3, \
             shares = $4, \
             engagement_score = $2 + $3 + $4, \
             sentiment_score = $5, \
             sentiment_label = $6, \
             emotion_label = $7, \
             predicted_performance = $8, \
             confidence_score = $9 \
         WHERE id = $1 \
         RETURNING {POST_COLUMNS}"
    ))
    .bind(id)
    .bind(likes)
    .bind(comments_count)
    .bind(shares)
    .bind(sentiment_score)
    .bind(sentiment_label.as_str())
    .bind(emotion_label.as_str())
    .bind(predicted_performance.as_str())
    .bind(confidence_score)
    .fetch_optional(conn)
    .await?;

    row.ok_or(DbError::NotFound)
}
