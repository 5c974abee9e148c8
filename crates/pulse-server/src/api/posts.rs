use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use pulse_core::{EmotionLabel, PerformanceTier, SentimentLabel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::{RequestId, UserId};

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

/// A stored post as the API returns it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PostItem {
    pub id: i64,
    pub dashboard_id: Uuid,
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

impl From<pulse_db::PostRow> for PostItem {
    fn from(row: pulse_db::PostRow) -> Self {
        let id = row.id;
        let dashboard_id = row.dashboard_id;
        let post = row.into_post();
        Self {
            id,
            dashboard_id,
            post_id: post.post_id,
            caption: post.caption,
            likes: post.likes,
            comments_count: post.comments_count,
            shares: post.shares,
            timestamp: post.timestamp,
            comments: post.comments,
            sentiment_score: post.sentiment_score,
            sentiment_label: post.sentiment_label,
            emotion_label: post.emotion_label,
            engagement_score: post.engagement_score,
            predicted_performance: post.predicted_performance,
            confidence_score: post.confidence_score,
        }
    }
}

/// Shared listing/analytics filter parameters.
#[derive(Debug, Deserialize)]
pub(super) struct FilterQuery {
    pub sentiment: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Build the storage filter from query parameters.
///
/// `sentiment=all` (the UI's no-filter value) is ignored; unknown labels are
/// a validation error. Date bounds accept `YYYY-MM-DD` or RFC 3339; the `to`
/// bound is pushed to end-of-day so the day itself is included.
pub(super) fn build_filter(
    req_id: &str,
    query: &FilterQuery,
) -> Result<pulse_db::PostFilter, ApiError> {
    let sentiment = match query.sentiment.as_deref() {
        None | Some("all") => None,
        Some(label @ ("positive" | "neutral" | "negative")) => {
            Some(SentimentLabel::parse(label))
        }
        Some(other) => {
            return Err(ApiError::new(
                req_id.to_string(),
                "validation_error",
                format!("unknown sentiment filter: {other}"),
            ))
        }
    };

    let date_from = query
        .date_from
        .as_deref()
        .map(|raw| parse_bound(req_id, raw, false))
        .transpose()?;
    let date_to = query
        .date_to
        .as_deref()
        .map(|raw| parse_bound(req_id, raw, true))
        .transpose()?;

    Ok(pulse_db::PostFilter {
        sentiment,
        date_from,
        date_to,
    })
}

fn parse_bound(req_id: &str, raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = if end_of_day {
            date.and_hms_milli_opt(23, 59, 59, 999)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        if let Some(naive) = time {
            return Ok(naive.and_utc());
        }
    }
    Err(ApiError::new(
        req_id.to_string(),
        "validation_error",
        format!("unparseable date bound: {raw}"),
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PostPage {
    pub items: Vec<PostItem>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

pub(super) async fn list_posts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Path(dashboard_id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<PostPage>>, ApiError> {
    pulse_db::get_dashboard(&state.pool, dashboard_id, &user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "dashboard not found"))?;

    let filter = build_filter(&req_id.0, &query)?;
    let limit = normalize_limit(query.limit);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * limit;

    let (rows, total) = pulse_db::list_posts_page(&state.pool, dashboard_id, &filter, limit, offset)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: PostPage {
            items: rows.into_iter().map(PostItem::from).collect(),
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdatePostBody {
    pub likes: Option<i64>,
    pub comments_count: Option<i64>,
    pub shares: Option<i64>,
}

/// Apply metric edits to one post and cascade-recompute every derived field.
///
/// The whole read-recompute-write cycle runs in one transaction with the row
/// locked, so concurrent edits cannot predict against an interleaved
/// average. The cohort average is recomputed over all current posts of the
/// owning dashboard (their stored, pre-update engagements).
pub(super) async fn update_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Path(post_id): Path<i64>,
    Json(body): Json<UpdatePostBody>,
) -> Result<Json<ApiResponse<PostItem>>, ApiError> {
    let mut tx = state
        .pool
        .begin()
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &pulse_db::DbError::Sqlx(e)))?;

    let row = pulse_db::get_post_for_update(tx.as_mut(), post_id, &user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "post not found"))?;

    // Explicit negative inputs clamp to 0; absent fields keep stored values.
    let likes = body.likes.map_or(row.likes, |v| v.max(0));
    let comments_count = body.comments_count.map_or(row.comments_count, |v| v.max(0));
    let shares = body.shares.map_or(row.shares, |v| v.max(0));
    let engagement_score = likes + comments_count + shares;

    let sentiment_score = pulse_ingest::comparative_score(&row.caption);
    let sentiment_label = SentimentLabel::from_score(sentiment_score);
    let emotion_label = pulse_ingest::classify_emotion(&row.caption);

    let avg = pulse_db::dashboard_avg_engagement(tx.as_mut(), row.dashboard_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let prediction = pulse_ingest::predict(engagement_score, avg);

    let updated = pulse_db::save_post_metrics(
        tx.as_mut(),
        row.id,
        likes,
        comments_count,
        shares,
        sentiment_score,
        sentiment_label,
        emotion_label,
        prediction.predicted_performance,
        prediction.confidence_score,
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tx.commit()
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &pulse_db::DbError::Sqlx(e)))?;

    Ok(Json(ApiResponse {
        data: PostItem::from(updated),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn delete_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let deleted = pulse_db::delete_post(&state.pool, post_id, &user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(req_id.0, "not_found", "post not found"));
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({"deleted": true}),
        meta: ResponseMeta::new(req_id.0),
    }))
}
