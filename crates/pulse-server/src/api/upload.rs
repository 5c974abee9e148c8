use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use pulse_core::{EmotionLabel, PerformanceTier, Post, SentimentLabel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::{RequestId, UserId};

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct UploadQuery {
    /// Original file name; the extension selects the parser.
    pub filename: String,
    /// Replace the dashboard's existing posts instead of appending.
    #[serde(default)]
    pub overwrite: bool,
}

/// A canonical post as returned from ingestion, before storage assigns ids.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IngestedPost {
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

impl From<&Post> for IngestedPost {
    fn from(post: &Post) -> Self {
        Self {
            post_id: post.post_id.clone(),
            caption: post.caption.clone(),
            likes: post.likes,
            comments_count: post.comments_count,
            shares: post.shares,
            timestamp: post.timestamp,
            comments: post.comments.clone(),
            sentiment_score: post.sentiment_score,
            sentiment_label: post.sentiment_label,
            emotion_label: post.emotion_label,
            engagement_score: post.engagement_score,
            predicted_performance: post.predicted_performance,
            confidence_score: post.confidence_score,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UploadResult {
    pub count: u64,
    pub posts: Vec<IngestedPost>,
}

/// Bulk ingestion: parse the uploaded file, normalize every row, attach
/// predictions against the batch average, and store the batch.
///
/// A structurally invalid payload aborts before any write — there is no
/// partial ingestion. Field-level problems never fail the upload.
pub(super) async fn upload_posts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Path(dashboard_id): Path<Uuid>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<ApiResponse<UploadResult>>, ApiError> {
    pulse_db::get_dashboard(&state.pool, dashboard_id, &user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "dashboard not found"))?;

    if body.len() > state.upload_max_bytes {
        return Err(ApiError::new(
            req_id.0,
            "payload_too_large",
            format!("upload exceeds {} bytes", state.upload_max_bytes),
        ));
    }

    let format = pulse_ingest::SourceFormat::from_filename(&query.filename).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "invalid_format",
            "unsupported file extension; only .csv and .json are accepted",
        )
    })?;

    let rows = pulse_ingest::parse_rows(&body, format)
        .map_err(|e| ApiError::new(req_id.0.clone(), "invalid_format", e.to_string()))?;

    let posts = pulse_ingest::ingest_rows(&rows);

    if query.overwrite {
        let removed = pulse_db::delete_posts_by_dashboard(&state.pool, dashboard_id)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
        tracing::info!(%dashboard_id, removed, "overwrite upload cleared existing posts");
    }

    let count = pulse_db::insert_posts(&state.pool, dashboard_id, &posts)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    pulse_db::touch_dashboard(&state.pool, dashboard_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(%dashboard_id, count, "ingested upload batch");

    Ok(Json(ApiResponse {
        data: UploadResult {
            count,
            posts: posts.iter().map(IngestedPost::from).collect(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
