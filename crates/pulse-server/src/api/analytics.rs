use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use pulse_analytics::{AnalyticsSummary, Insight};
use pulse_core::Post;
use uuid::Uuid;

use crate::middleware::{RequestId, UserId};

use super::posts::{build_filter, FilterQuery};
use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// The aggregated analytics payload for one dashboard, honoring the
/// optional sentiment/date filters.
pub(super) async fn get_analytics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Path(dashboard_id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApiResponse<AnalyticsSummary>>, ApiError> {
    pulse_db::get_dashboard(&state.pool, dashboard_id, &user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "dashboard not found"))?;

    let filter = build_filter(&req_id.0, &query)?;
    let posts = load_posts(&state, dashboard_id, &filter, &req_id.0).await?;

    Ok(Json(ApiResponse {
        data: pulse_analytics::summarize(&posts),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// The ordered insight-card list over the dashboard's full post collection.
pub(super) async fn get_insights(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Path(dashboard_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Insight>>>, ApiError> {
    pulse_db::get_dashboard(&state.pool, dashboard_id, &user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "dashboard not found"))?;

    let posts = load_posts(
        &state,
        dashboard_id,
        &pulse_db::PostFilter::default(),
        &req_id.0,
    )
    .await?;

    Ok(Json(ApiResponse {
        data: pulse_analytics::generate_insights(&posts),
        meta: ResponseMeta::new(req_id.0),
    }))
}

async fn load_posts(
    state: &AppState,
    dashboard_id: Uuid,
    filter: &pulse_db::PostFilter,
    req_id: &str,
) -> Result<Vec<Post>, ApiError> {
    let rows = pulse_db::list_posts(&state.pool, dashboard_id, filter)
        .await
        .map_err(|e| map_db_error(req_id.to_string(), &e))?;
    Ok(rows.into_iter().map(pulse_db::PostRow::into_post).collect())
}
