use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::{RequestId, UserId};

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DashboardItem {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub dataset_size: i64,
}

impl From<pulse_db::DashboardRow> for DashboardItem {
    fn from(row: pulse_db::DashboardRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
            dataset_size: row.dataset_size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateDashboardBody {
    pub name: String,
}

pub(super) async fn list_dashboards(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
) -> Result<Json<ApiResponse<Vec<DashboardItem>>>, ApiError> {
    let rows = pulse_db::list_dashboards(&state.pool, &user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(DashboardItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn create_dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Json(body): Json<CreateDashboardBody>,
) -> Result<(StatusCode, Json<ApiResponse<DashboardItem>>), ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "dashboard name must not be empty",
        ));
    }

    let row = pulse_db::create_dashboard(&state.pool, &user.0, name)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: DashboardItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn get_dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Path(dashboard_id): Path<Uuid>,
) -> Result<Json<ApiResponse<DashboardItem>>, ApiError> {
    let row = pulse_db::get_dashboard(&state.pool, dashboard_id, &user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "dashboard not found"))?;

    Ok(Json(ApiResponse {
        data: DashboardItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn delete_dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Path(dashboard_id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let deleted = pulse_db::delete_dashboard(&state.pool, dashboard_id, &user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(req_id.0, "not_found", "dashboard not found"));
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({"deleted": true}),
        meta: ResponseMeta::new(req_id.0),
    }))
}
