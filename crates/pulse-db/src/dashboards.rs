//! Database operations for the `dashboards` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `dashboards` table plus the derived post count.
///
/// `dataset_size` is computed at read time from the owned posts; it is never
/// stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DashboardRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub dataset_size: i64,
}

impl DashboardRow {
    #[must_use]
    pub fn into_dashboard(self) -> pulse_core::Dashboard {
        pulse_core::Dashboard {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
            dataset_size: self.dataset_size,
        }
    }
}

const DASHBOARD_COLUMNS: &str = "id, user_id, name, created_at, updated_at, \
     (SELECT COUNT(*) FROM posts WHERE posts.dashboard_id = dashboards.id) AS dataset_size";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a new dashboard for a user and return the created row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_dashboard(
    pool: &PgPool,
    user_id: &str,
    name: &str,
) -> Result<DashboardRow, DbError> {
    let row = sqlx::query_as::<_, DashboardRow>(
        "INSERT INTO dashboards (user_id, name) \
         VALUES ($1, $2) \
         RETURNING id, user_id, name, created_at, updated_at, 0::bigint AS dataset_size",
    )
    .bind(user_id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// List a user's dashboards, most recently updated first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_dashboards(pool: &PgPool, user_id: &str) -> Result<Vec<DashboardRow>, DbError> {
    let rows = sqlx::query_as::<_, DashboardRow>(&format!(
        "SELECT {DASHBOARD_COLUMNS} FROM dashboards \
         WHERE user_id = $1 \
         ORDER BY updated_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one dashboard scoped to its owner, or `None` when it does not exist
/// or belongs to another user.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_dashboard(
    pool: &PgPool,
    id: Uuid,
    user_id: &str,
) -> Result<Option<DashboardRow>, DbError> {
    let row = sqlx::query_as::<_, DashboardRow>(&format!(
        "SELECT {DASHBOARD_COLUMNS} FROM dashboards \
         WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Delete a dashboard (posts cascade via the FK). Returns `true` when a row
/// was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_dashboard(pool: &PgPool, id: Uuid, user_id: &str) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM dashboards WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Bump a dashboard's `updated_at` to now (after ingestion writes).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn touch_dashboard(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    sqlx::query("UPDATE dashboards SET updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
